//! Protocol engine errors.

use aq_driver::DriverError;
use aq_labware::LabwareError;
use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while executing transfers.
///
/// Bound conditions (trash capacity, non-positive volume, tip-rack
/// exhaustion) are explicit failures rather than silent clamps.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Transfer volume must be positive and finite, got {volume_ul} uL")]
    NonPositiveVolume { volume_ul: f64 },

    #[error("Air gap must be non-negative and finite, got {air_gap_ul} uL")]
    InvalidAirGap { air_gap_ul: f64 },

    #[error("Air gap of {air_gap_ul} uL leaves no working capacity on a {max_volume_ul} uL pipette")]
    AirGapExceedsCapacity {
        air_gap_ul: f64,
        max_volume_ul: f64,
    },

    #[error("Trash container '{trash_id}' is full ({capacity} slots used)")]
    TrashFull { trash_id: String, capacity: usize },

    #[error("All tip racks are exhausted ({capacity} tips used)")]
    TipRackExhausted { capacity: usize },

    #[error("Pipette already has a tip attached")]
    TipAlreadyAttached,

    #[error("Pipette has no tip attached")]
    NoTipAttached,

    #[error(transparent)]
    Labware(#[from] LabwareError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}
