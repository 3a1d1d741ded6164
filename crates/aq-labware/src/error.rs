//! Labware and deck errors.

use aq_core::AqError;
use thiserror::Error;

/// Result type for labware operations.
pub type LabwareResult<T> = Result<T, LabwareError>;

/// Errors that can occur while building or querying a deck layout.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabwareError {
    /// Labware name not found in the catalog or custom definitions.
    #[error("Unknown labware: {name}")]
    UnknownLabware { name: String },

    /// Two containers placed in the same deck slot.
    #[error("Slot {slot} is already occupied by '{occupant}'")]
    SlotOccupied { slot: String, occupant: String },

    /// Malformed well address or slot label.
    #[error("Bad address: {what}")]
    BadAddress { what: String },

    /// Well index or address outside the container grid.
    #[error("Well out of bounds: {what} (index={index}, len={len})")]
    WellOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Non-positive grid, spacing, diameter, or depth.
    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: &'static str },

    /// Placement id not present on the deck.
    #[error("No container with id '{id}' on the deck")]
    UnknownPlacement { id: String },
}

impl From<LabwareError> for AqError {
    fn from(err: LabwareError) -> Self {
        match err {
            LabwareError::WellOob { what, index, len } => AqError::IndexOob { what, index, len },
            LabwareError::InvalidGeometry { what } => AqError::InvalidArg { what },
            _ => AqError::Invariant {
                what: "labware layout error",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LabwareError::UnknownLabware {
            name: "384-deep".to_string(),
        };
        assert!(err.to_string().contains("384-deep"));
    }

    #[test]
    fn converts_to_core_error() {
        let err: AqError = LabwareError::WellOob {
            what: "well index",
            index: 96,
            len: 96,
        }
        .into();
        assert!(matches!(err, AqError::IndexOob { index: 96, .. }));

        let err: AqError = LabwareError::UnknownPlacement {
            id: "plate".to_string(),
        }
        .into();
        assert!(matches!(err, AqError::Invariant { .. }));
    }
}
