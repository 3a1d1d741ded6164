//! Sterile transfers: one fresh tip per transfer, volume splitting, periodic
//! re-homing, trash tracking.

use crate::error::{ProtocolError, ProtocolResult};
use crate::pipette::Pipette;
use aq_core::units::{Volume, as_ul};
use aq_driver::Controller;
use aq_labware::{Deck, Well};

/// The gantry re-homes on every Nth transfer to shed accumulated drift.
pub const REHOME_INTERVAL: u32 = 8;

/// Mix cycles applied before aspiration / after dispense.
pub const MIX_REPETITIONS: u32 = 3;

/// Air drawn above the destination before transiting to the trash, so no
/// droplet falls across other labware.
pub const TRANSIT_AIR_GAP_UL: f64 = 15.0;

/// Absorbs unit-conversion rounding when comparing volumes against the
/// working capacity; a volume within this of an exact capacity multiple must
/// not produce a near-zero extra cycle.
const VOLUME_EPS_UL: f64 = 1e-9;

/// Per-transfer knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferOptions {
    /// Air drawn after each aspirate; subtracted from the working capacity.
    pub air_gap_ul: f64,
    /// Mix the source (3 cycles, half capacity) before every aspirate.
    pub mix_before: bool,
    /// Mix the destination (3 cycles, half capacity) after the transfer.
    pub mix_after: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            air_gap_ul: 5.0,
            mix_before: false,
            mix_after: false,
        }
    }
}

/// A tip-reuse-avoidance transfer session.
///
/// Guarantees the sterile invariant: every transfer uses one fresh tip, and
/// that tip is discarded into its own trash slot afterwards. Holds the
/// cross-transfer state, the trash cursor and the re-home counter. Lifetime
/// is one protocol run.
pub struct SterileSession {
    trash_id: String,
    trash_cursor: usize,
    rehome_counter: u32,
}

impl SterileSession {
    pub fn new(trash_id: &str) -> Self {
        Self {
            trash_id: trash_id.to_string(),
            trash_cursor: 0,
            rehome_counter: 0,
        }
    }

    /// Next trash slot to be used; equals the number of completed transfers.
    pub fn trash_cursor(&self) -> usize {
        self.trash_cursor
    }

    /// Transfers since the last re-home; stays in 0..REHOME_INTERVAL.
    pub fn rehome_counter(&self) -> u32 {
        self.rehome_counter
    }

    /// Perform one sterile transfer of `volume` from `source` to
    /// `destination`.
    ///
    /// Sequence: re-home policy, validation, fresh tip, split
    /// aspirate/air-gap/dispense/blow-out cycles until the requested volume
    /// is delivered, optional destination mix, then tip disposal with a
    /// transit air gap.
    #[allow(clippy::too_many_arguments)]
    pub fn transfer(
        &mut self,
        ctrl: &mut Controller,
        deck: &Deck,
        pipette: &mut Pipette,
        volume: Volume,
        source: &Well,
        destination: &Well,
        options: &TransferOptions,
    ) -> ProtocolResult<()> {
        self.rehome(ctrl)?;

        let volume_ul = as_ul(volume);
        if !volume_ul.is_finite() || volume_ul <= 0.0 {
            return Err(ProtocolError::NonPositiveVolume { volume_ul });
        }
        // A NaN gap would poison the capacity and a negative one would
        // inflate it past the pipette max.
        if !options.air_gap_ul.is_finite() || options.air_gap_ul < 0.0 {
            return Err(ProtocolError::InvalidAirGap {
                air_gap_ul: options.air_gap_ul,
            });
        }
        let capacity_ul = pipette.max_volume_ul() - options.air_gap_ul;
        if capacity_ul <= 0.0 {
            return Err(ProtocolError::AirGapExceedsCapacity {
                air_gap_ul: options.air_gap_ul,
                max_volume_ul: pipette.max_volume_ul(),
            });
        }
        let trash = deck.container(&self.trash_id)?;
        if self.trash_cursor >= trash.well_count() {
            return Err(ProtocolError::TrashFull {
                trash_id: self.trash_id.clone(),
                capacity: trash.well_count(),
            });
        }
        let trash_well = trash.well_by_index(self.trash_cursor)?;

        tracing::debug!(
            volume_ul,
            source = %format_args!("{}/{}", source.container_id, source.address),
            destination = %format_args!("{}/{}", destination.container_id, destination.address),
            "sterile transfer"
        );

        pipette.pick_up_tip(ctrl, deck)?;

        let mut remaining_ul = volume_ul;
        while remaining_ul > capacity_ul + VOLUME_EPS_UL {
            cycle(ctrl, pipette, capacity_ul, capacity_ul, source, destination, options)?;
            remaining_ul -= capacity_ul;
        }
        cycle(ctrl, pipette, remaining_ul, capacity_ul, source, destination, options)?;

        if options.mix_after {
            pipette.mix(ctrl, MIX_REPETITIONS, capacity_ul / 2.0, destination)?;
            pipette.move_to(ctrl, destination.top())?;
            pipette.blow_out(ctrl)?;
        }

        // Transit guard: clear the destination, pull air, then trash the tip.
        pipette.move_to(ctrl, destination.top())?;
        pipette.air_gap(ctrl, TRANSIT_AIR_GAP_UL)?;
        pipette.drop_tip(ctrl, &trash_well)?;
        self.trash_cursor += 1;

        Ok(())
    }

    fn rehome(&mut self, ctrl: &mut Controller) -> ProtocolResult<()> {
        self.rehome_counter += 1;
        if self.rehome_counter >= REHOME_INTERVAL {
            self.rehome_counter = 0;
            tracing::debug!("periodic re-home");
            ctrl.home()?;
        }
        Ok(())
    }
}

/// One aspirate/air-gap/dispense/blow-out cycle.
#[allow(clippy::too_many_arguments)]
fn cycle(
    ctrl: &mut Controller,
    pipette: &mut Pipette,
    volume_ul: f64,
    capacity_ul: f64,
    source: &Well,
    destination: &Well,
    options: &TransferOptions,
) -> ProtocolResult<()> {
    if options.mix_before {
        pipette.mix(ctrl, MIX_REPETITIONS, capacity_ul / 2.0, source)?;
    }
    pipette.aspirate(ctrl, volume_ul, source)?;
    pipette.air_gap(ctrl, options.air_gap_ul)?;
    pipette.dispense(ctrl, volume_ul, destination)?;
    pipette.blow_out(ctrl)?;
    Ok(())
}
