//! Pipette model: axis, capacity, tip racks, and device operations.

use crate::error::{ProtocolError, ProtocolResult};
use aq_core::units::{Position, Volume, as_ul};
use aq_driver::{Command, Controller};
use aq_labware::{Deck, Well};
use core::fmt;

/// Addressable plunger axis on the gantry head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    A,
    B,
}

impl Axis {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "a" | "A" => Some(Axis::A),
            "b" | "B" => Some(Axis::B),
            _ => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::A => write!(f, "a"),
            Axis::B => write!(f, "b"),
        }
    }
}

/// A pipette attached to one axis, drawing tips from an ordered set of racks.
///
/// The tip cursor walks the concatenated racks in well order; `starting_tip`
/// offsets it into the first rack. `has_tip` tracks attachment so plunger
/// operations without a tip fail instead of contaminating the barrel.
#[derive(Debug)]
pub struct Pipette {
    pub axis: Axis,
    max_volume: Volume,
    tip_racks: Vec<String>,
    next_tip: usize,
    has_tip: bool,
}

impl Pipette {
    pub fn new(axis: Axis, max_volume: Volume, tip_racks: Vec<String>) -> Self {
        Self {
            axis,
            max_volume,
            tip_racks,
            next_tip: 0,
            has_tip: false,
        }
    }

    pub fn max_volume(&self) -> Volume {
        self.max_volume
    }

    pub fn max_volume_ul(&self) -> f64 {
        as_ul(self.max_volume)
    }

    pub fn has_tip(&self) -> bool {
        self.has_tip
    }

    pub fn tip_racks(&self) -> &[String] {
        &self.tip_racks
    }

    /// Skip tips before the given linear index in the first rack
    /// (`starting_tip` in the deck layout).
    pub fn set_starting_tip(&mut self, index: usize) {
        self.next_tip = index;
    }

    /// Tips remaining across all racks on the given deck.
    pub fn tips_remaining(&self, deck: &Deck) -> ProtocolResult<usize> {
        let total = self.tip_capacity(deck)?;
        Ok(total.saturating_sub(self.next_tip))
    }

    fn tip_capacity(&self, deck: &Deck) -> ProtocolResult<usize> {
        let mut total = 0;
        for rack_id in &self.tip_racks {
            total += deck.container(rack_id)?.well_count();
        }
        Ok(total)
    }

    /// Locate the well for the current tip cursor across the rack sequence.
    fn next_tip_well(&self, deck: &Deck) -> ProtocolResult<Well> {
        let mut offset = self.next_tip;
        for rack_id in &self.tip_racks {
            let rack = deck.container(rack_id)?;
            if offset < rack.well_count() {
                return Ok(rack.well_by_index(offset)?);
            }
            offset -= rack.well_count();
        }
        Err(ProtocolError::TipRackExhausted {
            capacity: self.tip_capacity(deck)?,
        })
    }

    /// Move to the next fresh tip and pick it up.
    pub fn pick_up_tip(&mut self, ctrl: &mut Controller, deck: &Deck) -> ProtocolResult<()> {
        if self.has_tip {
            return Err(ProtocolError::TipAlreadyAttached);
        }
        let well = self.next_tip_well(deck)?;
        tracing::trace!(axis = %self.axis, tip = %well.address, rack = %well.container_id, "pick up tip");
        ctrl.move_to(well.top())?;
        ctrl.issue(Command::PickUpTip)?;
        self.next_tip += 1;
        self.has_tip = true;
        Ok(())
    }

    /// Eject the tip into the given well.
    pub fn drop_tip(&mut self, ctrl: &mut Controller, well: &Well) -> ProtocolResult<()> {
        if !self.has_tip {
            return Err(ProtocolError::NoTipAttached);
        }
        ctrl.move_to(well.top())?;
        ctrl.issue(Command::DropTip)?;
        self.has_tip = false;
        Ok(())
    }

    pub fn aspirate(
        &mut self,
        ctrl: &mut Controller,
        volume_ul: f64,
        well: &Well,
    ) -> ProtocolResult<()> {
        self.require_tip()?;
        ctrl.move_to(well.bottom())?;
        ctrl.issue(Command::Aspirate { volume_ul })?;
        Ok(())
    }

    pub fn dispense(
        &mut self,
        ctrl: &mut Controller,
        volume_ul: f64,
        well: &Well,
    ) -> ProtocolResult<()> {
        self.require_tip()?;
        ctrl.move_to(well.bottom())?;
        ctrl.issue(Command::Dispense { volume_ul })?;
        Ok(())
    }

    /// Draw air at the current location (the head is assumed clear of liquid).
    pub fn air_gap(&mut self, ctrl: &mut Controller, volume_ul: f64) -> ProtocolResult<()> {
        self.require_tip()?;
        ctrl.issue(Command::AirGap { volume_ul })?;
        Ok(())
    }

    pub fn blow_out(&mut self, ctrl: &mut Controller) -> ProtocolResult<()> {
        self.require_tip()?;
        ctrl.issue(Command::BlowOut)?;
        Ok(())
    }

    pub fn mix(
        &mut self,
        ctrl: &mut Controller,
        repetitions: u32,
        volume_ul: f64,
        well: &Well,
    ) -> ProtocolResult<()> {
        self.require_tip()?;
        ctrl.move_to(well.bottom())?;
        ctrl.issue(Command::Mix {
            repetitions,
            volume_ul,
        })?;
        Ok(())
    }

    pub fn move_to(&mut self, ctrl: &mut Controller, pos: Position) -> ProtocolResult<()> {
        ctrl.move_to(pos)?;
        Ok(())
    }

    fn require_tip(&self) -> ProtocolResult<()> {
        if self.has_tip {
            Ok(())
        } else {
            Err(ProtocolError::NoTipAttached)
        }
    }
}
