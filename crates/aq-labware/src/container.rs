//! Placed containers and resolved wells.

use crate::address::WellAddress;
use crate::definition::ContainerDef;
use crate::error::{LabwareError, LabwareResult};
use crate::slot::Slot;
use aq_core::units::Position;

/// A container placed at a deck slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Placement id chosen by the protocol (e.g. "tips", "cells").
    pub id: String,
    pub def: ContainerDef,
    pub slot: Slot,
}

impl Container {
    pub fn new(id: &str, def: ContainerDef, slot: Slot) -> Self {
        Self {
            id: id.to_string(),
            def,
            slot,
        }
    }

    pub fn well_count(&self) -> usize {
        self.def.well_count()
    }

    /// Resolve a well by address.
    pub fn well(&self, addr: WellAddress) -> LabwareResult<Well> {
        if addr.row >= self.def.rows() || addr.col >= self.def.cols() {
            return Err(LabwareError::BadAddress {
                what: format!("well {addr} outside {} grid", self.def.name),
            });
        }
        Ok(self.resolve(addr))
    }

    /// Resolve a well by linear index (column-major).
    pub fn well_by_index(&self, index: usize) -> LabwareResult<Well> {
        if index >= self.well_count() {
            return Err(LabwareError::WellOob {
                what: "well index",
                index,
                len: self.well_count(),
            });
        }
        Ok(self.resolve(WellAddress::from_index(index, self.def.rows())))
    }

    /// Iterate every well in column-major order (A1, B1, ..., A2, ...).
    pub fn wells(&self) -> impl Iterator<Item = Well> + '_ {
        (0..self.well_count()).map(|i| self.resolve(WellAddress::from_index(i, self.def.rows())))
    }

    fn resolve(&self, addr: WellAddress) -> Well {
        let (ox, oy) = self.slot.origin_mm();
        Well {
            container_id: self.id.clone(),
            address: addr,
            index: addr.to_index(self.def.rows()),
            x_mm: ox + addr.col as f64 * self.def.spacing_mm.0,
            y_mm: oy + addr.row as f64 * self.def.spacing_mm.1,
            depth_mm: self.def.depth_mm,
        }
    }
}

/// A fully resolved well: placement id, address, and deck-frame position.
#[derive(Debug, Clone, PartialEq)]
pub struct Well {
    pub container_id: String,
    pub address: WellAddress,
    pub index: usize,
    pub x_mm: f64,
    pub y_mm: f64,
    pub depth_mm: f64,
}

impl Well {
    /// Position at the well rim, where air gaps and blow-outs happen.
    pub fn top(&self) -> Position {
        Position::new(self.x_mm, self.y_mm, self.depth_mm)
    }

    /// Position at the well floor.
    pub fn bottom(&self) -> Position {
        Position::new(self.x_mm, self.y_mm, 0.0)
    }
}
