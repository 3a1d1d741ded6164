//! Deck layout: containers pinned to slots.

use crate::container::Container;
use crate::definition::ContainerDef;
use crate::error::{LabwareError, LabwareResult};
use crate::slot::Slot;
use std::collections::HashMap;

/// The robot deck: at most one container per slot, looked up by placement id.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    by_id: HashMap<String, Container>,
    by_slot: HashMap<Slot, String>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a container at a free slot under a unique placement id.
    pub fn load(&mut self, id: &str, def: ContainerDef, slot: Slot) -> LabwareResult<&Container> {
        if let Some(occupant) = self.by_slot.get(&slot) {
            return Err(LabwareError::SlotOccupied {
                slot: slot.to_string(),
                occupant: occupant.clone(),
            });
        }
        if self.by_id.contains_key(id) {
            return Err(LabwareError::SlotOccupied {
                slot: slot.to_string(),
                occupant: id.to_string(),
            });
        }
        def.validate()?;
        self.by_slot.insert(slot, id.to_string());
        self.by_id.insert(id.to_string(), Container::new(id, def, slot));
        Ok(&self.by_id[id])
    }

    pub fn container(&self, id: &str) -> LabwareResult<&Container> {
        self.by_id
            .get(id)
            .ok_or_else(|| LabwareError::UnknownPlacement { id: id.to_string() })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Placements in slot order (row-major over the deck grid).
    pub fn placements(&self) -> Vec<&Container> {
        let mut all: Vec<&Container> = self.by_id.values().collect();
        all.sort_by_key(|c| c.slot.to_string());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_labware;

    fn def(name: &str) -> ContainerDef {
        find_labware(name).unwrap().to_def()
    }

    #[test]
    fn load_and_lookup() {
        let mut deck = Deck::new();
        deck.load("tips", def("tiprack-200ul"), Slot::parse("A1").unwrap())
            .unwrap();
        deck.load("cells", def("24-well-plate"), Slot::parse("C1").unwrap())
            .unwrap();

        assert_eq!(deck.container("tips").unwrap().well_count(), 96);
        assert!(deck.container("nope").is_err());
    }

    #[test]
    fn rejects_double_occupancy() {
        let mut deck = Deck::new();
        let slot = Slot::parse("B1").unwrap();
        deck.load("plate", def("96-flat"), slot).unwrap();
        let err = deck.load("other", def("96-flat"), slot).unwrap_err();
        assert!(matches!(err, LabwareError::SlotOccupied { .. }));
    }

    #[test]
    fn rejects_duplicate_id() {
        let mut deck = Deck::new();
        deck.load("plate", def("96-flat"), Slot::parse("B1").unwrap())
            .unwrap();
        assert!(
            deck.load("plate", def("96-flat"), Slot::parse("B2").unwrap())
                .is_err()
        );
    }

    #[test]
    fn placements_sorted_by_slot() {
        let mut deck = Deck::new();
        deck.load("b", def("96-flat"), Slot::parse("C1").unwrap())
            .unwrap();
        deck.load("a", def("96-flat"), Slot::parse("A1").unwrap())
            .unwrap();
        let slots: Vec<String> = deck
            .placements()
            .iter()
            .map(|c| c.slot.to_string())
            .collect();
        assert_eq!(slots, ["A1", "C1"]);
    }
}
