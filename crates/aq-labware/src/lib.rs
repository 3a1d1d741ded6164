//! aq-labware: deck and labware modeling for aliquot.
//!
//! Provides:
//! - Well addressing ("A1" style row letter + column number)
//! - Container definitions (grid, spacing, diameter, depth)
//! - A builtin labware catalog plus custom container creation
//! - Deck slots and container placement with resolved well positions
//!
//! # Architecture
//!
//! Labware is read-only once placed: a `ContainerDef` describes the geometry,
//! `Deck::load` pins it to a `Slot`, and downstream code resolves `Well`s with
//! deck-frame positions from the placement. Nothing here talks to the robot;
//! the driver crate consumes the resolved positions.

pub mod address;
pub mod catalog;
pub mod container;
pub mod deck;
pub mod definition;
pub mod error;
pub mod slot;

pub use address::WellAddress;
pub use catalog::{CatalogEntry, find_labware, labware_catalog, search_labware};
pub use container::{Container, Well};
pub use deck::Deck;
pub use definition::ContainerDef;
pub use error::{LabwareError, LabwareResult};
pub use slot::Slot;
