//! aq-protocol: pipette model and the sterile transfer engine.
//!
//! Provides:
//! - `Pipette`: axis, max volume, tip racks, tip cursor/state
//! - `SterileSession`: single-use-tip transfers with volume splitting,
//!   the periodic re-home policy, and trash tracking
//! - `ProtocolRun`: the record-then-replay bracket around a transfer plan
//!
//! # Architecture
//!
//! All device traffic goes through an `aq_driver::Controller`; this crate
//! issues commands, it never talks to a transport. Session state (trash
//! cursor, re-home counter, tip cursor) lives in explicit objects scoped to
//! one protocol run.

pub mod error;
pub mod pipette;
pub mod runner;
pub mod transfer;

pub use error::{ProtocolError, ProtocolResult};
pub use pipette::{Axis, Pipette};
pub use runner::{PlannedTransfer, ProtocolRun};
pub use transfer::{
    MIX_REPETITIONS, REHOME_INTERVAL, SterileSession, TRANSIT_AIR_GAP_UL, TransferOptions,
};
