//! aq-driver: robot controller abstraction for aliquot.
//!
//! Provides:
//! - The low-level `Command` instruction set and `CommandLog`
//! - The `Backend` trait isolating the engine from the physical transport
//! - `Controller` with connection modes and the record/replay bracket
//!
//! # Architecture
//!
//! Real G-code generation and serial I/O live behind the `Backend` trait and
//! are out of scope here; the builtin backends are a counting sink
//! (`NullBackend`) and a `tracing` logger (`TraceBackend`). The `Controller`
//! implements the record-then-replay execution model: commands issued while a
//! recording is active in `Simulate` mode are captured without reaching the
//! device, and `play` later streams the captured log to the backend in `Live`
//! mode.

pub mod backend;
pub mod command;
pub mod controller;
pub mod error;

pub use backend::{Backend, NullBackend, TraceBackend};
pub use command::{Command, CommandLog};
pub use controller::{ConnectionMode, Controller, HeadSpeed};
pub use error::{DriverError, DriverResult};
