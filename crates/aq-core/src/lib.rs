//! aq-core: stable foundation for aliquot.
//!
//! Contains:
//! - units (uom volume/length types + constructors, deck constants)
//! - numeric (Real + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{AqError, AqResult};
pub use numeric::*;
pub use units::*;
