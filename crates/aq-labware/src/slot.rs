//! Deck slot labels and origins.

use crate::error::{LabwareError, LabwareResult};
use aq_core::units::constants::{SLOT_PITCH_X_MM, SLOT_PITCH_Y_MM};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Deck rows A..E, columns 1..3.
pub const SLOT_ROWS: usize = 5;
pub const SLOT_COLS: usize = 3;

/// A deck slot label ("A1" through "E3").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    row: usize,
    col: usize,
}

impl Slot {
    pub fn parse(s: &str) -> LabwareResult<Self> {
        let s = s.trim();
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(LabwareError::BadAddress {
                what: format!("slot '{s}' must be a row letter and a column digit"),
            });
        }
        let row_ch = bytes[0].to_ascii_uppercase();
        let col_ch = bytes[1];
        if !(b'A'..=b'E').contains(&row_ch) || !(b'1'..=b'3').contains(&col_ch) {
            return Err(LabwareError::BadAddress {
                what: format!("slot '{s}' outside deck range A1..E3"),
            });
        }
        Ok(Self {
            row: (row_ch - b'A') as usize,
            col: (col_ch - b'1') as usize,
        })
    }

    /// Slot origin (front-left corner of the slot) in the deck frame, mm.
    pub fn origin_mm(self) -> (f64, f64) {
        (
            self.col as f64 * SLOT_PITCH_X_MM,
            self.row as f64 * SLOT_PITCH_Y_MM,
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_ch = (b'A' + self.row as u8) as char;
        write!(f, "{}{}", row_ch, self.col + 1)
    }
}

impl TryFrom<String> for Slot {
    type Error = LabwareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}
