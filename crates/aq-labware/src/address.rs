//! Well addressing: row letter + 1-based column number ("A1", "D6").

use crate::error::{LabwareError, LabwareResult};
use core::fmt;
use serde::{Deserialize, Serialize};

/// A well address inside a container grid.
///
/// Row and column are stored 0-based; the text form is row letter (A = row 0)
/// followed by the 1-based column number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WellAddress {
    pub row: usize,
    pub col: usize,
}

impl WellAddress {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse "A1"-style text. Single row letter only (containers here never
    /// exceed 26 rows).
    pub fn parse(s: &str) -> LabwareResult<Self> {
        let s = s.trim();
        let mut chars = s.chars();
        let row_ch = chars.next().ok_or_else(|| LabwareError::BadAddress {
            what: "empty well address".to_string(),
        })?;
        if !row_ch.is_ascii_alphabetic() {
            return Err(LabwareError::BadAddress {
                what: format!("well address '{s}' must start with a row letter"),
            });
        }
        let digits: String = chars.collect();
        let col: usize = digits.parse().map_err(|_| LabwareError::BadAddress {
            what: format!("well address '{s}' has no column number"),
        })?;
        if col == 0 {
            return Err(LabwareError::BadAddress {
                what: format!("well address '{s}' column is 1-based"),
            });
        }
        let row = (row_ch.to_ascii_uppercase() as u8 - b'A') as usize;
        Ok(Self { row, col: col - 1 })
    }

    /// Linear well index for a container with `rows` rows, column-major
    /// (A1, B1, ..., A2, B2, ...), matching labware well iteration order.
    pub fn to_index(self, rows: usize) -> usize {
        self.col * rows + self.row
    }

    /// Inverse of [`WellAddress::to_index`].
    pub fn from_index(index: usize, rows: usize) -> Self {
        Self {
            row: index % rows,
            col: index / rows,
        }
    }
}

impl fmt::Display for WellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_ch = (b'A' + self.row as u8) as char;
        write!(f, "{}{}", row_ch, self.col + 1)
    }
}

impl TryFrom<String> for WellAddress {
    type Error = LabwareError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<WellAddress> for String {
    fn from(addr: WellAddress) -> Self {
        addr.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trip() {
        for text in ["A1", "B1", "H12", "D6"] {
            let addr = WellAddress::parse(text).unwrap();
            assert_eq!(addr.to_string(), text);
        }
    }

    #[test]
    fn parse_lowercase() {
        assert_eq!(WellAddress::parse("c3").unwrap(), WellAddress::new(2, 2));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(WellAddress::parse("").is_err());
        assert!(WellAddress::parse("A").is_err());
        assert!(WellAddress::parse("A0").is_err());
        assert!(WellAddress::parse("12").is_err());
    }

    #[test]
    fn index_is_column_major() {
        // 8-row plate: A1=0, B1=1, ..., H1=7, A2=8
        let rows = 8;
        assert_eq!(WellAddress::parse("A1").unwrap().to_index(rows), 0);
        assert_eq!(WellAddress::parse("H1").unwrap().to_index(rows), 7);
        assert_eq!(WellAddress::parse("A2").unwrap().to_index(rows), 8);
    }

    #[test]
    fn index_round_trip() {
        let rows = 4;
        for i in 0..24 {
            let addr = WellAddress::from_index(i, rows);
            assert_eq!(addr.to_index(rows), i);
        }
    }
}
