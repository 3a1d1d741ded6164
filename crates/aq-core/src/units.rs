// aq-core/src/units.rs

use uom::si::f64::{Length as UomLength, Volume as UomVolume};

// Public canonical unit types (SI, f64)
pub type Length = UomLength;
pub type Volume = UomVolume;

#[inline]
pub fn ul(v: f64) -> Volume {
    use uom::si::volume::microliter;
    Volume::new::<microliter>(v)
}

#[inline]
pub fn ml(v: f64) -> Volume {
    use uom::si::volume::milliliter;
    Volume::new::<milliliter>(v)
}

#[inline]
pub fn as_ul(v: Volume) -> f64 {
    use uom::si::volume::microliter;
    v.get::<microliter>()
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn as_mm(v: Length) -> f64 {
    use uom::si::length::millimeter;
    v.get::<millimeter>()
}

/// A point in the deck coordinate frame, millimeters.
///
/// Raw f64 fields so the type can cross the wire (commands, stored logs)
/// without unit machinery.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x_mm: f64,
    pub y_mm: f64,
    pub z_mm: f64,
}

impl Position {
    pub fn new(x_mm: f64, y_mm: f64, z_mm: f64) -> Self {
        Self { x_mm, y_mm, z_mm }
    }
}

pub mod constants {
    /// Center-to-center pitch between deck slot columns (mm).
    pub const SLOT_PITCH_X_MM: f64 = 135.0;
    /// Center-to-center pitch between deck slot rows (mm).
    pub const SLOT_PITCH_Y_MM: f64 = 90.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = ul(200.0);
        let _v2 = ml(2.0);
        let _l = mm(9.0);
        let _p = Position::new(0.0, 9.0, 8.4);
    }

    #[test]
    fn volume_round_trip() {
        assert!((as_ul(ul(195.0)) - 195.0).abs() < 1e-9);
        assert!((as_ul(ml(1.0)) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn length_round_trip() {
        assert!((as_mm(mm(6.4)) - 6.4).abs() < 1e-12);
    }
}
