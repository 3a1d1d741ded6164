//! Container geometry definitions.

use aq_core::numeric::{ensure_finite, ensure_positive};
use crate::error::{LabwareError, LabwareResult};
use serde::{Deserialize, Serialize};

/// Geometry of a container: a rectangular grid of identical wells.
///
/// All lengths are millimeters, volumes microliters; serde-facing raw f64
/// with unit-suffixed names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerDef {
    pub name: String,
    /// (rows, columns)
    pub grid: (usize, usize),
    /// Well center-to-center spacing (x, y)
    pub spacing_mm: (f64, f64),
    pub diameter_mm: f64,
    pub depth_mm: f64,
    /// Nominal working volume per well.
    pub well_volume_ul: f64,
}

impl ContainerDef {
    /// Define a one-off container geometry not in the builtin catalog.
    pub fn custom(
        name: &str,
        grid: (usize, usize),
        spacing_mm: (f64, f64),
        diameter_mm: f64,
        depth_mm: f64,
        well_volume_ul: f64,
    ) -> LabwareResult<Self> {
        let def = Self {
            name: name.to_string(),
            grid,
            spacing_mm,
            diameter_mm,
            depth_mm,
            well_volume_ul,
        };
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> LabwareResult<()> {
        if self.grid.0 == 0 || self.grid.1 == 0 {
            return Err(LabwareError::InvalidGeometry {
                what: "grid dimensions must be at least 1x1",
            });
        }
        if self.grid.0 > 26 {
            return Err(LabwareError::InvalidGeometry {
                what: "more than 26 rows cannot be addressed by a single letter",
            });
        }
        for (value, what) in [
            (self.spacing_mm.0, "well spacing must be non-negative"),
            (self.spacing_mm.1, "well spacing must be non-negative"),
        ] {
            let value = ensure_finite(value, what)
                .map_err(|_| LabwareError::InvalidGeometry { what })?;
            if value < 0.0 {
                return Err(LabwareError::InvalidGeometry { what });
            }
        }
        for (value, what) in [
            (self.diameter_mm, "well diameter must be positive"),
            (self.depth_mm, "well depth must be positive"),
            (self.well_volume_ul, "well volume must be positive"),
        ] {
            ensure_positive(value, what)
                .map_err(|_| LabwareError::InvalidGeometry { what })?;
        }
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.grid.0
    }

    pub fn cols(&self) -> usize {
        self.grid.1
    }

    pub fn well_count(&self) -> usize {
        self.grid.0 * self.grid.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_container() {
        // The custom imaging plate from the demo deck layout.
        let def =
            ContainerDef::custom("96_flat_imaging", (6, 10), (9.0, 9.0), 6.4, 8.4, 360.0).unwrap();
        assert_eq!(def.well_count(), 60);
        assert_eq!(def.rows(), 6);
    }

    #[test]
    fn rejects_zero_grid() {
        assert!(ContainerDef::custom("bad", (0, 10), (9.0, 9.0), 6.4, 8.4, 360.0).is_err());
    }

    #[test]
    fn rejects_non_positive_depth() {
        assert!(ContainerDef::custom("bad", (6, 10), (9.0, 9.0), 6.4, 0.0, 360.0).is_err());
        assert!(ContainerDef::custom("bad", (6, 10), (9.0, 9.0), 6.4, -1.0, 360.0).is_err());
    }

    #[test]
    fn rejects_nan_spacing() {
        assert!(ContainerDef::custom("bad", (6, 10), (f64::NAN, 9.0), 6.4, 8.4, 360.0).is_err());
    }
}
