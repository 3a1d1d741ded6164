//! Builtin labware catalog.

use crate::definition::ContainerDef;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    pub canonical_name: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub grid: (usize, usize),
    pub spacing_mm: (f64, f64),
    pub diameter_mm: f64,
    pub depth_mm: f64,
    pub well_volume_ul: f64,
}

impl CatalogEntry {
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.canonical_name.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }

    pub fn to_def(&self) -> ContainerDef {
        ContainerDef {
            name: self.canonical_name.to_string(),
            grid: self.grid,
            spacing_mm: self.spacing_mm,
            diameter_mm: self.diameter_mm,
            depth_mm: self.depth_mm,
            well_volume_ul: self.well_volume_ul,
        }
    }
}

const BUILTIN_CATALOG: [CatalogEntry; 6] = [
    CatalogEntry {
        canonical_name: "tiprack-200ul",
        display_name: "200 uL Tip Rack",
        aliases: &["tiprack", "p200 tips"],
        grid: (8, 12),
        spacing_mm: (9.0, 9.0),
        diameter_mm: 3.5,
        depth_mm: 60.0,
        well_volume_ul: 200.0,
    },
    CatalogEntry {
        canonical_name: "96-flat",
        display_name: "96 Well Plate (flat bottom)",
        aliases: &["96 well plate", "microplate"],
        grid: (8, 12),
        spacing_mm: (9.0, 9.0),
        diameter_mm: 6.4,
        depth_mm: 10.5,
        well_volume_ul: 400.0,
    },
    CatalogEntry {
        canonical_name: "24-well-plate",
        display_name: "24 Well Plate",
        aliases: &["24 well plate", "cell culture plate"],
        grid: (4, 6),
        spacing_mm: (19.3, 19.3),
        diameter_mm: 16.3,
        depth_mm: 17.4,
        well_volume_ul: 3400.0,
    },
    CatalogEntry {
        canonical_name: "tube-rack-2ml",
        display_name: "2 mL Tube Rack",
        aliases: &["tube rack", "eppendorf rack"],
        grid: (4, 6),
        spacing_mm: (19.5, 19.5),
        diameter_mm: 9.5,
        depth_mm: 40.0,
        well_volume_ul: 2000.0,
    },
    CatalogEntry {
        canonical_name: "trough-12row",
        display_name: "12 Row Reagent Trough",
        aliases: &["trough", "reservoir"],
        grid: (1, 12),
        spacing_mm: (9.0, 0.0),
        diameter_mm: 8.0,
        depth_mm: 39.2,
        well_volume_ul: 22_000.0,
    },
    CatalogEntry {
        canonical_name: "point",
        display_name: "Single Point",
        aliases: &["calibration point"],
        grid: (1, 1),
        spacing_mm: (0.0, 0.0),
        diameter_mm: 1.0,
        depth_mm: 1.0,
        well_volume_ul: 1.0,
    },
];

/// The full builtin catalog, in display order.
pub fn labware_catalog() -> &'static [CatalogEntry] {
    &BUILTIN_CATALOG
}

/// Catalog entries whose name or aliases contain the query.
pub fn search_labware(query: &str) -> Vec<CatalogEntry> {
    labware_catalog()
        .iter()
        .copied()
        .filter(|entry| entry.matches_query(query))
        .collect()
}

/// Find a builtin container by canonical name or alias (case-insensitive,
/// exact match).
pub fn find_labware(name: &str) -> Option<&'static CatalogEntry> {
    let name = name.trim();
    BUILTIN_CATALOG.iter().find(|entry| {
        entry.canonical_name.eq_ignore_ascii_case(name)
            || entry.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    })
}
