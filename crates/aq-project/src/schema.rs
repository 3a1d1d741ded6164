//! Protocol file schema definitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Protocol {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub custom_labware: Vec<CustomLabwareDef>,
    #[serde(default)]
    pub deck: Vec<PlacementDef>,
    pub pipette: PipetteDef,
    /// Placement id of the container that receives used tips.
    pub trash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_speed: Option<HeadSpeedDef>,
    #[serde(default)]
    pub transfers: Vec<TransferDef>,
}

/// A container geometry defined inline, the `containers.create` path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomLabwareDef {
    pub name: String,
    /// (rows, columns)
    pub grid: (usize, usize),
    pub spacing_mm: (f64, f64),
    pub diameter_mm: f64,
    pub depth_mm: f64,
    pub well_volume_ul: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementDef {
    pub id: String,
    /// Builtin catalog name or a `custom_labware` name.
    pub labware: String,
    pub slot: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipetteDef {
    pub axis: String,
    pub max_volume_ul: f64,
    pub tip_racks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_tip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadSpeedDef {
    pub combined_mm_min: f64,
    pub x_mm_min: f64,
    pub y_mm_min: f64,
    pub z_mm_min: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TransferDef {
    /// One transfer between two named wells.
    Single {
        volume_ul: f64,
        source: WellRefDef,
        destination: WellRefDef,
        #[serde(default)]
        options: TransferOptionsDef,
    },
    /// Pair wells 0..count of two containers, in well order.
    WellMap {
        volume_ul: f64,
        source_labware: String,
        destination_labware: String,
        count: usize,
        #[serde(default)]
        options: TransferOptionsDef,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellRefDef {
    pub labware: String,
    pub well: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferOptionsDef {
    #[serde(default = "default_air_gap_ul")]
    pub air_gap_ul: f64,
    #[serde(default)]
    pub mix_before: bool,
    #[serde(default)]
    pub mix_after: bool,
}

impl Default for TransferOptionsDef {
    fn default() -> Self {
        Self {
            air_gap_ul: default_air_gap_ul(),
            mix_before: false,
            mix_after: false,
        }
    }
}

fn default_air_gap_ul() -> f64 {
    5.0
}
