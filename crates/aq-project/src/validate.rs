//! Protocol validation logic.

use crate::schema::{Protocol, TransferDef, TransferOptionsDef};
use aq_labware::{ContainerDef, Slot, WellAddress, find_labware};
use aq_protocol::Axis;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Resolve a labware name against custom definitions first, then the builtin
/// catalog.
pub fn resolve_labware(protocol: &Protocol, name: &str) -> Option<ContainerDef> {
    if let Some(custom) = protocol.custom_labware.iter().find(|c| c.name == name) {
        return ContainerDef::custom(
            &custom.name,
            custom.grid,
            custom.spacing_mm,
            custom.diameter_mm,
            custom.depth_mm,
            custom.well_volume_ul,
        )
        .ok();
    }
    find_labware(name).map(|entry| entry.to_def())
}

pub fn validate_protocol(protocol: &Protocol) -> Result<(), ValidationError> {
    if protocol.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: protocol.version,
        });
    }

    let mut custom_names = HashSet::new();
    for custom in &protocol.custom_labware {
        if !custom_names.insert(&custom.name) {
            return Err(ValidationError::DuplicateId {
                id: custom.name.clone(),
                context: "custom_labware".to_string(),
            });
        }
        ContainerDef::custom(
            &custom.name,
            custom.grid,
            custom.spacing_mm,
            custom.diameter_mm,
            custom.depth_mm,
            custom.well_volume_ul,
        )
        .map_err(|e| ValidationError::InvalidValue {
            field: "custom_labware".to_string(),
            value: custom.name.clone(),
            reason: e.to_string(),
        })?;
    }

    let mut placement_ids = HashSet::new();
    let mut slots = HashSet::new();
    for placement in &protocol.deck {
        if !placement_ids.insert(&placement.id) {
            return Err(ValidationError::DuplicateId {
                id: placement.id.clone(),
                context: "deck".to_string(),
            });
        }
        let slot = Slot::parse(&placement.slot).map_err(|e| ValidationError::InvalidValue {
            field: "deck.slot".to_string(),
            value: placement.slot.clone(),
            reason: e.to_string(),
        })?;
        if !slots.insert(slot) {
            return Err(ValidationError::DuplicateId {
                id: placement.slot.clone(),
                context: "deck slots".to_string(),
            });
        }
        if resolve_labware(protocol, &placement.labware).is_none() {
            return Err(ValidationError::MissingReference {
                id: placement.labware.clone(),
                context: format!("deck placement '{}'", placement.id),
            });
        }
    }

    validate_pipette(protocol, &placement_ids)?;

    if !placement_ids.contains(&protocol.trash) {
        return Err(ValidationError::MissingReference {
            id: protocol.trash.clone(),
            context: "trash".to_string(),
        });
    }

    let transfer_count = validate_transfers(protocol, &placement_ids)?;

    // The trash receives one tip per transfer; the layout must hold them all.
    let trash_def = protocol
        .deck
        .iter()
        .find(|p| p.id == protocol.trash)
        .and_then(|p| resolve_labware(protocol, &p.labware));
    if let Some(def) = trash_def {
        if transfer_count > def.well_count() {
            return Err(ValidationError::InvalidValue {
                field: "transfers".to_string(),
                value: transfer_count.to_string(),
                reason: format!(
                    "trash '{}' holds only {} tips",
                    protocol.trash,
                    def.well_count()
                ),
            });
        }
    }

    Ok(())
}

fn validate_pipette(
    protocol: &Protocol,
    placement_ids: &HashSet<&String>,
) -> Result<(), ValidationError> {
    let pipette = &protocol.pipette;
    if Axis::parse(&pipette.axis).is_none() {
        return Err(ValidationError::InvalidValue {
            field: "pipette.axis".to_string(),
            value: pipette.axis.clone(),
            reason: "expected 'a' or 'b'".to_string(),
        });
    }
    if !(pipette.max_volume_ul.is_finite() && pipette.max_volume_ul > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "pipette.max_volume_ul".to_string(),
            value: pipette.max_volume_ul.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    if pipette.tip_racks.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "pipette.tip_racks".to_string(),
            value: "[]".to_string(),
            reason: "at least one tip rack is required".to_string(),
        });
    }
    for rack in &pipette.tip_racks {
        if !placement_ids.contains(rack) {
            return Err(ValidationError::MissingReference {
                id: rack.clone(),
                context: "pipette.tip_racks".to_string(),
            });
        }
    }
    if let Some(tip) = &pipette.starting_tip {
        WellAddress::parse(tip).map_err(|e| ValidationError::InvalidValue {
            field: "pipette.starting_tip".to_string(),
            value: tip.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(())
}

/// Validate the transfer list and return the flattened transfer count.
fn validate_transfers(
    protocol: &Protocol,
    placement_ids: &HashSet<&String>,
) -> Result<usize, ValidationError> {
    let mut total = 0;
    for (i, transfer) in protocol.transfers.iter().enumerate() {
        let context = format!("transfers[{i}]");
        match transfer {
            TransferDef::Single {
                volume_ul,
                source,
                destination,
                options,
            } => {
                check_volume(*volume_ul, options, protocol, &context)?;
                for well_ref in [source, destination] {
                    if !placement_ids.contains(&well_ref.labware) {
                        return Err(ValidationError::MissingReference {
                            id: well_ref.labware.clone(),
                            context: context.clone(),
                        });
                    }
                    WellAddress::parse(&well_ref.well).map_err(|e| {
                        ValidationError::InvalidValue {
                            field: format!("{context}.well"),
                            value: well_ref.well.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                }
                total += 1;
            }
            TransferDef::WellMap {
                volume_ul,
                source_labware,
                destination_labware,
                count,
                options,
            } => {
                check_volume(*volume_ul, options, protocol, &context)?;
                for id in [source_labware, destination_labware] {
                    if !placement_ids.contains(id) {
                        return Err(ValidationError::MissingReference {
                            id: id.clone(),
                            context: context.clone(),
                        });
                    }
                }
                let capacity = well_map_capacity(protocol, source_labware, destination_labware);
                if *count == 0 || *count > capacity {
                    return Err(ValidationError::InvalidValue {
                        field: format!("{context}.count"),
                        value: count.to_string(),
                        reason: format!("must be in 1..={capacity}"),
                    });
                }
                total += count;
            }
        }
    }
    Ok(total)
}

fn well_map_capacity(protocol: &Protocol, source_id: &str, destination_id: &str) -> usize {
    let count_of = |id: &str| {
        protocol
            .deck
            .iter()
            .find(|p| p.id == id)
            .and_then(|p| resolve_labware(protocol, &p.labware))
            .map(|def| def.well_count())
            .unwrap_or(0)
    };
    count_of(source_id).min(count_of(destination_id))
}

fn check_volume(
    volume_ul: f64,
    options: &TransferOptionsDef,
    protocol: &Protocol,
    context: &str,
) -> Result<(), ValidationError> {
    if !(volume_ul.is_finite() && volume_ul > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{context}.volume_ul"),
            value: volume_ul.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }
    if !(options.air_gap_ul.is_finite() && options.air_gap_ul >= 0.0) {
        return Err(ValidationError::InvalidValue {
            field: format!("{context}.options.air_gap_ul"),
            value: options.air_gap_ul.to_string(),
            reason: "must be non-negative and finite".to_string(),
        });
    }
    if options.air_gap_ul >= protocol.pipette.max_volume_ul {
        return Err(ValidationError::InvalidValue {
            field: format!("{context}.options.air_gap_ul"),
            value: options.air_gap_ul.to_string(),
            reason: "leaves no working capacity".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn base_protocol() -> Protocol {
        Protocol {
            version: 1,
            name: "test".to_string(),
            custom_labware: vec![],
            deck: vec![
                PlacementDef {
                    id: "tips".to_string(),
                    labware: "tiprack-200ul".to_string(),
                    slot: "A1".to_string(),
                },
                PlacementDef {
                    id: "cells".to_string(),
                    labware: "24-well-plate".to_string(),
                    slot: "C1".to_string(),
                },
                PlacementDef {
                    id: "plate".to_string(),
                    labware: "96-flat".to_string(),
                    slot: "B1".to_string(),
                },
                PlacementDef {
                    id: "trash".to_string(),
                    labware: "tiprack-200ul".to_string(),
                    slot: "D2".to_string(),
                },
            ],
            pipette: PipetteDef {
                axis: "b".to_string(),
                max_volume_ul: 200.0,
                tip_racks: vec!["tips".to_string()],
                starting_tip: Some("A1".to_string()),
            },
            trash: "trash".to_string(),
            head_speed: None,
            transfers: vec![TransferDef::WellMap {
                volume_ul: 50.0,
                source_labware: "cells".to_string(),
                destination_labware: "plate".to_string(),
                count: 10,
                options: TransferOptionsDef::default(),
            }],
        }
    }

    #[test]
    fn base_protocol_is_valid() {
        validate_protocol(&base_protocol()).unwrap();
    }

    #[test]
    fn rejects_future_version() {
        let mut p = base_protocol();
        p.version = 99;
        assert!(matches!(
            validate_protocol(&p),
            Err(ValidationError::UnsupportedVersion { version: 99 })
        ));
    }

    #[test]
    fn rejects_duplicate_slot() {
        let mut p = base_protocol();
        p.deck[1].slot = "A1".to_string();
        assert!(matches!(
            validate_protocol(&p),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_unknown_labware() {
        let mut p = base_protocol();
        p.deck[1].labware = "384-deep".to_string();
        assert!(matches!(
            validate_protocol(&p),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_dangling_trash() {
        let mut p = base_protocol();
        p.trash = "bin".to_string();
        assert!(matches!(
            validate_protocol(&p),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn rejects_bad_axis() {
        let mut p = base_protocol();
        p.pipette.axis = "q".to_string();
        assert!(validate_protocol(&p).is_err());
    }

    #[test]
    fn rejects_non_positive_volume() {
        let mut p = base_protocol();
        p.transfers = vec![TransferDef::Single {
            volume_ul: 0.0,
            source: WellRefDef {
                labware: "cells".to_string(),
                well: "A1".to_string(),
            },
            destination: WellRefDef {
                labware: "plate".to_string(),
                well: "A1".to_string(),
            },
            options: TransferOptionsDef::default(),
        }];
        assert!(validate_protocol(&p).is_err());
    }

    #[test]
    fn rejects_well_map_count_beyond_plates() {
        let mut p = base_protocol();
        // 24-well source caps the pairing at 24.
        p.transfers = vec![TransferDef::WellMap {
            volume_ul: 50.0,
            source_labware: "cells".to_string(),
            destination_labware: "plate".to_string(),
            count: 25,
            options: TransferOptionsDef::default(),
        }];
        assert!(validate_protocol(&p).is_err());
    }

    #[test]
    fn rejects_more_transfers_than_trash_slots() {
        let mut p = base_protocol();
        p.custom_labware = vec![CustomLabwareDef {
            name: "tiny-trash".to_string(),
            grid: (1, 2),
            spacing_mm: (9.0, 9.0),
            diameter_mm: 6.4,
            depth_mm: 8.4,
            well_volume_ul: 200.0,
        }];
        p.deck[3].labware = "tiny-trash".to_string();
        assert!(validate_protocol(&p).is_err());
    }

    #[test]
    fn custom_labware_resolves_for_placements() {
        let mut p = base_protocol();
        p.custom_labware = vec![CustomLabwareDef {
            name: "96_flat_imaging".to_string(),
            grid: (6, 10),
            spacing_mm: (9.0, 9.0),
            diameter_mm: 6.4,
            depth_mm: 8.4,
            well_volume_ul: 360.0,
        }];
        p.deck[2].labware = "96_flat_imaging".to_string();
        validate_protocol(&p).unwrap();
    }

    #[test]
    fn rejects_air_gap_at_max_volume() {
        let mut p = base_protocol();
        p.transfers = vec![TransferDef::WellMap {
            volume_ul: 50.0,
            source_labware: "cells".to_string(),
            destination_labware: "plate".to_string(),
            count: 4,
            options: TransferOptionsDef {
                air_gap_ul: 200.0,
                ..Default::default()
            },
        }];
        assert!(validate_protocol(&p).is_err());
    }
}
