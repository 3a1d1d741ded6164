//! Lowering a validated protocol into engine values.

use crate::schema::{Protocol, TransferDef, TransferOptionsDef};
use crate::validate::resolve_labware;
use crate::{ProjectError, ProjectResult, ValidationError};
use aq_core::units::ul;
use aq_driver::HeadSpeed;
use aq_labware::{Deck, LabwareError, Slot, WellAddress};
use aq_protocol::{Axis, Pipette, PlannedTransfer, ProtocolRun, TransferOptions};

/// Build a runnable `ProtocolRun` from a validated protocol definition.
///
/// Callers are expected to run `validate_protocol` first (`load_yaml` does);
/// dangling references surface here as labware errors rather than panics.
pub fn build_run(protocol: &Protocol) -> ProjectResult<ProtocolRun> {
    let mut deck = Deck::new();
    for placement in &protocol.deck {
        let def = resolve_labware(protocol, &placement.labware).ok_or_else(|| {
            LabwareError::UnknownLabware {
                name: placement.labware.clone(),
            }
        })?;
        let slot = Slot::parse(&placement.slot)?;
        deck.load(&placement.id, def, slot)?;
    }

    let axis = Axis::parse(&protocol.pipette.axis).ok_or_else(|| {
        ProjectError::Validation(ValidationError::InvalidValue {
            field: "pipette.axis".to_string(),
            value: protocol.pipette.axis.clone(),
            reason: "expected 'a' or 'b'".to_string(),
        })
    })?;
    let mut pipette = Pipette::new(
        axis,
        ul(protocol.pipette.max_volume_ul),
        protocol.pipette.tip_racks.clone(),
    );
    if let (Some(tip), Some(first_rack_id)) = (
        &protocol.pipette.starting_tip,
        protocol.pipette.tip_racks.first(),
    ) {
        let addr = WellAddress::parse(tip)?;
        let first_rack = deck.container(first_rack_id)?;
        pipette.set_starting_tip(addr.to_index(first_rack.def.rows()));
    }

    let head_speed = match &protocol.head_speed {
        Some(def) => HeadSpeed {
            combined_mm_min: def.combined_mm_min,
            x_mm_min: def.x_mm_min,
            y_mm_min: def.y_mm_min,
            z_mm_min: def.z_mm_min,
        },
        None => HeadSpeed::default(),
    };

    let plan = flatten_transfers(protocol, &deck)?;

    Ok(ProtocolRun {
        deck,
        pipette,
        trash_id: protocol.trash.clone(),
        head_speed,
        plan,
    })
}

fn flatten_transfers(protocol: &Protocol, deck: &Deck) -> ProjectResult<Vec<PlannedTransfer>> {
    let mut plan = Vec::new();
    for transfer in &protocol.transfers {
        match transfer {
            TransferDef::Single {
                volume_ul,
                source,
                destination,
                options,
            } => {
                plan.push(PlannedTransfer {
                    volume_ul: *volume_ul,
                    source: (source.labware.clone(), WellAddress::parse(&source.well)?),
                    destination: (
                        destination.labware.clone(),
                        WellAddress::parse(&destination.well)?,
                    ),
                    options: lower_options(options),
                });
            }
            TransferDef::WellMap {
                volume_ul,
                source_labware,
                destination_labware,
                count,
                options,
            } => {
                let source = deck.container(source_labware)?;
                let destination = deck.container(destination_labware)?;
                for (s, d) in source.wells().zip(destination.wells()).take(*count) {
                    plan.push(PlannedTransfer {
                        volume_ul: *volume_ul,
                        source: (source_labware.clone(), s.address),
                        destination: (destination_labware.clone(), d.address),
                        options: lower_options(options),
                    });
                }
            }
        }
    }
    Ok(plan)
}

fn lower_options(def: &TransferOptionsDef) -> TransferOptions {
    TransferOptions {
        air_gap_ul: def.air_gap_ul,
        mix_before: def.mix_before,
        mix_after: def.mix_after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn protocol() -> Protocol {
        serde_yaml::from_str(
            r#"
version: 1
name: imaging-prep
custom_labware:
  - name: 96_flat_imaging
    grid: [6, 10]
    spacing_mm: [9.0, 9.0]
    diameter_mm: 6.4
    depth_mm: 8.4
    well_volume_ul: 360.0
deck:
  - { id: tips, labware: tiprack-200ul, slot: A1 }
  - { id: plate, labware: 96_flat_imaging, slot: B1 }
  - { id: cells, labware: 24-well-plate, slot: C1 }
  - { id: stain, labware: tube-rack-2ml, slot: B2 }
  - { id: trash, labware: tiprack-200ul, slot: D2 }
pipette:
  axis: b
  max_volume_ul: 200.0
  tip_racks: [tips]
  starting_tip: A1
trash: trash
transfers:
  - type: WellMap
    volume_ul: 50.0
    source_labware: cells
    destination_labware: plate
    count: 10
    options: { mix_before: true }
  - type: Single
    volume_ul: 400.0
    source: { labware: stain, well: A1 }
    destination: { labware: plate, well: A2 }
    options: { mix_after: true }
"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_full_run() {
        let p = protocol();
        crate::validate_protocol(&p).unwrap();
        let run = build_run(&p).unwrap();

        assert_eq!(run.deck.placements().len(), 5);
        assert_eq!(run.plan.len(), 11);
        assert_eq!(run.trash_id, "trash");
        assert!((run.pipette.max_volume_ul() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn well_map_pairs_in_well_order() {
        let run = build_run(&protocol()).unwrap();
        let first = &run.plan[0];
        assert_eq!(first.source.0, "cells");
        assert_eq!(first.source.1.to_string(), "A1");
        assert_eq!(first.destination.1.to_string(), "A1");
        // 24-well plate has 4 rows; the fifth pairing starts column 2.
        let fifth = &run.plan[4];
        assert_eq!(fifth.source.1.to_string(), "A2");
        assert!(first.options.mix_before);
    }

    #[test]
    fn single_transfer_keeps_options() {
        let run = build_run(&protocol()).unwrap();
        let last = run.plan.last().unwrap();
        assert_eq!(last.volume_ul, 400.0);
        assert!(last.options.mix_after);
        assert!(!last.options.mix_before);
    }

    #[test]
    fn unknown_labware_surfaces_from_unvalidated_build() {
        let mut p = protocol();
        p.deck[0].labware = "384-deep".to_string();
        let err = build_run(&p).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Labware(LabwareError::UnknownLabware { .. })
        ));
    }

    #[test]
    fn custom_head_speed_is_lowered() {
        let mut p = protocol();
        p.head_speed = Some(HeadSpeedDef {
            combined_mm_min: 10_000.0,
            x_mm_min: 10_000.0,
            y_mm_min: 10_000.0,
            z_mm_min: 1_000.0,
        });
        let run = build_run(&p).unwrap();
        assert_eq!(run.head_speed.z_mm_min, 1_000.0);
    }
}
