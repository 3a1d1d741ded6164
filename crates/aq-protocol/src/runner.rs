//! Protocol runs: the record-then-replay bracket around a transfer plan.

use crate::error::ProtocolResult;
use crate::pipette::Pipette;
use crate::transfer::{SterileSession, TransferOptions};
use aq_core::units::ul;
use aq_driver::{CommandLog, ConnectionMode, Controller, HeadSpeed};
use aq_labware::{Deck, WellAddress};

/// One entry of the flattened transfer plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedTransfer {
    pub volume_ul: f64,
    pub source: (String, WellAddress),
    pub destination: (String, WellAddress),
    pub options: TransferOptions,
}

/// A complete protocol: deck layout, pipette, trash, head speed, plan.
///
/// `simulate` records the whole command sequence without anything reaching
/// the device; `execute` additionally switches the connection live and
/// replays the captured log, so the device only ever sees a plan that
/// recorded cleanly end to end.
#[derive(Debug)]
pub struct ProtocolRun {
    pub deck: Deck,
    pub pipette: Pipette,
    pub trash_id: String,
    pub head_speed: HeadSpeed,
    pub plan: Vec<PlannedTransfer>,
}

impl ProtocolRun {
    /// Record the protocol in simulate mode and return the captured log.
    pub fn simulate(&mut self, ctrl: &mut Controller) -> ProtocolResult<CommandLog> {
        ctrl.set_mode(ConnectionMode::Simulate);
        ctrl.record_start()?;
        let result = self.run_plan(ctrl);
        // The bracket closes even when the plan fails partway.
        let log = ctrl.record_stop()?;
        result?;
        tracing::info!(
            transfers = self.plan.len(),
            commands = log.len(),
            "protocol recorded"
        );
        Ok(log)
    }

    /// Record, then go live and replay the captured log on the device.
    pub fn execute(&mut self, ctrl: &mut Controller) -> ProtocolResult<CommandLog> {
        ctrl.home()?;
        let log = self.simulate(ctrl)?;
        ctrl.set_mode(ConnectionMode::Live);
        ctrl.play(&log)?;
        Ok(log)
    }

    fn run_plan(&mut self, ctrl: &mut Controller) -> ProtocolResult<()> {
        ctrl.head_speed(self.head_speed)?;
        let mut session = SterileSession::new(&self.trash_id);
        for planned in &self.plan {
            let source = self
                .deck
                .container(&planned.source.0)?
                .well(planned.source.1)?;
            let destination = self
                .deck
                .container(&planned.destination.0)?
                .well(planned.destination.1)?;
            session.transfer(
                ctrl,
                &self.deck,
                &mut self.pipette,
                ul(planned.volume_ul),
                &source,
                &destination,
                &planned.options,
            )?;
        }
        Ok(())
    }
}
