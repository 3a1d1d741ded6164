//! The low-level instruction set and the recorded command log.

use serde::{Deserialize, Serialize};

/// One motion/actuation instruction, the unit of recording and playback.
///
/// Volumes are microliters, positions deck-frame millimeters, speeds mm/min.
/// Pipetting commands are plunger-only; motion is always an explicit `MoveTo`
/// so the log reads like the device traffic it stands for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Command {
    Home,
    SetHeadSpeed {
        combined_mm_min: f64,
        x_mm_min: f64,
        y_mm_min: f64,
        z_mm_min: f64,
    },
    MoveTo {
        x_mm: f64,
        y_mm: f64,
        z_mm: f64,
    },
    PickUpTip,
    DropTip,
    Aspirate {
        volume_ul: f64,
    },
    Dispense {
        volume_ul: f64,
    },
    AirGap {
        volume_ul: f64,
    },
    BlowOut,
    Mix {
        repetitions: u32,
        volume_ul: f64,
    },
}

impl Command {
    /// Short tag for display and log summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Home => "home",
            Command::SetHeadSpeed { .. } => "set_head_speed",
            Command::MoveTo { .. } => "move_to",
            Command::PickUpTip => "pick_up_tip",
            Command::DropTip => "drop_tip",
            Command::Aspirate { .. } => "aspirate",
            Command::Dispense { .. } => "dispense",
            Command::AirGap { .. } => "air_gap",
            Command::BlowOut => "blow_out",
            Command::Mix { .. } => "mix",
        }
    }
}

/// An ordered capture of issued commands, replayable via `Controller::play`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CommandLog(Vec<Command>);

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cmd: Command) {
        self.0.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.0.iter()
    }

    /// Count commands with the given tag (see [`Command::name`]).
    pub fn count_of(&self, name: &str) -> usize {
        self.0.iter().filter(|c| c.name() == name).count()
    }
}

impl From<Vec<Command>> for CommandLog {
    fn from(commands: Vec<Command>) -> Self {
        Self(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serde_tagged() {
        let cmd = Command::Aspirate { volume_ul: 195.0 };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"Aspirate\""));
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn log_serde_transparent() {
        let log: CommandLog = vec![Command::Home, Command::BlowOut].into();
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.starts_with('['));
        let back: CommandLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn count_of_filters_by_tag() {
        let log: CommandLog = vec![
            Command::Aspirate { volume_ul: 100.0 },
            Command::AirGap { volume_ul: 5.0 },
            Command::Aspirate { volume_ul: 50.0 },
        ]
        .into();
        assert_eq!(log.count_of("aspirate"), 2);
        assert_eq!(log.count_of("air_gap"), 1);
        assert_eq!(log.count_of("home"), 0);
    }
}
