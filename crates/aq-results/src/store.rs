//! Run storage API.

use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};
use aq_driver::{Command, CommandLog};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store rooted next to the protocol file, under `.aliquot/runs`.
    pub fn for_protocol(protocol_path: &Path) -> ResultsResult<Self> {
        let protocol_dir = protocol_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "protocol path has no parent directory".to_string(),
            })?;
        let runs_dir = protocol_dir.join(".aliquot").join("runs");
        Self::new(runs_dir)
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join("manifest.json").exists()
    }

    pub fn save_run(&self, manifest: &RunManifest, log: &CommandLog) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let manifest_path = run_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(manifest_path, manifest_json)?;

        let commands_path = run_dir.join("commands.jsonl");
        let mut content = String::new();
        for command in log.iter() {
            let line = serde_json::to_string(command)?;
            content.push_str(&line);
            content.push('\n');
        }
        fs::write(commands_path, content)?;

        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_commands(&self, run_id: &str) -> ResultsResult<CommandLog> {
        let commands_path = self.run_dir(run_id).join("commands.jsonl");

        if !commands_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(commands_path)?;
        let mut commands = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let command: Command = serde_json::from_str(line)?;
                commands.push(command);
            }
        }

        Ok(commands.into())
    }

    pub fn list_runs(&self, protocol_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.protocol_name == protocol_name
                {
                    runs.push(manifest);
                }
            }
        }

        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
