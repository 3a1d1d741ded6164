//! Stored run metadata.

use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub protocol_name: String,
    /// RFC 3339 recording time.
    pub timestamp: String,
    pub command_count: usize,
    pub transfer_count: usize,
    pub engine_version: String,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn now(
        run_id: RunId,
        protocol_name: &str,
        command_count: usize,
        transfer_count: usize,
        engine_version: &str,
    ) -> Self {
        Self {
            run_id,
            protocol_name: protocol_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command_count,
            transfer_count,
            engine_version: engine_version.to_string(),
        }
    }
}
