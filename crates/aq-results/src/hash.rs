//! Content-based hashing for run IDs.

use aq_project::Protocol;
use sha2::{Digest, Sha256};

/// Hash the protocol definition and engine version into a stable run id.
///
/// The same protocol recorded with the same engine yields the same id, so
/// simulations can be cached.
pub fn compute_run_id(protocol: &Protocol, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let protocol_json = serde_json::to_string(protocol).unwrap_or_default();
    hasher.update(protocol_json.as_bytes());
    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_project::{PipetteDef, Protocol};

    fn protocol(name: &str) -> Protocol {
        Protocol {
            version: 1,
            name: name.to_string(),
            custom_labware: vec![],
            deck: vec![],
            pipette: PipetteDef {
                axis: "b".to_string(),
                max_volume_ul: 200.0,
                tip_racks: vec!["tips".to_string()],
                starting_tip: None,
            },
            trash: "trash".to_string(),
            head_speed: None,
            transfers: vec![],
        }
    }

    #[test]
    fn hash_stability() {
        let p = protocol("stain");
        let hash1 = compute_run_id(&p, "v1");
        let hash2 = compute_run_id(&p, "v1");
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let p1 = protocol("stain");
        let p2 = protocol("wash");
        assert_ne!(compute_run_id(&p1, "v1"), compute_run_id(&p2, "v1"));
        assert_ne!(compute_run_id(&p1, "v1"), compute_run_id(&p1, "v2"));
    }
}
