use aq_driver::{Command, CommandLog};
use aq_results::*;

fn manifest(run_id: &str, protocol_name: &str, timestamp: &str) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        protocol_name: protocol_name.to_string(),
        timestamp: timestamp.to_string(),
        command_count: 2,
        transfer_count: 1,
        engine_version: "v1".to_string(),
    }
}

#[test]
fn save_and_load_run() {
    let temp_dir = std::env::temp_dir().join("aq_results_test");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir.clone()).unwrap();

    let manifest = manifest("test_run_123", "imaging-prep", "2026-08-31T12:00:00Z");
    let log: CommandLog = vec![
        Command::Aspirate { volume_ul: 50.0 },
        Command::Dispense { volume_ul: 50.0 },
    ]
    .into();

    store.save_run(&manifest, &log).unwrap();
    assert!(store.has_run("test_run_123"));

    let loaded_manifest = store.load_manifest("test_run_123").unwrap();
    assert_eq!(loaded_manifest.run_id, manifest.run_id);
    assert_eq!(loaded_manifest.command_count, 2);

    let loaded_log = store.load_commands("test_run_123").unwrap();
    assert_eq!(loaded_log, log);
}

#[test]
fn missing_run_is_reported() {
    let temp_dir = std::env::temp_dir().join("aq_results_test_missing");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir).unwrap();
    assert!(!store.has_run("nope"));
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
    assert!(matches!(
        store.load_commands("nope"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn list_runs_by_protocol() {
    let temp_dir = std::env::temp_dir().join("aq_results_test_list");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let store = RunStore::new(temp_dir).unwrap();

    store
        .save_run(
            &manifest("run1", "stain", "2026-08-31T12:00:00Z"),
            &CommandLog::new(),
        )
        .unwrap();
    store
        .save_run(
            &manifest("run2", "stain", "2026-08-31T13:00:00Z"),
            &CommandLog::new(),
        )
        .unwrap();
    store
        .save_run(
            &manifest("run3", "wash", "2026-08-31T14:00:00Z"),
            &CommandLog::new(),
        )
        .unwrap();

    assert_eq!(store.list_runs("stain").unwrap().len(), 2);
    assert_eq!(store.list_runs("wash").unwrap().len(), 1);

    store.delete_run("run3").unwrap();
    assert!(store.list_runs("wash").unwrap().is_empty());
}
