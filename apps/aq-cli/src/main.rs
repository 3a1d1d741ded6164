use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use aq_driver::{ConnectionMode, Controller, TraceBackend};
use aq_labware::search_labware;
use aq_project::{ProjectError, build_run, load_yaml};
use aq_protocol::ProtocolError;
use aq_results::{ResultsError, RunManifest, RunStore, compute_run_id};

const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "aq-cli")]
#[command(about = "Aliquot CLI - Liquid-handling protocol tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate protocol file syntax and structure
    Validate {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
    },
    /// Show the deck layout of a protocol
    Deck {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
    },
    /// Search the builtin labware catalog
    Labware {
        /// Name fragment to match (lists everything when omitted)
        query: Option<String>,
    },
    /// Record the protocol in simulate mode and cache the command log
    Simulate {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
        /// Skip cache and force re-recording
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a protocol
    Runs {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
    /// Replay a cached command log on the live connection
    Play {
        /// Path to the protocol YAML file
        protocol_path: PathBuf,
        /// Run ID to replay
        run_id: String,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Results(#[from] ResultsError),

    #[error(transparent)]
    Driver(#[from] aq_driver::DriverError),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { protocol_path } => cmd_validate(&protocol_path),
        Commands::Deck { protocol_path } => cmd_deck(&protocol_path),
        Commands::Labware { query } => cmd_labware(query.as_deref().unwrap_or("")),
        Commands::Simulate {
            protocol_path,
            no_cache,
        } => cmd_simulate(&protocol_path, !no_cache),
        Commands::Runs { protocol_path } => cmd_runs(&protocol_path),
        Commands::ShowRun {
            protocol_path,
            run_id,
        } => cmd_show_run(&protocol_path, &run_id),
        Commands::Play {
            protocol_path,
            run_id,
        } => cmd_play(&protocol_path, &run_id),
    }
}

fn cmd_validate(protocol_path: &Path) -> CliResult<()> {
    println!("Validating protocol: {}", protocol_path.display());
    let protocol = load_yaml(protocol_path)?;
    build_run(&protocol)?;
    println!("✓ Protocol is valid");
    Ok(())
}

fn cmd_deck(protocol_path: &Path) -> CliResult<()> {
    let protocol = load_yaml(protocol_path)?;
    let run = build_run(&protocol)?;

    println!("Deck for '{}':", protocol.name);
    for container in run.deck.placements() {
        println!(
            "  {}  {:<20} {} ({} wells)",
            container.slot,
            container.def.name,
            container.id,
            container.well_count()
        );
    }
    println!(
        "Pipette: axis {}, {} uL max, {} transfers planned",
        run.pipette.axis,
        protocol.pipette.max_volume_ul,
        run.plan.len()
    );
    Ok(())
}

fn cmd_labware(query: &str) -> CliResult<()> {
    let entries = search_labware(query);
    if entries.is_empty() {
        println!("No labware matches '{}'", query);
        return Ok(());
    }
    for entry in entries {
        let def = entry.to_def();
        println!(
            "  {:<16} {:<32} {}x{} wells, {} uL",
            entry.canonical_name,
            entry.display_name,
            def.rows(),
            def.cols(),
            def.well_volume_ul
        );
    }
    Ok(())
}

fn cmd_simulate(protocol_path: &Path, use_cache: bool) -> CliResult<()> {
    let protocol = load_yaml(protocol_path)?;
    let store = RunStore::for_protocol(protocol_path)?;
    let run_id = compute_run_id(&protocol, ENGINE_VERSION);

    if use_cache && store.has_run(&run_id) {
        println!("✓ Loaded from cache: {}", run_id);
        return Ok(());
    }

    let mut run = build_run(&protocol)?;
    let mut ctrl = Controller::connect(Box::new(TraceBackend::new()));
    let log = run.simulate(&mut ctrl)?;

    let manifest = RunManifest::now(
        run_id.clone(),
        &protocol.name,
        log.len(),
        run.plan.len(),
        ENGINE_VERSION,
    );
    store.save_run(&manifest, &log)?;

    println!("✓ Recording completed: {}", run_id);
    println!("  Transfers: {}", run.plan.len());
    println!("  Commands: {}", log.len());
    println!("  Aspirations: {}", log.count_of("aspirate"));
    println!("  Re-homes: {}", log.count_of("home"));
    Ok(())
}

fn cmd_runs(protocol_path: &Path) -> CliResult<()> {
    let protocol = load_yaml(protocol_path)?;
    let store = RunStore::for_protocol(protocol_path)?;
    let runs = store.list_runs(&protocol.name)?;

    if runs.is_empty() {
        println!("No cached runs for '{}'", protocol.name);
    } else {
        println!("Cached runs for '{}':", protocol.name);
        for manifest in runs {
            println!(
                "  {}  {} ({} commands, {} transfers)",
                &manifest.run_id[..12.min(manifest.run_id.len())],
                manifest.timestamp,
                manifest.command_count,
                manifest.transfer_count
            );
        }
    }
    Ok(())
}

fn cmd_show_run(protocol_path: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::for_protocol(protocol_path)?;
    let manifest = store.load_manifest(run_id)?;
    let log = store.load_commands(run_id)?;

    println!("Run {}", manifest.run_id);
    println!("  Protocol: {}", manifest.protocol_name);
    println!("  Recorded: {}", manifest.timestamp);
    println!("  Engine:   {}", manifest.engine_version);
    println!("  Transfers: {}", manifest.transfer_count);
    println!("  Commands:  {}", log.len());
    for name in [
        "move_to",
        "pick_up_tip",
        "aspirate",
        "air_gap",
        "dispense",
        "blow_out",
        "mix",
        "drop_tip",
        "home",
    ] {
        let count = log.count_of(name);
        if count > 0 {
            println!("    {:<12} {}", name, count);
        }
    }
    Ok(())
}

fn cmd_play(protocol_path: &Path, run_id: &str) -> CliResult<()> {
    let store = RunStore::for_protocol(protocol_path)?;
    let log = store.load_commands(run_id)?;

    println!("Replaying {} commands on live connection", log.len());
    let mut ctrl = Controller::connect(Box::new(TraceBackend::new()));
    ctrl.set_mode(ConnectionMode::Live);
    ctrl.home()?;
    ctrl.play(&log)?;
    println!("✓ Replay finished");
    Ok(())
}
