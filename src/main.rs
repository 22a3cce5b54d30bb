//! Self-play rollout worker.
//!
//! Connects to the learner's coordination store, composes this worker's
//! session and writes it as one JSON line for the rollout runtime to pick up.
//!
//! Usage:
//!   worker NAME LEARNER_ADDRESS PASSWORD [OPTIONS]
//!
//! Options:
//!   --compress                 Compress sent data
//!   --streamer_mode            Streamer match, no learning
//!   --force_match_size N       Force a 1s, 2s, or 3s game
//!   --human_match              Play a human match
//!   --port PORT                Learner port (default: 6379)
//!   --no_limit_threads         Let the runtime use every core
//!   --handoff FILE             Write the handoff line to FILE

use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use fleet_worker::mode::ConsoleHumanFactory;
use fleet_worker::store::RedisStore;
use fleet_worker::worker::run_worker;
use fleet_worker::{Cli, JsonlHandoff, WorkerConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage errors exit here, before any connection is attempted.
    let config = Cli::parse().into_config();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Problem detected, stopping worker: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &WorkerConfig) -> Result<()> {
    config.validate()?;

    info!(
        "worker '{}' connecting to learner at {}",
        config.name, config.learner_address
    );
    let store = RedisStore::connect(&config.learner_address, config.port, &config.password)
        .context("connecting to the learner's store")?;
    let humans = ConsoleHumanFactory;

    match &config.handoff_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating handoff file {}", path.display()))?;
            let mut runtime = JsonlHandoff::new(BufWriter::new(file));
            run_worker(config, &store, &humans, &mut runtime)?;
        }
        None => {
            let stdout = io::stdout();
            let mut runtime = JsonlHandoff::new(BufWriter::new(stdout.lock()));
            run_worker(config, &store, &humans, &mut runtime)?;
        }
    }
    Ok(())
}
