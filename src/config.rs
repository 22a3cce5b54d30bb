//! Worker configuration and command-line surface.

use std::path::PathBuf;

use clap::Parser;

use crate::error::WorkerError;
use crate::mode::ModeFlags;
use crate::schedule::TeamSize;
use crate::session::{MatchComponents, RuntimeOptions};

/// Redis port assumed when the learner address names none.
pub const DEFAULT_STORE_PORT: u16 = 6379;

/// Everything a worker needs to start.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Who is doing the work; the learner attributes data to this name.
    pub name: String,
    /// Learner host, optionally `host:port`.
    pub learner_address: String,
    pub password: String,
    /// Port used when `learner_address` has none.
    pub port: u16,
    /// Send compressed game states along with rollouts.
    pub compress: bool,
    pub streamer_mode: bool,
    pub human_match: bool,
    /// Play only this team size instead of following the schedule.
    pub force_match_size: Option<u8>,
    /// Ask the runtime to run inference on a single thread.
    pub limit_threads: bool,
    /// Write the session handoff here instead of stdout.
    pub handoff_path: Option<PathBuf>,
    pub components: MatchComponents,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            name: String::new(),
            learner_address: "localhost".to_string(),
            password: String::new(),
            port: DEFAULT_STORE_PORT,
            compress: false,
            streamer_mode: false,
            human_match: false,
            force_match_size: None,
            limit_threads: true,
            handoff_path: None,
            components: MatchComponents::default(),
        }
    }
}

impl WorkerConfig {
    /// Checks what can be checked without touching the network.
    pub fn validate(&self) -> Result<(), WorkerError> {
        if let Some(size) = self.force_match_size {
            TeamSize::try_from(size)?;
        }
        if self.learner_address.is_empty() {
            return Err(WorkerError::InvalidConfiguration(
                "learner address is empty".into(),
            ));
        }
        Ok(())
    }

    pub fn mode_flags(&self) -> ModeFlags {
        ModeFlags {
            streamer_mode: self.streamer_mode,
            human_match: self.human_match,
        }
    }

    pub fn runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            send_gamestates: self.compress,
            limit_threads: self.limit_threads,
            ..RuntimeOptions::new(self.name.clone())
        }
    }
}

/// Launch a self-play rollout worker.
#[derive(Parser, Debug)]
#[command(name = "worker", about, long_about = None)]
pub struct Cli {
    /// Who is doing the work?
    pub name: String,
    /// Learner address (host or host:port)
    pub learner_address: String,
    /// Learner password
    pub password: String,
    /// Compress sent data
    #[arg(long)]
    pub compress: bool,
    /// Start a streamer match, don't learn with this instance
    #[arg(long = "streamer_mode")]
    pub streamer_mode: bool,
    /// Force a 1s, 2s, or 3s game
    #[arg(
        long = "force_match_size",
        value_name = "MATCH_SIZE",
        value_parser = clap::value_parser!(u8).range(1..=3)
    )]
    pub force_match_size: Option<u8>,
    /// Play a human match against the current policy
    #[arg(long = "human_match")]
    pub human_match: bool,
    /// Learner port when the address has none
    #[arg(long, default_value_t = DEFAULT_STORE_PORT)]
    pub port: u16,
    /// Let the runtime run inference on every core
    #[arg(long = "no_limit_threads")]
    pub no_limit_threads: bool,
    /// Write the session handoff to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub handoff: Option<PathBuf>,
}

impl Cli {
    pub fn into_config(self) -> WorkerConfig {
        WorkerConfig {
            name: sanitize(&self.name),
            learner_address: sanitize(&self.learner_address),
            password: sanitize(&self.password),
            port: self.port,
            compress: self.compress,
            streamer_mode: self.streamer_mode,
            human_match: self.human_match,
            force_match_size: self.force_match_size,
            limit_threads: !self.no_limit_threads,
            handoff_path: self.handoff,
            components: MatchComponents::default(),
        }
    }
}

/// Strips quote characters that shells and launch scripts leave around values.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\'' && *c != '"').collect()
}
