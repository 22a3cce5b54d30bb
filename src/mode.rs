//! Operating mode resolution.
//!
//! A worker runs in exactly one of three modes. The command line exposes them
//! as two independent switches; [`OperatingMode::select`] collapses those into
//! a single mode by fixed priority, and each mode owns one canonical
//! [`ModeParameters`] bundle.

use std::io::IsTerminal;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

/// Chance that a training match faces an older policy version.
pub const TRAINING_PAST_VERSION_PROB: f64 = 0.2;
/// Chance that a training match is an evaluation match.
pub const TRAINING_EVALUATION_PROB: f64 = 0.01;
/// Simulation speed for training, as a multiple of real time.
pub const TRAINING_GAME_SPEED: u32 = 100;
/// Real-time simulation speed for matches watched by people.
pub const REALTIME_GAME_SPEED: u32 = 1;

/// Mode switches as they arrive from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub streamer_mode: bool,
    pub human_match: bool,
}

/// What this worker is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    /// Accelerated self-play whose data feeds the learner.
    Training,
    /// Real-time exhibition against the latest policy for a live stream.
    Streamer,
    /// Real-time match with a person at the controls.
    HumanExhibition,
}

impl OperatingMode {
    /// Selects the mode for a set of switches.
    ///
    /// Priority is HumanExhibition, then Streamer, then Training. Setting both
    /// switches is not an error: the human match wins.
    pub fn select(flags: ModeFlags) -> OperatingMode {
        if flags.human_match {
            OperatingMode::HumanExhibition
        } else if flags.streamer_mode {
            OperatingMode::Streamer
        } else {
            OperatingMode::Training
        }
    }

    /// Builds the canonical parameter bundle for this mode.
    ///
    /// For [`OperatingMode::HumanExhibition`] this instantiates the human
    /// participant through `humans`; other modes never call the factory.
    pub fn parameters(
        self,
        humans: &dyn HumanParticipantFactory,
    ) -> Result<ModeParameters, WorkerError> {
        let params = match self {
            OperatingMode::Training => ModeParameters {
                past_version_prob: TRAINING_PAST_VERSION_PROB,
                evaluation_prob: TRAINING_EVALUATION_PROB,
                game_speed: TRAINING_GAME_SPEED,
                human: None,
            },
            OperatingMode::Streamer => ModeParameters {
                past_version_prob: 0.0,
                evaluation_prob: 0.0,
                game_speed: REALTIME_GAME_SPEED,
                human: None,
            },
            OperatingMode::HumanExhibition => ModeParameters {
                past_version_prob: 0.0,
                evaluation_prob: 0.0,
                game_speed: REALTIME_GAME_SPEED,
                human: Some(humans.create()?),
            },
        };
        Ok(params)
    }
}

/// Opponent sampling and pacing for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeParameters {
    /// Probability of drawing a past policy version as the opponent.
    pub past_version_prob: f64,
    /// Probability of playing an evaluation match.
    pub evaluation_prob: f64,
    /// Simulation speed as a multiple of real time.
    pub game_speed: u32,
    /// The person playing, present only in human exhibition matches.
    pub human: Option<HumanParticipant>,
}

/// Resolves the mode and its parameters from the command-line switches.
pub fn resolve_mode(
    flags: ModeFlags,
    humans: &dyn HumanParticipantFactory,
) -> Result<(OperatingMode, ModeParameters), WorkerError> {
    if flags.human_match && flags.streamer_mode {
        warn!("both streamer and human match requested; playing the human match");
    }
    let mode = OperatingMode::select(flags);
    let params = mode.parameters(humans)?;
    info!(
        "mode {:?}: past_version_prob={} evaluation_prob={} game_speed={}",
        mode, params.past_version_prob, params.evaluation_prob, params.game_speed
    );
    Ok((mode, params))
}

/// Input device a human participant plays through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputBackend {
    /// Keyboard and mouse on the worker's own console.
    KeyboardMouse,
}

/// A person embedded in the match in place of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanParticipant {
    pub backend: InputBackend,
}

/// Creates the human participant for exhibition matches.
pub trait HumanParticipantFactory {
    fn create(&self) -> Result<HumanParticipant, WorkerError>;
}

/// Binds a human participant to the worker's interactive console.
///
/// Fails when stdin is not a terminal, since nobody could be at the controls.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleHumanFactory;

impl HumanParticipantFactory for ConsoleHumanFactory {
    fn create(&self) -> Result<HumanParticipant, WorkerError> {
        if !std::io::stdin().is_terminal() {
            return Err(WorkerError::Initialization {
                component: "human participant".into(),
                reason: "stdin is not an interactive terminal".into(),
            });
        }
        Ok(HumanParticipant {
            backend: InputBackend::KeyboardMouse,
        })
    }
}
