//! Session composition.
//!
//! Pulls the scheduler, the mode resolver and the replay table together into
//! one [`SessionDescriptor`]: everything the rollout runtime needs to start
//! playing, fixed at startup and never touched again once handed over.

use std::collections::BTreeMap;

use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::counter::WorkerIndex;
use crate::error::WorkerError;
use crate::mode::{
    resolve_mode, HumanParticipantFactory, ModeFlags, ModeParameters, OperatingMode,
};
use crate::replay::{ReplayStateTable, ReplayStates};
use crate::schedule::{select_team_size, TeamSize};

/// Most players any match format puts on the field (3v3).
pub const MAX_PLAYERS: u64 = 6;
/// Probability that an old policy version plays deterministically.
pub const DETERMINISTIC_OLD_PROB: f64 = 0.5;
/// Rating uncertainty the learner aims for when picking opponents.
pub const SIGMA_TARGET: f64 = 2.0;

/// Opaque description of one simulation component.
///
/// The simulator owns what these mean; the worker only names them and
/// passes their arguments through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, Value>,
}

impl ComponentSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        ComponentSpec {
            kind: kind.into(),
            args: BTreeMap::new(),
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }
}

/// Reward, observation, action and state-setting components of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchComponents {
    pub reward: ComponentSpec,
    pub observation: ComponentSpec,
    pub action_parser: ComponentSpec,
    pub state_setter: ComponentSpec,
    pub self_play: bool,
}

impl Default for MatchComponents {
    fn default() -> Self {
        MatchComponents {
            reward: ComponentSpec::new("combined_reward"),
            observation: ComponentSpec::new("relative_observation")
                .with_arg("max_players", MAX_PLAYERS),
            action_parser: ComponentSpec::new("discrete_lookup"),
            state_setter: ComponentSpec::new("replay_state_setter")
                .with_arg("mirror_augment", true),
            self_play: true,
        }
    }
}

/// When a match ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalCondition {
    /// Goal scored or no touch for the training timeout.
    Standard,
    /// Goal scored or full regulation time, paced for a person.
    HumanPaced,
}

impl TerminalCondition {
    pub fn for_mode(mode: OperatingMode) -> TerminalCondition {
        match mode {
            OperatingMode::HumanExhibition => TerminalCondition::HumanPaced,
            OperatingMode::Training | OperatingMode::Streamer => TerminalCondition::Standard,
        }
    }
}

/// Settings passed straight through to the rollout runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Name the learner attributes this worker's data to.
    pub worker_name: String,
    /// Send compressed game states to the learner along with rollouts.
    pub send_gamestates: bool,
    /// Run policy inference on a single thread; workers share hosts.
    pub limit_threads: bool,
    pub deterministic_old_prob: f64,
    pub sigma_target: f64,
}

impl RuntimeOptions {
    pub fn new(worker_name: impl Into<String>) -> Self {
        RuntimeOptions {
            worker_name: worker_name.into(),
            ..Default::default()
        }
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        RuntimeOptions {
            worker_name: String::new(),
            send_gamestates: false,
            limit_threads: true,
            deterministic_old_prob: DETERMINISTIC_OLD_PROB,
            sigma_target: SIGMA_TARGET,
        }
    }
}

/// Fully configured session handed to the rollout runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub worker_index: WorkerIndex,
    pub team_size: TeamSize,
    pub mode: OperatingMode,
    pub params: ModeParameters,
    /// Tells the runtime to skip sending data; true only in streamer mode.
    pub streamer_mode: bool,
    pub terminal: TerminalCondition,
    pub components: MatchComponents,
    pub runtime: RuntimeOptions,
    pub replay_states: ReplayStates,
    /// Seed for the runtime's state setter; equal to the worker index so a
    /// replayed fleet draws the same starting states.
    pub initial_state_seed: u64,
    /// First starting state drawn with `initial_state_seed`, if the entry has any.
    pub opening_state: Option<Vec<f32>>,
}

/// Composes the session for worker `index`.
///
/// The replay entry is looked up before the mode is resolved, so a missing
/// entry fails before any human participant is created. Inputs are only read.
pub fn compose_session(
    index: WorkerIndex,
    force_match_size: Option<u8>,
    flags: ModeFlags,
    replay: &ReplayStateTable,
    components: &MatchComponents,
    options: &RuntimeOptions,
    humans: &dyn HumanParticipantFactory,
) -> Result<SessionDescriptor, WorkerError> {
    let team_size = select_team_size(index, force_match_size)?;
    let replay_states = replay.get(team_size)?.clone();
    let (mode, params) = resolve_mode(flags, humans)?;

    let initial_state_seed = index;
    let mut rng = SmallRng::seed_from_u64(initial_state_seed);
    let opening_state = replay_states.sample(&mut rng).map(<[f32]>::to_vec);

    info!(
        "worker {} composed {} {:?} session ({} replay states)",
        index,
        team_size,
        mode,
        replay_states.len()
    );

    Ok(SessionDescriptor {
        worker_index: index,
        team_size,
        mode,
        params,
        streamer_mode: mode == OperatingMode::Streamer,
        terminal: TerminalCondition::for_mode(mode),
        components: components.clone(),
        runtime: options.clone(),
        replay_states,
        initial_state_seed,
        opening_state,
    })
}
