//! Worker startup: identity, replay states, session, handoff.

use crate::config::WorkerConfig;
use crate::counter::allocate_index;
use crate::error::WorkerError;
use crate::mode::HumanParticipantFactory;
use crate::replay::fetch_replay_table;
use crate::runtime::RolloutRuntime;
use crate::session::{compose_session, SessionDescriptor};
use crate::store::CoordinationStore;

/// Runs every startup step up to, but not including, the handoff.
///
/// Configuration is checked before the store is touched, so a bad override
/// never costs a worker index.
pub fn bootstrap<S: CoordinationStore + ?Sized>(
    config: &WorkerConfig,
    store: &S,
    humans: &dyn HumanParticipantFactory,
) -> Result<SessionDescriptor, WorkerError> {
    config.validate()?;
    let index = allocate_index(store)?;
    let replay = fetch_replay_table(store)?;
    compose_session(
        index,
        config.force_match_size,
        config.mode_flags(),
        &replay,
        &config.components,
        &config.runtime_options(),
        humans,
    )
}

/// Boots the worker and hands the session to `runtime`.
///
/// Nothing reaches the runtime unless every startup step succeeded.
pub fn run_worker<S: CoordinationStore + ?Sized>(
    config: &WorkerConfig,
    store: &S,
    humans: &dyn HumanParticipantFactory,
    runtime: &mut dyn RolloutRuntime,
) -> Result<(), WorkerError> {
    let session = bootstrap(config, store, humans)?;
    runtime.run(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{HumanParticipant, InputBackend, OperatingMode};
    use crate::replay::{publish_replay_table, ReplayStateTable, ReplayStates};
    use crate::schedule::TeamSize;
    use crate::store::{MemoryStore, WORKER_COUNTER_KEY};

    struct NoHumans;

    impl HumanParticipantFactory for NoHumans {
        fn create(&self) -> Result<HumanParticipant, WorkerError> {
            Err(WorkerError::Initialization {
                component: "human participant".into(),
                reason: "test".into(),
            })
        }
    }

    struct AlwaysHuman;

    impl HumanParticipantFactory for AlwaysHuman {
        fn create(&self) -> Result<HumanParticipant, WorkerError> {
            Ok(HumanParticipant {
                backend: InputBackend::KeyboardMouse,
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        sessions: Vec<SessionDescriptor>,
    }

    impl RolloutRuntime for Recorder {
        fn run(&mut self, session: SessionDescriptor) -> Result<(), WorkerError> {
            self.sessions.push(session);
            Ok(())
        }
    }

    fn seeded_store(formats: usize) -> MemoryStore {
        let store = MemoryStore::new();
        let entries = (1..=formats)
            .map(|n| ReplayStates::new(vec![vec![n as f32; 4]]))
            .collect();
        publish_replay_table(&store, &ReplayStateTable::new(entries)).unwrap();
        store
    }

    fn config() -> WorkerConfig {
        WorkerConfig {
            name: "tester".into(),
            ..Default::default()
        }
    }

    #[test]
    fn successive_workers_follow_schedule() {
        let store = seeded_store(3);
        let sizes: Vec<TeamSize> = (0..6)
            .map(|_| bootstrap(&config(), &store, &NoHumans).unwrap().team_size)
            .collect();
        assert_eq!(
            sizes,
            vec![
                TeamSize::One,
                TeamSize::Two,
                TeamSize::Three,
                TeamSize::One,
                TeamSize::One,
                TeamSize::Two
            ]
        );
    }

    #[test]
    fn session_reaches_runtime() {
        let store = seeded_store(3);
        let mut runtime = Recorder::default();
        run_worker(&config(), &store, &NoHumans, &mut runtime).unwrap();
        assert_eq!(runtime.sessions.len(), 1);
        let s = &runtime.sessions[0];
        assert_eq!(s.worker_index, 0);
        assert_eq!(s.mode, OperatingMode::Training);
        assert_eq!(s.replay_states.rows()[0], vec![1.0; 4]);
    }

    #[test]
    fn invalid_override_touches_nothing() {
        let store = MemoryStore::new();
        let config = WorkerConfig {
            force_match_size: Some(5),
            ..config()
        };
        let mut runtime = Recorder::default();
        let result = run_worker(&config, &store, &NoHumans, &mut runtime);
        assert!(matches!(result, Err(WorkerError::InvalidConfiguration(_))));
        assert_eq!(store.command_count(), 0);
        assert!(runtime.sessions.is_empty());
    }

    #[test]
    fn missing_format_is_fatal_and_nothing_is_handed_off() {
        let store = seeded_store(1);
        store.set(WORKER_COUNTER_KEY, b"5").unwrap();
        let mut runtime = Recorder::default();
        let result = run_worker(&config(), &store, &NoHumans, &mut runtime);
        assert!(matches!(result, Err(WorkerError::KeyNotFound(_))));
        assert!(runtime.sessions.is_empty());
    }

    #[test]
    fn unreachable_store_is_fatal() {
        let store = MemoryStore::unreachable();
        let mut runtime = Recorder::default();
        let result = run_worker(&config(), &store, &NoHumans, &mut runtime);
        assert!(matches!(result, Err(WorkerError::Connection(_))));
        assert!(runtime.sessions.is_empty());
    }

    #[test]
    fn human_match_needs_a_human() {
        let store = seeded_store(3);
        let config = WorkerConfig {
            human_match: true,
            ..config()
        };
        assert!(matches!(
            bootstrap(&config, &store, &NoHumans),
            Err(WorkerError::Initialization { .. })
        ));
        let session = bootstrap(&config, &store, &AlwaysHuman).unwrap();
        assert_eq!(session.mode, OperatingMode::HumanExhibition);
        assert_eq!(session.params.game_speed, 1);
    }
}
