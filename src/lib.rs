//! Fleet worker library.
//!
//! Bootstraps one self-play rollout worker: allocates its fleet index,
//! schedules its match format, resolves its operating mode, and composes the
//! session handed to the rollout runtime.

pub mod config;
pub mod counter;
pub mod error;
pub mod mode;
pub mod replay;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod store;
pub mod worker;

pub use config::{Cli, WorkerConfig};
pub use counter::{allocate_index, WorkerIndex};
pub use error::WorkerError;
pub use mode::{resolve_mode, ModeFlags, ModeParameters, OperatingMode};
pub use replay::{ReplayStateTable, ReplayStates};
pub use runtime::{JsonlHandoff, RolloutRuntime};
pub use schedule::{select_team_size, TeamSize, SCHEDULE};
pub use session::{compose_session, SessionDescriptor};
pub use worker::{bootstrap, run_worker};
