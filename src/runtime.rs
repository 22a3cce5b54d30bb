//! Handoff to the rollout runtime.
//!
//! The runtime that actually plays matches and streams rollouts to the
//! learner lives outside this crate. [`RolloutRuntime`] is the seam: it takes
//! a finished [`SessionDescriptor`] and does not return until the runtime
//! stops.

use std::io::Write;

use log::info;

use crate::error::WorkerError;
use crate::session::SessionDescriptor;

/// Something that can take over the process with a composed session.
pub trait RolloutRuntime {
    /// Runs the session until the runtime terminates or fails.
    fn run(&mut self, session: SessionDescriptor) -> Result<(), WorkerError>;
}

/// Hands the session to an external runtime process as one JSON line.
///
/// The runtime reads the line from the other end of `out` (usually a pipe
/// on stdout) and owns the process from there.
pub struct JsonlHandoff<W: Write> {
    out: W,
}

impl<W: Write> JsonlHandoff<W> {
    pub fn new(out: W) -> Self {
        JsonlHandoff { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RolloutRuntime for JsonlHandoff<W> {
    fn run(&mut self, session: SessionDescriptor) -> Result<(), WorkerError> {
        serde_json::to_writer(&mut self.out, &session)
            .map_err(|e| WorkerError::Runtime(e.to_string()))?;
        writeln!(self.out)?;
        self.out.flush()?;
        info!(
            "handed worker {} ({} {:?}) to the rollout runtime",
            session.worker_index, session.team_size, session.mode
        );
        Ok(())
    }
}
