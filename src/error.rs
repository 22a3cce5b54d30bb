//! Error taxonomy for worker startup.
//!
//! Every variant is fatal for the worker: nothing here is retried locally.
//! Reconnect and backoff belong to the rollout runtime once it has taken over.

/// Errors that can abort worker startup.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("coordination store unavailable: {0}")]
    Connection(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to initialize {component}: {reason}")]
    Initialization { component: String, reason: String },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("failed to decode replay states: {0}")]
    Decode(String),

    #[error("failed to encode replay states: {0}")]
    Encode(String),

    #[error("rollout runtime failed: {0}")]
    Runtime(String),
}

impl From<std::io::Error> for WorkerError {
    fn from(e: std::io::Error) -> Self {
        WorkerError::Runtime(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failure() {
        let e = WorkerError::KeyNotFound("replay states for 2v2".into());
        assert_eq!(e.to_string(), "key not found: replay states for 2v2");

        let e = WorkerError::Initialization {
            component: "human participant".into(),
            reason: "no terminal".into(),
        };
        assert_eq!(
            e.to_string(),
            "failed to initialize human participant: no terminal"
        );
    }
}
