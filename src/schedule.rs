//! Match size scheduling.
//!
//! Maps a worker index onto a match format through a fixed repeating table.
//! Using the index instead of a random draw means any contiguous block of
//! workers covers the formats in the intended proportions, with no state
//! shared between workers beyond the counter that hands out indices.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::counter::WorkerIndex;
use crate::error::WorkerError;

/// Number of agents on each side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TeamSize {
    One = 1,
    Two = 2,
    Three = 3,
}

impl TeamSize {
    /// Zero-based slot of this format in per-format tables.
    pub fn slot(self) -> usize {
        self as usize - 1
    }
}

impl From<TeamSize> for u8 {
    fn from(size: TeamSize) -> u8 {
        size as u8
    }
}

impl TryFrom<u8> for TeamSize {
    type Error = WorkerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TeamSize::One),
            2 => Ok(TeamSize::Two),
            3 => Ok(TeamSize::Three),
            other => Err(WorkerError::InvalidConfiguration(format!(
                "match size must be between 1 and 3, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = *self as u8;
        write!(f, "{}v{}", n, n)
    }
}

/// Repeating match-size rotation, indexed by worker index modulo its length.
///
/// Tuned by hand to match the format mix seen in the live game population:
/// 15 singles, 10 doubles and 9 triples per 34 workers, interleaved so that
/// short runs of consecutive workers already approach that mix.
pub const SCHEDULE: [TeamSize; 34] = {
    use TeamSize::{One as S1, Three as S3, Two as S2};
    [
        S1, S2, S3, S1, S1, S2, S3, S1, S1, S2, S3, S1, S2, S1, S3, S1, S2, S3, S1, S2, S1, S3,
        S1, S2, S1, S3, S2, S1, S3, S2, S1, S1, S3, S2,
    ]
};

/// Picks the match format for a worker.
///
/// `force` takes precedence for every index but must name a real format;
/// anything outside 1..=3 is rejected even if the caller already checked it.
pub fn select_team_size(index: WorkerIndex, force: Option<u8>) -> Result<TeamSize, WorkerError> {
    if let Some(size) = force {
        return TeamSize::try_from(size);
    }
    let slot = (index % SCHEDULE.len() as u64) as usize;
    Ok(SCHEDULE[slot])
}
