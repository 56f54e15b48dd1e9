use std::fmt;

use serde::Deserialize;

/// Lifecycle phase of the monitored pipeline, as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelinePhase {
    Running,
    Completed,
    Failed,
}

/// One status report as returned by `GET /pipeline/status`.
///
/// All timestamps are Unix seconds. `end_time` is only meaningful once the
/// phase is `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineStatus {
    #[serde(rename = "status")]
    pub phase: PipelinePhase,
    pub current_step: String,
    pub current_batch: Option<u32>,
    pub total_batches: Option<u32>,
    pub steps_completed: Vec<String>,
    pub start_time: u64,
    pub last_updated: u64,
    pub end_time: u64,
}

impl PipelineStatus {
    /// Check the wire invariants a structurally valid body can still break.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match (self.current_batch, self.total_batches) {
            (Some(_), None) | (None, Some(_)) => return Err(ShapeError::HalfBatchPair),
            _ => {}
        }
        if self.start_time > self.last_updated {
            return Err(ShapeError::TimestampsReversed {
                start_time: self.start_time,
                last_updated: self.last_updated,
            });
        }
        Ok(())
    }
}

/// A decoded body whose field values contradict each other.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("current_batch and total_batches must be present together")]
    HalfBatchPair,
    #[error("start_time {start_time} is after last_updated {last_updated}")]
    TimestampsReversed { start_time: u64, last_updated: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Transport failures split into a network class and a decode class. The
/// store upstream treats them identically; the distinction exists here for
/// logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
}

impl FailureKind {
    pub fn is_decode(&self) -> bool {
        matches!(self, FailureKind::Decode)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "decode error"),
        }
    }
}

/// Events pushed from the engine thread back to the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// One status fetch resolved. `generation` identifies the session that
    /// issued it; `seq` is its position in that session's issue order.
    StatusFetched {
        generation: u64,
        seq: u64,
        result: Result<PipelineStatus, FetchError>,
    },
    TickersLoaded {
        result: Result<Vec<String>, FetchError>,
    },
    TickerMutated {
        result: Result<(), FetchError>,
    },
}
