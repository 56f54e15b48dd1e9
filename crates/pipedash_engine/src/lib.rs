//! Pipedash engine: HTTP transport, polling session, and effect execution.
mod client;
mod engine;
mod poll;
mod types;

pub use client::{ClientSettings, HttpClient, StatusSource, TickerDirectory};
pub use engine::EngineHandle;
pub use poll::{PollSettings, PollingSession};
pub use types::{
    EngineEvent, FailureKind, FetchError, PipelinePhase, PipelineStatus, ShapeError,
};
