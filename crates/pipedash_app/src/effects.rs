use std::time::Duration;

use dash_logging::{dash_info, dash_warn};
use pipedash_core::{Effect, Msg, PipelineSnapshot};
use pipedash_engine::{ClientSettings, EngineEvent, EngineHandle, FetchError};

/// Executes core effects against the engine and translates engine events
/// back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling {
                    generation,
                    interval_ms,
                } => {
                    dash_info!(
                        "StartPolling generation={} interval_ms={}",
                        generation,
                        interval_ms
                    );
                    self.engine
                        .start_polling(generation, Duration::from_millis(interval_ms));
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::FetchTickers => {
                    self.engine.fetch_tickers();
                }
                Effect::AddTicker { symbol } => {
                    dash_info!("AddTicker symbol={}", symbol);
                    self.engine.add_ticker(symbol);
                }
                Effect::RemoveTicker { symbol } => {
                    dash_info!("RemoveTicker symbol={}", symbol);
                    self.engine.remove_ticker(symbol);
                }
            }
        }
    }

    /// Drain one pending engine event, translated into a core message.
    pub fn poll_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StatusFetched {
            generation,
            seq,
            result,
        } => match result {
            Ok(status) => {
                dash_logging::set_poll_seq(seq);
                Msg::StatusFetched {
                    generation,
                    seq,
                    snapshot: map_status(status),
                }
            }
            Err(err) => {
                dash_warn!("status fetch {} failed: {} ({})", seq, err.kind, err.message);
                Msg::StatusFetchFailed {
                    generation,
                    seq,
                    message: render_error(&err),
                }
            }
        },
        EngineEvent::TickersLoaded { result } => match result {
            Ok(tickers) => Msg::TickersLoaded { tickers },
            // The list refresh failed; surface it in the watchlist error slot.
            Err(err) => Msg::TickerMutationDone {
                result: Err(render_error(&err)),
            },
        },
        EngineEvent::TickerMutated { result } => Msg::TickerMutationDone {
            result: result.map_err(|err| render_error(&err)),
        },
    }
}

fn render_error(err: &FetchError) -> String {
    format!("{}: {}", err.kind, err.message)
}

fn map_status(status: pipedash_engine::PipelineStatus) -> PipelineSnapshot {
    PipelineSnapshot {
        phase: map_phase(status.phase),
        current_step: status.current_step,
        current_batch: status.current_batch,
        total_batches: status.total_batches,
        steps_completed: status.steps_completed,
        start_time: status.start_time,
        last_updated: status.last_updated,
        end_time: status.end_time,
    }
}

fn map_phase(phase: pipedash_engine::PipelinePhase) -> pipedash_core::PipelinePhase {
    match phase {
        pipedash_engine::PipelinePhase::Running => pipedash_core::PipelinePhase::Running,
        pipedash_engine::PipelinePhase::Completed => pipedash_core::PipelinePhase::Completed,
        pipedash_engine::PipelinePhase::Failed => pipedash_core::PipelinePhase::Failed,
    }
}
