use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use dash_logging::{dash_debug, dash_trace};

use crate::{EngineEvent, StatusSource};

#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(1_000),
        }
    }
}

/// One polling subscription: a driver task that issues a status fetch per
/// interval tick, plus the active flag that gates result delivery.
///
/// Lifecycle is Active -> Stopped with no way back; reconfiguration means
/// stopping this session and starting a new one.
pub struct PollingSession {
    active: Arc<AtomicBool>,
    driver: tokio::task::JoinHandle<()>,
}

impl PollingSession {
    /// Begin polling. Must be called from within a tokio runtime.
    ///
    /// The first fetch is issued immediately; after that, one per interval
    /// tick. Fetches are never queued or de-duplicated: an interval shorter
    /// than the round-trip latency means several fetches in flight at once,
    /// each tagged with its issue-order `seq` so the consumer can discard
    /// completions that arrive out of order.
    pub fn start(
        source: Arc<dyn StatusSource>,
        generation: u64,
        settings: PollSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let driver_active = active.clone();
        let driver = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(settings.interval);
            let mut seq: u64 = 0;
            loop {
                // The first tick completes at once, so the widget is not
                // blank for a full interval after mount.
                ticker.tick().await;
                if !driver_active.load(Ordering::SeqCst) {
                    break;
                }
                seq += 1;
                dash_trace!("poll generation={} seq={} issued", generation, seq);

                let source = source.clone();
                let event_tx = event_tx.clone();
                // Staleness guard: capture the active flag at issue time and
                // re-check it at completion time, so a fetch that outlives
                // its session cannot deliver a result.
                let issued_active = driver_active.clone();
                tokio::spawn(async move {
                    let result = source.fetch_status().await;
                    if issued_active.load(Ordering::SeqCst) {
                        let _ = event_tx.send(EngineEvent::StatusFetched {
                            generation,
                            seq,
                            result,
                        });
                    } else {
                        dash_trace!(
                            "poll generation={} seq={} resolved after stop, discarded",
                            generation,
                            seq
                        );
                    }
                });
            }
        });

        Self { active, driver }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop the session: no further fetches are issued and in-flight results
    /// are discarded. Idempotent.
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            self.driver.abort();
            dash_debug!("polling session stopped");
        }
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.stop();
    }
}
