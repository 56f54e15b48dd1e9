use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use dash_logging::{dash_info, dash_warn};

use crate::client::{ClientSettings, HttpClient, TickerDirectory};
use crate::poll::{PollSettings, PollingSession};
use crate::{EngineEvent, FetchError};

enum EngineCommand {
    StartPolling { generation: u64, interval: Duration },
    StopPolling,
    FetchTickers,
    AddTicker { symbol: String },
    RemoveTicker { symbol: String },
}

/// Bridge between the synchronous app loop and the async IO layer: commands
/// in, events out, one dedicated thread owning the tokio runtime.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(HttpClient::new(settings)?);

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut session: Option<PollingSession> = None;
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &client, &event_tx, &mut session, command);
            }
            // Command channel closed: the app is gone, tear the session down.
            if let Some(old) = session.take() {
                old.stop();
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_polling(&self, generation: u64, interval: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling {
            generation,
            interval,
        });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn fetch_tickers(&self) {
        let _ = self.cmd_tx.send(EngineCommand::FetchTickers);
    }

    pub fn add_ticker(&self, symbol: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::AddTicker {
            symbol: symbol.into(),
        });
    }

    pub fn remove_ticker(&self, symbol: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::RemoveTicker {
            symbol: symbol.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    client: &Arc<HttpClient>,
    event_tx: &mpsc::Sender<EngineEvent>,
    session: &mut Option<PollingSession>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::StartPolling {
            generation,
            interval,
        } => {
            // Replacing a live session stops it first, so the old timer is
            // dead before the new one takes over.
            if let Some(old) = session.take() {
                old.stop();
            }
            dash_info!(
                "start polling generation={} interval_ms={}",
                generation,
                interval.as_millis()
            );
            let _guard = runtime.enter();
            *session = Some(PollingSession::start(
                client.clone(),
                generation,
                PollSettings { interval },
                event_tx.clone(),
            ));
        }
        EngineCommand::StopPolling => {
            if let Some(old) = session.take() {
                old.stop();
            }
        }
        EngineCommand::FetchTickers => {
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.list_tickers().await;
                if let Err(err) = &result {
                    dash_warn!("ticker list failed: {} ({})", err.kind, err.message);
                }
                let _ = event_tx.send(EngineEvent::TickersLoaded { result });
            });
        }
        EngineCommand::AddTicker { symbol } => {
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.add_ticker(&symbol).await;
                if let Err(err) = &result {
                    dash_warn!("add ticker {symbol} failed: {} ({})", err.kind, err.message);
                }
                let _ = event_tx.send(EngineEvent::TickerMutated { result });
            });
        }
        EngineCommand::RemoveTicker { symbol } => {
            let client = client.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = client.remove_ticker(&symbol).await;
                if let Err(err) = &result {
                    dash_warn!(
                        "remove ticker {symbol} failed: {} ({})",
                        err.kind,
                        err.message
                    );
                }
                let _ = event_tx.send(EngineEvent::TickerMutated { result });
            });
        }
    }
}
