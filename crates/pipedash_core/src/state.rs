use crate::view_model::DashboardViewModel;

/// Default polling interval for the status widget, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 1_000;

/// Lifecycle phase reported by the monitored pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Running,
    Completed,
    Failed,
}

/// One immutable point-in-time status report.
///
/// Snapshots are never mutated in place; each applied fetch replaces the
/// previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSnapshot {
    pub phase: PipelinePhase,
    pub current_step: String,
    pub current_batch: Option<u32>,
    pub total_batches: Option<u32>,
    pub steps_completed: Vec<String>,
    pub start_time: u64,
    pub last_updated: u64,
    pub end_time: u64,
}

impl PipelineSnapshot {
    /// Batch progress as `(current, total)` when the run is batch-oriented.
    pub fn batch(&self) -> Option<(u32, u32)> {
        match (self.current_batch, self.total_batches) {
            (Some(current), Some(total)) => Some((current, total)),
            _ => None,
        }
    }
}

/// Polling subscription lifecycle. A new generation is issued on every
/// start, so results from a superseded session can be told apart from the
/// live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Active {
        generation: u64,
    },
}

/// Canonical form of a watchlist symbol: trimmed, uppercased.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    poll: PollState,
    generation: u64,
    interval_ms: u64,
    last_applied_seq: u64,
    snapshot: Option<PipelineSnapshot>,
    fetch_error: Option<String>,
    is_loading: bool,
    tickers: Vec<String>,
    ticker_input: String,
    ticker_error: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardViewModel {
        DashboardViewModel {
            poll_active: matches!(self.poll, PollState::Active { .. }),
            interval_ms: self.interval_ms,
            is_loading: self.is_loading,
            snapshot: self.snapshot.clone(),
            fetch_error: self.fetch_error.clone(),
            tickers: self.tickers.clone(),
            ticker_input: self.ticker_input.clone(),
            ticker_error: self.ticker_error.clone(),
            dirty: self.dirty,
        }
    }

    pub fn poll(&self) -> PollState {
        self.poll
    }

    /// Returns true once per dirty transition; rendering is keyed off this.
    pub fn consume_dirty(&mut self) -> bool {
        let was_dirty = self.dirty;
        self.dirty = false;
        was_dirty
    }

    /// Begin a new polling session, superseding any live one.
    ///
    /// The previous snapshot and error are retained across restarts; only
    /// the sequence floor resets, since the new session numbers its fetches
    /// from 1 again.
    pub(crate) fn start_polling(&mut self, interval_ms: u64) -> u64 {
        self.generation += 1;
        self.poll = PollState::Active {
            generation: self.generation,
        };
        self.interval_ms = interval_ms;
        self.last_applied_seq = 0;
        self.is_loading = true;
        self.dirty = true;
        self.generation
    }

    /// Returns false when already idle (stop is idempotent).
    pub(crate) fn stop_polling(&mut self) -> bool {
        if self.poll == PollState::Idle {
            return false;
        }
        self.poll = PollState::Idle;
        self.dirty = true;
        true
    }

    /// Accept a fetch result only if it belongs to the live session and is
    /// newer than everything applied so far. Late completions from stopped
    /// sessions, and in-order-issued but out-of-order-completed responses,
    /// both fail this check and are dropped.
    fn accepts_fetch(&self, generation: u64, seq: u64) -> bool {
        match self.poll {
            PollState::Active { generation: live } => {
                generation == live && seq > self.last_applied_seq
            }
            PollState::Idle => false,
        }
    }

    pub(crate) fn apply_snapshot(
        &mut self,
        generation: u64,
        seq: u64,
        snapshot: PipelineSnapshot,
    ) {
        if !self.accepts_fetch(generation, seq) {
            return;
        }
        self.last_applied_seq = seq;
        self.snapshot = Some(snapshot);
        self.fetch_error = None;
        self.is_loading = false;
        self.dirty = true;
    }

    /// A failed fetch keeps the last-known-good snapshot on display and
    /// surfaces the error next to it.
    pub(crate) fn apply_fetch_failure(&mut self, generation: u64, seq: u64, message: String) {
        if !self.accepts_fetch(generation, seq) {
            return;
        }
        self.last_applied_seq = seq;
        self.fetch_error = Some(message);
        self.is_loading = false;
        self.dirty = true;
    }

    pub(crate) fn set_ticker_input(&mut self, text: String) {
        if self.ticker_input == text {
            return;
        }
        self.ticker_input = text;
        self.dirty = true;
    }

    /// Consume the input box as a submission. Returns the normalized symbol
    /// to add, or None when the input is empty or already on the watchlist.
    pub(crate) fn take_submitted_symbol(&mut self) -> Option<String> {
        let symbol = normalize_symbol(&self.ticker_input);
        if symbol.is_empty() || self.tickers.contains(&symbol) {
            return None;
        }
        self.ticker_input.clear();
        self.dirty = true;
        Some(symbol)
    }

    pub(crate) fn watchlist_contains(&self, symbol: &str) -> bool {
        self.tickers.iter().any(|t| t == symbol)
    }

    pub(crate) fn set_tickers(&mut self, tickers: Vec<String>) {
        self.tickers = tickers;
        self.dirty = true;
    }

    pub(crate) fn set_ticker_error(&mut self, message: String) {
        self.ticker_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn clear_ticker_error(&mut self) {
        if self.ticker_error.take().is_some() {
            self.dirty = true;
        }
    }
}
