#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Status widget mounted, or the polling interval was reconfigured.
    PollStarted { interval_ms: u64 },
    /// Status widget torn down.
    PollStopped,
    /// Engine completed one status fetch.
    StatusFetched {
        generation: u64,
        seq: u64,
        snapshot: crate::PipelineSnapshot,
    },
    /// Engine failed one status fetch.
    StatusFetchFailed {
        generation: u64,
        seq: u64,
        message: String,
    },
    /// User edited the symbol input box.
    TickerInputChanged(String),
    /// User submitted the current input as a new watchlist symbol.
    TickerSubmitted,
    /// User asked to remove one symbol from the watchlist.
    TickerRemoveClicked { symbol: String },
    /// Engine loaded the watchlist.
    TickersLoaded { tickers: Vec<String> },
    /// Engine finished an add/remove call.
    TickerMutationDone { result: Result<(), String> },
    /// Fallback for placeholder wiring.
    NoOp,
}
