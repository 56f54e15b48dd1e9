use crate::{AppState, Effect, Msg, PollState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::PollStarted { interval_ms } => {
            if interval_ms == 0 {
                return (state, Vec::new());
            }
            // Reconfiguration is modeled as stop-then-start: the old session
            // is torn down whole, never partially adjusted.
            let was_active = state.poll() != PollState::Idle;
            let generation = state.start_polling(interval_ms);
            let mut effects = Vec::with_capacity(1 + usize::from(was_active));
            if was_active {
                effects.push(Effect::StopPolling);
            }
            effects.push(Effect::StartPolling {
                generation,
                interval_ms,
            });
            effects
        }
        Msg::PollStopped => {
            if state.stop_polling() {
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::StatusFetched {
            generation,
            seq,
            snapshot,
        } => {
            state.apply_snapshot(generation, seq, snapshot);
            Vec::new()
        }
        Msg::StatusFetchFailed {
            generation,
            seq,
            message,
        } => {
            state.apply_fetch_failure(generation, seq, message);
            Vec::new()
        }
        Msg::TickerInputChanged(text) => {
            state.set_ticker_input(text);
            Vec::new()
        }
        Msg::TickerSubmitted => match state.take_submitted_symbol() {
            Some(symbol) => vec![Effect::AddTicker { symbol }],
            None => Vec::new(),
        },
        Msg::TickerRemoveClicked { symbol } => {
            let symbol = crate::normalize_symbol(&symbol);
            if state.watchlist_contains(&symbol) {
                vec![Effect::RemoveTicker { symbol }]
            } else {
                Vec::new()
            }
        }
        Msg::TickersLoaded { tickers } => {
            state.set_tickers(tickers);
            Vec::new()
        }
        Msg::TickerMutationDone { result } => match result {
            Ok(()) => {
                // The backend owns the list; a successful mutation is
                // followed by a refresh rather than a local edit.
                state.clear_ticker_error();
                vec![Effect::FetchTickers]
            }
            Err(message) => {
                state.set_ticker_error(message);
                Vec::new()
            }
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
