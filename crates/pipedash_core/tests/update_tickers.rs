use pipedash_core::{update, AppState, Effect, Msg};

fn submit_symbol(state: AppState, input: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::TickerInputChanged(input.to_string()));
    update(state, Msg::TickerSubmitted)
}

#[test]
fn submit_trims_and_uppercases() {
    let state = AppState::new();

    let (mut next, effects) = submit_symbol(state, "  aapl ");

    assert_eq!(
        effects,
        vec![Effect::AddTicker {
            symbol: "AAPL".to_string(),
        }]
    );
    assert_eq!(next.view().ticker_input, "");
    assert!(next.consume_dirty());
}

#[test]
fn empty_submit_is_ignored() {
    let state = AppState::new();

    let (next, effects) = submit_symbol(state, "   ");

    assert!(effects.is_empty());
    assert!(next.view().tickers.is_empty());
}

#[test]
fn duplicate_submit_is_skipped() {
    let state = AppState::new();
    let (state, _effects) = update(
        state,
        Msg::TickersLoaded {
            tickers: vec!["AAPL".to_string()],
        },
    );

    let (next, effects) = submit_symbol(state, "aapl");

    assert!(effects.is_empty());
    // Input is left in place so the user can correct it.
    assert_eq!(next.view().ticker_input, "aapl");
}

#[test]
fn successful_mutation_triggers_refresh() {
    let state = AppState::new();
    let (state, _effects) = submit_symbol(state, "MSFT");

    let (state, effects) = update(state, Msg::TickerMutationDone { result: Ok(()) });
    assert_eq!(effects, vec![Effect::FetchTickers]);

    let (state, effects) = update(
        state,
        Msg::TickersLoaded {
            tickers: vec!["AAPL".to_string(), "MSFT".to_string()],
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().tickers, vec!["AAPL", "MSFT"]);
}

#[test]
fn failed_mutation_sets_error_and_next_success_clears_it() {
    let state = AppState::new();
    let (state, _effects) = submit_symbol(state, "MSFT");

    let (state, effects) = update(
        state,
        Msg::TickerMutationDone {
            result: Err("409 conflict".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().ticker_error.as_deref(), Some("409 conflict"));

    let (state, effects) = update(state, Msg::TickerMutationDone { result: Ok(()) });
    assert_eq!(effects, vec![Effect::FetchTickers]);
    assert!(state.view().ticker_error.is_none());
}

#[test]
fn remove_requires_known_symbol() {
    let state = AppState::new();
    let (state, _effects) = update(
        state,
        Msg::TickersLoaded {
            tickers: vec!["AAPL".to_string()],
        },
    );

    let (state, effects) = update(
        state,
        Msg::TickerRemoveClicked {
            symbol: "TSLA".to_string(),
        },
    );
    assert!(effects.is_empty());

    let (_state, effects) = update(
        state,
        Msg::TickerRemoveClicked {
            symbol: "aapl".to_string(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RemoveTicker {
            symbol: "AAPL".to_string(),
        }]
    );
}
