use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail};
use pipedash_core::{normalize_symbol, update, AppState, Effect, Msg};
use pipedash_engine::{ClientSettings, EngineEvent, EngineHandle, FetchError};

use crate::effects::EffectRunner;
use crate::render::Renderer;
use crate::TickerAction;

const IDLE_SLEEP: Duration = Duration::from_millis(20);

/// A little over the transport's request timeout, so the transport error
/// arrives before we give up waiting for it.
const ONE_SHOT_TIMEOUT: Duration = Duration::from_secs(35);

fn engine_error(err: FetchError) -> anyhow::Error {
    anyhow!("{}: {}", err.kind, err.message)
}

/// Run the live dashboard until the process is interrupted.
pub fn run_watch(settings: ClientSettings, interval_ms: u64) -> anyhow::Result<()> {
    let runner = EffectRunner::new(settings).map_err(engine_error)?;
    let renderer = Renderer::new();
    let mut state = AppState::new();

    // Mount: begin polling and load the watchlist.
    state = dispatch(state, Msg::PollStarted { interval_ms }, &runner, &renderer);
    runner.run(vec![Effect::FetchTickers]);

    loop {
        let mut saw_event = false;
        while let Some(msg) = runner.poll_msg() {
            saw_event = true;
            state = dispatch(state, msg, &runner, &renderer);
        }
        if !saw_event {
            thread::sleep(IDLE_SLEEP);
        }
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner, renderer: &Renderer) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);
    if state.consume_dirty() {
        renderer.render(&state.view());
    }
    state
}

/// One-shot watchlist commands.
pub fn run_tickers(settings: ClientSettings, action: TickerAction) -> anyhow::Result<()> {
    let engine = EngineHandle::new(settings).map_err(engine_error)?;

    match action {
        TickerAction::List => {
            engine.fetch_tickers();
            print_list(&wait_for_tickers(&engine)?);
        }
        TickerAction::Add { symbol } => {
            let symbol = normalize_symbol(&symbol);
            if symbol.is_empty() {
                bail!("symbol must not be empty");
            }
            engine.add_ticker(symbol.clone());
            wait_for_mutation(&engine)?;
            println!("added {symbol}");
            engine.fetch_tickers();
            print_list(&wait_for_tickers(&engine)?);
        }
        TickerAction::Remove { symbol } => {
            let symbol = normalize_symbol(&symbol);
            if symbol.is_empty() {
                bail!("symbol must not be empty");
            }
            engine.remove_ticker(symbol.clone());
            wait_for_mutation(&engine)?;
            println!("removed {symbol}");
            engine.fetch_tickers();
            print_list(&wait_for_tickers(&engine)?);
        }
    }

    Ok(())
}

fn wait_for_event(engine: &EngineHandle) -> anyhow::Result<EngineEvent> {
    let deadline = Instant::now() + ONE_SHOT_TIMEOUT;
    loop {
        if let Some(event) = engine.try_recv() {
            return Ok(event);
        }
        if Instant::now() >= deadline {
            bail!("timed out waiting for the backend");
        }
        thread::sleep(IDLE_SLEEP);
    }
}

fn wait_for_tickers(engine: &EngineHandle) -> anyhow::Result<Vec<String>> {
    match wait_for_event(engine)? {
        EngineEvent::TickersLoaded { result } => result.map_err(engine_error),
        other => bail!("unexpected engine event {other:?}"),
    }
}

fn wait_for_mutation(engine: &EngineHandle) -> anyhow::Result<()> {
    match wait_for_event(engine)? {
        EngineEvent::TickerMutated { result } => result.map_err(engine_error),
        other => bail!("unexpected engine event {other:?}"),
    }
}

fn print_list(tickers: &[String]) {
    if tickers.is_empty() {
        println!("(empty watchlist)");
    } else {
        for ticker in tickers {
            println!("{ticker}");
        }
    }
}
