use chrono::TimeZone;
use indicatif::{ProgressBar, ProgressStyle};
use pipedash_core::{DashboardViewModel, PipelinePhase, PipelineSnapshot};

/// Terminal renderer: one persistent progress bar for batch progress, text
/// lines printed above it for everything else.
pub struct Renderer {
    bar: ProgressBar,
}

impl Renderer {
    pub fn new() -> Self {
        let bar = ProgressBar::new(1);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] batch {pos}/{len}")
                .unwrap()
                .progress_chars("#>-"),
        );
        Self { bar }
    }

    pub fn render(&self, view: &DashboardViewModel) {
        self.bar.println(status_line(view));

        if let Some(err) = &view.fetch_error {
            self.bar
                .println(format!("  fetch error: {err} (showing last good status)"));
        }

        if let Some(snapshot) = &view.snapshot {
            if !snapshot.steps_completed.is_empty() {
                self.bar
                    .println(format!("  done: {}", snapshot.steps_completed.join(", ")));
            }
            match snapshot.batch() {
                Some((current, total)) => {
                    self.bar.set_length(u64::from(total));
                    self.bar.set_position(u64::from(current));
                    self.bar.set_message(snapshot.current_step.clone());
                }
                None => {
                    self.bar.set_message(snapshot.current_step.clone());
                }
            }
        }

        self.bar.println(watchlist_line(view));
        if let Some(err) = &view.ticker_error {
            self.bar.println(format!("  watchlist error: {err}"));
        }
    }
}

fn status_line(view: &DashboardViewModel) -> String {
    match &view.snapshot {
        Some(snapshot) => {
            let mut line = format!(
                "pipeline {} | step: {} | updated {}",
                phase_label(snapshot.phase),
                snapshot.current_step,
                format_timestamp(snapshot.last_updated),
            );
            if finished(snapshot) {
                line.push_str(&format!(" | ended {}", format_timestamp(snapshot.end_time)));
            }
            line
        }
        None if view.is_loading => "waiting for first status fetch...".to_string(),
        None => "no status available".to_string(),
    }
}

fn watchlist_line(view: &DashboardViewModel) -> String {
    if view.tickers.is_empty() {
        "watchlist: (empty)".to_string()
    } else {
        format!("watchlist: {}", view.tickers.join(", "))
    }
}

fn finished(snapshot: &PipelineSnapshot) -> bool {
    matches!(
        snapshot.phase,
        PipelinePhase::Completed | PipelinePhase::Failed
    ) && snapshot.end_time > 0
}

fn phase_label(phase: PipelinePhase) -> &'static str {
    match phase {
        PipelinePhase::Running => "running",
        PipelinePhase::Completed => "completed",
        PipelinePhase::Failed => "failed",
    }
}

fn format_timestamp(secs: u64) -> String {
    match chrono::Utc.timestamp_opt(secs as i64, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%H:%M:%S").to_string(),
        _ => secs.to_string(),
    }
}
