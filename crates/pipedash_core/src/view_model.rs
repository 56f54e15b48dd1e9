use crate::PipelineSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardViewModel {
    pub poll_active: bool,
    pub interval_ms: u64,
    pub is_loading: bool,
    pub snapshot: Option<PipelineSnapshot>,
    pub fetch_error: Option<String>,
    pub tickers: Vec<String>,
    pub ticker_input: String,
    pub ticker_error: Option<String>,
    pub dirty: bool,
}
