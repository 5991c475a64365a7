mod amortization;
mod engine;
mod error;
mod metrics;
mod types;

pub use amortization::{compute_monthly_payment, loan_balance_schedule};
pub use engine::run_simulation;
pub use error::{SimError, SimResult};
pub use metrics::{DEFAULT_HISTOGRAM_BINS, cash_flow_histogram, percentile, summarize, year_bands};
pub use types::{
    DEFAULT_AMORTIZATION_YEARS, DEFAULT_HORIZON_YEARS, DEFAULT_SIMULATIONS, GrowthAssumptions,
    HistogramBin, MetricsSummary, SimulationInput, SimulationOutput, SimulationTrialRow, YearBand,
};
