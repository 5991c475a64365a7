use serde::Serialize;

pub const DEFAULT_SIMULATIONS: u32 = 1_000;
pub const DEFAULT_HORIZON_YEARS: u32 = 10;
pub const DEFAULT_AMORTIZATION_YEARS: u32 = 25;

/// Distribution parameters for the two stochastic drivers of a trial.
///
/// Both are multiplicative factors drawn once per trial-year: `appreciation_*`
/// compounds into the home value path, `rent_noise_*` scales that year's rent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowthAssumptions {
    pub appreciation_mean: f64,
    pub appreciation_vol: f64,
    pub rent_noise_mean: f64,
    pub rent_noise_vol: f64,
}

impl Default for GrowthAssumptions {
    fn default() -> Self {
        Self {
            appreciation_mean: 1.03,
            appreciation_vol: 0.02,
            rent_noise_mean: 1.00,
            rent_noise_vol: 0.05,
        }
    }
}

/// Deal parameters for one simulation run.
///
/// Currency fields are whole units: `price` and `property_tax` per purchase and
/// per year, `rent` and `strata_fee` per month. Percentages are 0..=100.
#[derive(Debug, Clone)]
pub struct SimulationInput {
    pub price: f64,
    pub rent: f64,
    pub down_pct: f64,
    pub annual_rate: f64,
    pub strata_fee: f64,
    pub property_tax: f64,
    pub vacancy_pct: f64,
    pub n_sim: u32,
    pub horizon_years: u32,
    pub seed: Option<u64>,
    pub assumptions: GrowthAssumptions,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            price: 0.0,
            rent: 0.0,
            down_pct: 20.0,
            annual_rate: 5.0,
            strata_fee: 0.0,
            property_tax: 0.0,
            vacancy_pct: 2.0,
            n_sim: DEFAULT_SIMULATIONS,
            horizon_years: DEFAULT_HORIZON_YEARS,
            seed: None,
            assumptions: GrowthAssumptions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationTrialRow {
    pub year: u32,
    pub trial: u32,
    pub net_cash_flow: f64,
    pub equity: f64,
    pub cumulative_cf: f64,
}

/// Rows of a run together with the fixed mortgage payment they were built on.
///
/// Rows are trial-major: trial 0 years `1..=horizon_years`, then trial 1, and
/// so on.
#[derive(Debug, Clone)]
pub struct SimulationOutput {
    pub rows: Vec<SimulationTrialRow>,
    pub monthly_payment: f64,
    pub horizon_years: u32,
    pub seed: u64,
}

impl SimulationOutput {
    pub fn trial_count(&self) -> usize {
        if self.horizon_years == 0 {
            0
        } else {
            self.rows.len() / self.horizon_years as usize
        }
    }

    pub fn rows_for_trial(&self, trial: u32) -> &[SimulationTrialRow] {
        let horizon = self.horizon_years as usize;
        let start = trial as usize * horizon;
        if horizon == 0 || start >= self.rows.len() {
            return &[];
        }
        &self.rows[start..(start + horizon).min(self.rows.len())]
    }

    pub fn rows_for_year(&self, year: u32) -> impl Iterator<Item = &SimulationTrialRow> + '_ {
        let skip = if (1..=self.horizon_years).contains(&year) {
            (year - 1) as usize
        } else {
            self.rows.len()
        };
        self.rows
            .iter()
            .skip(skip)
            .step_by((self.horizon_years as usize).max(1))
    }

    pub fn into_parts(self) -> (Vec<SimulationTrialRow>, f64) {
        (self.rows, self.monthly_payment)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub monthly_mortgage: f64,
    pub p50_cash_flow: f64,
    pub p10_cash_flow: f64,
    pub p90_cash_flow: f64,
    /// Median equity at the last simulated year, whatever the horizon.
    pub p50_equity_year10: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBand {
    pub year: u32,
    pub p10_equity: f64,
    pub p50_equity: f64,
    pub p90_equity: f64,
    pub median_net_cash_flow: f64,
    pub median_cumulative_cf: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}
