use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::debug;

use super::amortization::{compute_monthly_payment, loan_balance_schedule};
use super::error::{SimError, SimResult, ensure_non_negative, ensure_percentage};
use super::types::{
    DEFAULT_AMORTIZATION_YEARS, GrowthAssumptions, SimulationInput, SimulationOutput,
    SimulationTrialRow,
};

const CENTS_PER_UNIT: f64 = 100.0;

/// Everything a trial needs that does not depend on its random draws.
struct TrialContext {
    price: f64,
    annual_rent_net_of_vacancy: f64,
    annual_fixed_costs: f64,
    horizon_years: u32,
    base_seed: u64,
    balances: Vec<f64>,
    appreciation: Normal<f64>,
    rent_noise: Normal<f64>,
}

pub fn run_simulation(input: &SimulationInput) -> SimResult<SimulationOutput> {
    validate_input(input)?;

    let principal_units = (input.price * (1.0 - input.down_pct / 100.0)).round_ties_even();
    let principal_cents = (principal_units * CENTS_PER_UNIT) as i64;
    let payment_cents =
        compute_monthly_payment(principal_cents, input.annual_rate, DEFAULT_AMORTIZATION_YEARS)?;
    let monthly_payment = payment_cents as f64 / CENTS_PER_UNIT;

    let base_seed = input.seed.unwrap_or_else(|| rand::rng().random());
    debug!(
        trials = input.n_sim,
        horizon_years = input.horizon_years,
        seed = base_seed,
        principal_cents,
        payment_cents,
        "running property simulation"
    );

    if input.n_sim == 0 || input.horizon_years == 0 {
        return Ok(SimulationOutput {
            rows: Vec::new(),
            monthly_payment,
            horizon_years: input.horizon_years,
            seed: base_seed,
        });
    }

    let balances = loan_balance_schedule(
        principal_cents,
        payment_cents,
        input.annual_rate,
        input.horizon_years,
    )
    .into_iter()
    .map(|cents| cents as f64 / CENTS_PER_UNIT)
    .collect();

    let context = TrialContext {
        price: input.price,
        annual_rent_net_of_vacancy: input.rent * (1.0 - input.vacancy_pct / 100.0) * 12.0,
        annual_fixed_costs: monthly_payment * 12.0 + input.strata_fee * 12.0 + input.property_tax,
        horizon_years: input.horizon_years,
        base_seed,
        balances,
        appreciation: normal(
            "appreciation",
            input.assumptions.appreciation_mean,
            input.assumptions.appreciation_vol,
        )?,
        rent_noise: normal(
            "rent_noise",
            input.assumptions.rent_noise_mean,
            input.assumptions.rent_noise_vol,
        )?,
    };

    #[cfg(feature = "parallel")]
    let trials: Vec<Vec<SimulationTrialRow>> = (0..input.n_sim)
        .into_par_iter()
        .map(|trial| simulate_trial(&context, trial))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let trials: Vec<Vec<SimulationTrialRow>> = (0..input.n_sim)
        .map(|trial| simulate_trial(&context, trial))
        .collect();

    Ok(SimulationOutput {
        rows: trials.into_iter().flatten().collect(),
        monthly_payment,
        horizon_years: input.horizon_years,
        seed: base_seed,
    })
}

fn simulate_trial(context: &TrialContext, trial: u32) -> Vec<SimulationTrialRow> {
    let mut rng = StdRng::seed_from_u64(derive_seed(context.base_seed, trial));
    let mut rows = Vec::with_capacity(context.horizon_years as usize);
    let mut home_value = context.price;
    let mut cumulative_cf = 0.0;

    for year in 1..=context.horizon_years {
        home_value *= context.appreciation.sample(&mut rng);
        let annual_rent = context.annual_rent_net_of_vacancy * context.rent_noise.sample(&mut rng);
        let net_cash_flow = annual_rent - context.annual_fixed_costs;
        cumulative_cf += net_cash_flow;

        rows.push(SimulationTrialRow {
            year,
            trial,
            net_cash_flow,
            equity: home_value - context.balances[year as usize],
            cumulative_cf,
        });
    }

    rows
}

fn validate_input(input: &SimulationInput) -> SimResult<()> {
    ensure_non_negative("price", input.price)?;
    ensure_non_negative("rent", input.rent)?;
    ensure_percentage("down_pct", input.down_pct)?;
    ensure_non_negative("annual_rate", input.annual_rate)?;
    ensure_non_negative("strata_fee", input.strata_fee)?;
    ensure_non_negative("property_tax", input.property_tax)?;
    ensure_percentage("vacancy_pct", input.vacancy_pct)?;
    validate_assumptions(&input.assumptions)
}

fn validate_assumptions(assumptions: &GrowthAssumptions) -> SimResult<()> {
    ensure_non_negative("appreciation_mean", assumptions.appreciation_mean)?;
    ensure_non_negative("appreciation_vol", assumptions.appreciation_vol)?;
    ensure_non_negative("rent_noise_mean", assumptions.rent_noise_mean)?;
    ensure_non_negative("rent_noise_vol", assumptions.rent_noise_vol)
}

fn normal(name: &'static str, mean: f64, vol: f64) -> SimResult<Normal<f64>> {
    Normal::new(mean, vol).map_err(|_| SimError::InvalidParameter {
        name,
        value: vol,
        reason: "standard deviation must be finite and >= 0",
    })
}

fn derive_seed(base_seed: u64, trial: u32) -> u64 {
    splitmix64(splitmix64(base_seed) ^ trial as u64)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
