use super::error::{SimError, SimResult, ensure_non_negative};

const MONTHS_PER_YEAR: u32 = 12;

/// Fixed monthly payment, in cents, that retires `principal_cents` over
/// `amortization_years` at `annual_rate_pct` (5.0 means 5%).
///
/// Rounds to the nearest cent, ties to even, so a loan of only a few cents
/// over a long term can round down to a payment of zero. Very long terms
/// converge on interest-only (`principal * monthly_rate`).
pub fn compute_monthly_payment(
    principal_cents: i64,
    annual_rate_pct: f64,
    amortization_years: u32,
) -> SimResult<i64> {
    if principal_cents < 0 {
        return Err(SimError::InvalidParameter {
            name: "principal",
            value: principal_cents as f64,
            reason: "must be >= 0",
        });
    }
    ensure_non_negative("annual_rate", annual_rate_pct)?;

    let months = amortization_years.saturating_mul(MONTHS_PER_YEAR);
    if months == 0 {
        return Err(SimError::InvalidAmortizationTerm {
            years: amortization_years,
        });
    }

    let principal = principal_cents as f64;
    let monthly_rate = monthly_rate(annual_rate_pct);
    let payment = if monthly_rate == 0.0 {
        principal / months as f64
    } else {
        principal * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-(months as f64)))
    };

    if !payment.is_finite() {
        return Err(SimError::InvalidParameter {
            name: "annual_rate",
            value: annual_rate_pct,
            reason: "payment is not representable for this loan",
        });
    }

    Ok(payment.round_ties_even() as i64)
}

/// Remaining balance in cents at each year boundary `0..=years`.
///
/// Index 0 is the original principal. Once the loan is paid off the balance
/// stays at zero.
pub fn loan_balance_schedule(
    principal_cents: i64,
    monthly_payment_cents: i64,
    annual_rate_pct: f64,
    years: u32,
) -> Vec<i64> {
    let principal = principal_cents as f64;
    let payment = monthly_payment_cents as f64;
    let monthly_rate = monthly_rate(annual_rate_pct);

    (0..=years)
        .map(|year| {
            if year == 0 {
                return principal_cents;
            }
            let months = year.saturating_mul(MONTHS_PER_YEAR);
            let balance = if monthly_rate == 0.0 {
                principal - payment * months as f64
            } else {
                let growth = (1.0 + monthly_rate).powf(months as f64);
                principal * growth - payment * (growth - 1.0) / monthly_rate
            };
            balance.max(0.0).round_ties_even() as i64
        })
        .collect()
}

fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 100.0 / MONTHS_PER_YEAR as f64
}
