use std::collections::BTreeMap;

use tracing::debug;

use super::error::{SimError, SimResult};
use super::types::{HistogramBin, MetricsSummary, SimulationTrialRow, YearBand};

pub const DEFAULT_HISTOGRAM_BINS: u32 = 10;

/// Headline figures: year-1 cash flow percentiles and median equity at the
/// last simulated year.
pub fn summarize(rows: &[SimulationTrialRow], monthly_payment: f64) -> SimResult<MetricsSummary> {
    let final_year = rows.iter().map(|r| r.year).max().ok_or(SimError::EmptyInput)?;

    let mut year_one_cf = column(rows, 1, |r| r.net_cash_flow);
    let mut final_equity = column(rows, final_year, |r| r.equity);
    if year_one_cf.is_empty() {
        return Err(SimError::EmptyInput);
    }

    let summary = MetricsSummary {
        monthly_mortgage: monthly_payment,
        p50_cash_flow: percentile(&mut year_one_cf, 50.0)?,
        p10_cash_flow: percentile(&mut year_one_cf, 10.0)?,
        p90_cash_flow: percentile(&mut year_one_cf, 90.0)?,
        p50_equity_year10: percentile(&mut final_equity, 50.0)?,
    };
    debug!(rows = rows.len(), final_year, "summarized simulation rows");
    Ok(summary)
}

/// Per-year equity band (p10/p50/p90) with median cash flow figures, ordered
/// by year.
pub fn year_bands(rows: &[SimulationTrialRow]) -> SimResult<Vec<YearBand>> {
    if rows.is_empty() {
        return Err(SimError::EmptyInput);
    }

    let mut by_year: BTreeMap<u32, Vec<&SimulationTrialRow>> = BTreeMap::new();
    for row in rows {
        by_year.entry(row.year).or_default().push(row);
    }

    by_year
        .into_iter()
        .map(|(year, year_rows)| {
            let mut equity: Vec<f64> = year_rows.iter().map(|r| r.equity).collect();
            let mut cash_flow: Vec<f64> = year_rows.iter().map(|r| r.net_cash_flow).collect();
            let mut cumulative: Vec<f64> = year_rows.iter().map(|r| r.cumulative_cf).collect();
            Ok(YearBand {
                year,
                p10_equity: percentile(&mut equity, 10.0)?,
                p50_equity: percentile(&mut equity, 50.0)?,
                p90_equity: percentile(&mut equity, 90.0)?,
                median_net_cash_flow: percentile(&mut cash_flow, 50.0)?,
                median_cumulative_cf: percentile(&mut cumulative, 50.0)?,
            })
        })
        .collect()
}

/// Equal-width histogram of year-1 net cash flow across trials.
///
/// The last bin is closed on the right so the maximum lands in it. A sample
/// with no spread collapses to a single bin.
pub fn cash_flow_histogram(rows: &[SimulationTrialRow], bins: u32) -> SimResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(SimError::InvalidParameter {
            name: "bins",
            value: 0.0,
            reason: "must be > 0",
        });
    }

    let values = column(rows, 1, |r| r.net_cash_flow);
    let (min, max) = values
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .ok_or(SimError::EmptyInput)?;

    if max <= min {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len() as u32,
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0_u32; bins as usize];
    for v in &values {
        let idx = (((v - min) / width) as usize).min(bins as usize - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            lower: min + width * idx as f64,
            upper: if idx + 1 == bins as usize {
                max
            } else {
                min + width * (idx + 1) as f64
            },
            count,
        })
        .collect())
}

/// Linear interpolation between order statistics (`p` in 0..=100).
pub fn percentile(values: &mut [f64], p: f64) -> SimResult<f64> {
    if values.is_empty() {
        return Err(SimError::EmptyInput);
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    if n == 1 {
        return Ok(values[0]);
    }

    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        Ok(values[lower])
    } else {
        let w = rank - lower as f64;
        let (lo, hi) = (values[lower], values[upper]);
        // Clamped so rounding never breaks monotonicity across ranks.
        Ok((lo + (hi - lo) * w).min(hi))
    }
}

fn column(
    rows: &[SimulationTrialRow],
    year: u32,
    field: impl Fn(&SimulationTrialRow) -> f64,
) -> Vec<f64> {
    rows.iter().filter(|r| r.year == year).map(field).collect()
}
