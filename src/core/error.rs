use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("amortization term of {years} years resolves to zero months")]
    InvalidAmortizationTerm { years: u32 },

    #[error("no simulation rows to aggregate")]
    EmptyInput,

    #[error("invalid {name} ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type SimResult<T> = Result<T, SimError>;

pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if !value.is_finite() {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value < 0.0 {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be >= 0",
        });
    }
    Ok(())
}

pub(crate) fn ensure_percentage(name: &'static str, value: f64) -> SimResult<()> {
    ensure_non_negative(name, value)?;
    if value > 100.0 {
        return Err(SimError::InvalidParameter {
            name,
            value,
            reason: "must be between 0 and 100",
        });
    }
    Ok(())
}
