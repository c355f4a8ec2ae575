use chrono::NaiveDate;
use thiserror::Error;

use crate::models::instrument::InstrumentId;

/// Unified error type for the entire fund-reinvest-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// Data errors carry the instrument and date they were found on so the
/// caller can decide whether to drop that instrument or abort the run.
/// None of them is ever replaced by a silent zero.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Series data ─────────────────────────────────────────────────
    #[error("Missing NAV for {instrument} on {date}")]
    MissingPriceData {
        instrument: InstrumentId,
        date: NaiveDate,
    },

    #[error("Invalid distribution ratio for {instrument} on {date}: reinvestment price is zero or missing")]
    InvalidDistributionRatio {
        instrument: InstrumentId,
        date: NaiveDate,
    },

    #[error("No data for {instrument} on or after {start_date}")]
    EmptyWindow {
        instrument: InstrumentId,
        start_date: NaiveDate,
    },

    /// A decimal operation left the representable range. `subject` is the
    /// instrument or portfolio being computed.
    #[error("Arithmetic overflow for {subject} on {date}")]
    ArithmeticOverflow { subject: String, date: NaiveDate },

    // ── Comparison ──────────────────────────────────────────────────
    #[error("Portfolios '{portfolio_a}' and '{portfolio_b}' share no common date")]
    InsufficientAlignment {
        portfolio_a: String,
        portfolio_b: String,
    },

    #[error("Portfolio '{portfolio}' has a zero total on {date}; cannot index against it")]
    ZeroBaseValue { portfolio: String, date: NaiveDate },

    // ── Input / configuration ───────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("No data supplied for instrument: {0}")]
    UnknownInstrument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // ── Series sources ──────────────────────────────────────────────
    #[error("Source error ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    #[error("No source available for instrument: {0}")]
    NoSource(String),
}

impl CoreError {
    /// True for errors caused by one instrument's data, which a caller may
    /// choose to exclude while continuing with the rest of the portfolio.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingPriceData { .. }
                | CoreError::InvalidDistributionRatio { .. }
                | CoreError::EmptyWindow { .. }
                | CoreError::ArithmeticOverflow { .. }
                | CoreError::ValidationError(_)
                | CoreError::UnknownInstrument(_)
                | CoreError::Source { .. }
                | CoreError::NoSource(_)
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Configuration(e.to_string())
    }
}
