use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A statistic that could not be meaningfully computed and was reported as 0.
///
/// These are expected for short or sparse histories and are never raised as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegenerateStatistic {
    /// Fewer than two daily points, so no daily return exists
    Volatility,
    /// Elapsed span too short to annualize
    AnnualizedReturn,
    /// First value is zero, so relative change is undefined
    ZeroInitialValue,
}

/// Summary statistics of one portfolio over its full series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,

    /// Number of daily points summarized
    pub observations: usize,

    pub initial_value: Decimal,
    pub current_value: Decimal,

    /// current_value - initial_value
    pub absolute_change: Decimal,

    /// (current - initial) / initial × 100
    pub percent_change: Decimal,

    /// Compound annual growth in percent; 0 for sub-threshold spans
    pub annualized_return_pct: Decimal,

    pub min_value: Decimal,
    pub min_date: NaiveDate,
    pub max_value: Decimal,
    pub max_date: NaiveDate,

    /// Population std-dev of daily returns × sqrt(trading days) × 100
    pub annualized_volatility_pct: Decimal,

    /// Statistics above that were reported as 0 because they are undefined
    #[serde(default)]
    pub degenerate: Vec<DegenerateStatistic>,
}

impl PerformanceSummary {
    #[must_use]
    pub fn is_degenerate(&self, statistic: DegenerateStatistic) -> bool {
        self.degenerate.contains(&statistic)
    }
}

/// One shared date of two indexed portfolios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    pub value_a: Decimal,
    pub value_b: Decimal,

    /// value_a rescaled to 100 at the first common date
    pub index_a: Decimal,
    pub index_b: Decimal,

    /// index_b - index_a; positive when B has outperformed A
    pub index_difference: Decimal,
}

/// Result of comparing two portfolios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub first_common_date: NaiveDate,
    pub summary_a: PerformanceSummary,
    pub summary_b: PerformanceSummary,
    pub aligned: Vec<ComparisonPoint>,
}

impl Comparison {
    /// The most recent aligned point, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&ComparisonPoint> {
        self.aligned.last()
    }
}
