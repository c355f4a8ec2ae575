use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::instrument::InstrumentId;

/// One date of a combined portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPoint {
    pub date: NaiveDate,

    /// Per-instrument value on this date, observed or carried forward
    pub component_values: BTreeMap<InstrumentId, Decimal>,

    /// Sum of `component_values`
    pub total_value: Decimal,
}

/// Daily value series of a portfolio, oldest first.
///
/// Built wholesale by the aggregator; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSeries {
    /// Display name, used to identify the portfolio in errors
    pub name: String,

    pub points: Vec<PortfolioPoint>,
}

impl PortfolioSeries {
    pub fn new(name: impl Into<String>, points: Vec<PortfolioPoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&PortfolioPoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PortfolioPoint> {
        self.points.last()
    }

    /// Total value recorded on `date`, if the portfolio has a point there.
    /// Uses binary search (O(log n)); points are sorted by date.
    #[must_use]
    pub fn total_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].total_value)
    }

    /// Instruments contributing to this portfolio.
    #[must_use]
    pub fn instruments(&self) -> Vec<&InstrumentId> {
        self.points
            .first()
            .map(|p| p.component_values.keys().collect())
            .unwrap_or_default()
    }
}
