use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::instrument::InstrumentId;
use crate::models::portfolio::{PortfolioPoint, PortfolioSeries};
use crate::models::series::SimulatedPoint;

/// Combines per-instrument simulated series into one portfolio value series.
///
/// Instruments rarely report on exactly the same dates (fixed-NAV funds post
/// every calendar day, others only on trading days). On a date where an
/// instrument has no observation, its contribution is its last observed
/// value, never zero.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Aggregate simulated series keyed by instrument.
    ///
    /// One pass over the union of dates, oldest first. Every instrument is
    /// present in every point, starting at 0 until its first observation.
    pub fn aggregate(
        &self,
        name: &str,
        series_by_instrument: &BTreeMap<InstrumentId, Vec<SimulatedPoint>>,
    ) -> Result<PortfolioSeries, CoreError> {
        let dates: BTreeSet<NaiveDate> = series_by_instrument
            .values()
            .flat_map(|points| points.iter().map(|p| p.date))
            .collect();

        // Index each series by date; a later duplicate date overrides an earlier one
        let by_date: BTreeMap<&InstrumentId, BTreeMap<NaiveDate, Decimal>> = series_by_instrument
            .iter()
            .map(|(id, points)| (id, points.iter().map(|p| (p.date, p.value)).collect()))
            .collect();

        let mut last_known: BTreeMap<InstrumentId, Decimal> = series_by_instrument
            .keys()
            .map(|id| (id.clone(), Decimal::ZERO))
            .collect();

        let mut points = Vec::with_capacity(dates.len());
        for date in dates {
            for (id, values) in &by_date {
                if let (Some(value), Some(slot)) = (values.get(&date), last_known.get_mut(*id)) {
                    *slot = *value;
                }
            }

            let total_value = last_known
                .values()
                .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
                .ok_or_else(|| CoreError::ArithmeticOverflow {
                    subject: name.to_string(),
                    date,
                })?;
            points.push(PortfolioPoint {
                date,
                component_values: last_known.clone(),
                total_value,
            });
        }

        debug!(
            portfolio = name,
            instruments = series_by_instrument.len(),
            points = points.len(),
            "aggregated portfolio"
        );

        Ok(PortfolioSeries::new(name, points))
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
