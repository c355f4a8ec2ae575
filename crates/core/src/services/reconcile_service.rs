use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::instrument::InstrumentId;
use crate::models::series::{DistributionEvent, NavPoint, ReconciledPoint};

/// Merges one instrument's NAV series and distribution events into a single
/// date-ordered series carrying a per-date reinvestment ratio.
///
/// Pure business logic — no I/O. The output order never depends on the
/// order of the inputs.
pub struct ReconcileService {
    fixed_nav_price: Decimal,
}

/// Per-date distribution data after merging same-day events.
struct DistributionDay {
    ratio: Decimal,
    /// Reinvestment price of the first event on that date, used as NAV fallback
    price: Decimal,
}

impl ReconcileService {
    pub fn new(fixed_nav_price: Decimal) -> Self {
        Self { fixed_nav_price }
    }

    /// Reconcile a NAV series with distribution events.
    ///
    /// - Output dates are the union of both inputs, oldest first.
    /// - `reinvest_ratio = distribution / nav_at_distribution` on distribution
    ///   dates, 0 elsewhere. Several events on the same date add up.
    /// - NAV comes from the priced series, falling back to the distribution
    ///   record's own price. With `is_fixed_nav` it is always the fixed price.
    pub fn reconcile(
        &self,
        instrument: &InstrumentId,
        nav_series: &[NavPoint],
        distributions: &[DistributionEvent],
        is_fixed_nav: bool,
    ) -> Result<Vec<ReconciledPoint>, CoreError> {
        let navs = Self::index_navs(instrument, nav_series)?;
        let dists = Self::index_distributions(instrument, distributions)?;

        let mut dates: Vec<NaiveDate> = navs.keys().chain(dists.keys()).copied().collect();
        dates.sort_unstable();
        dates.dedup();

        let points: Vec<ReconciledPoint> = dates
            .into_iter()
            .map(|date| {
                let day = dists.get(&date);
                let nav = if is_fixed_nav {
                    Some(self.fixed_nav_price)
                } else {
                    navs.get(&date)
                        .copied()
                        .flatten()
                        .or_else(|| day.map(|d| d.price))
                };
                ReconciledPoint {
                    date,
                    nav,
                    reinvest_ratio: day.map(|d| d.ratio).unwrap_or(Decimal::ZERO),
                }
            })
            .collect();

        debug!(
            instrument = %instrument,
            nav_points = nav_series.len(),
            distributions = distributions.len(),
            reconciled = points.len(),
            "reconciled series"
        );

        Ok(points)
    }

    /// Build date → NAV. Rejects duplicate dates and negative prices.
    fn index_navs(
        instrument: &InstrumentId,
        nav_series: &[NavPoint],
    ) -> Result<BTreeMap<NaiveDate, Option<Decimal>>, CoreError> {
        let mut navs = BTreeMap::new();
        for point in nav_series {
            if let Some(nav) = point.nav {
                if nav < Decimal::ZERO {
                    return Err(CoreError::ValidationError(format!(
                        "Negative NAV {nav} for {instrument} on {}",
                        point.date
                    )));
                }
            }
            if navs.insert(point.date, point.nav).is_some() {
                return Err(CoreError::ValidationError(format!(
                    "Duplicate NAV date {} for {instrument}",
                    point.date
                )));
            }
        }
        Ok(navs)
    }

    /// Build date → (summed ratio, reinvestment price).
    fn index_distributions(
        instrument: &InstrumentId,
        distributions: &[DistributionEvent],
    ) -> Result<BTreeMap<NaiveDate, DistributionDay>, CoreError> {
        let mut days: BTreeMap<NaiveDate, DistributionDay> = BTreeMap::new();
        for event in distributions {
            if event.distribution_per_unit < Decimal::ZERO {
                return Err(CoreError::ValidationError(format!(
                    "Negative distribution {} for {instrument} on {}",
                    event.distribution_per_unit, event.date
                )));
            }
            let price = match event.nav_at_distribution {
                Some(price) if price > Decimal::ZERO => price,
                _ => {
                    return Err(CoreError::InvalidDistributionRatio {
                        instrument: instrument.clone(),
                        date: event.date,
                    })
                }
            };
            let overflow = || CoreError::ArithmeticOverflow {
                subject: instrument.to_string(),
                date: event.date,
            };
            let ratio = event
                .distribution_per_unit
                .checked_div(price)
                .ok_or_else(overflow)?;
            match days.get_mut(&event.date) {
                Some(day) => day.ratio = day.ratio.checked_add(ratio).ok_or_else(overflow)?,
                None => {
                    days.insert(event.date, DistributionDay { ratio, price });
                }
            }
        }
        Ok(days)
    }
}

impl Default for ReconcileService {
    fn default() -> Self {
        Self::new(Decimal::ONE)
    }
}
