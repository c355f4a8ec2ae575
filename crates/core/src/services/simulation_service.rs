use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::instrument::InstrumentId;
use crate::models::series::{ReconciledPoint, SimulatedPoint};
use crate::models::settings::HoldingConfig;

/// Walks a reconciled series forward from an initial holding, compounding
/// units on every distribution date.
///
/// Pure business logic — no I/O, no shared state.
pub struct SimulationService;

impl SimulationService {
    pub fn new() -> Self {
        Self
    }

    /// Simulate a holding under automatic reinvestment.
    ///
    /// For each date `>= start_date`, oldest first:
    /// 1. If the date carries a reinvestment ratio, `units += units * ratio`
    ///    (the distribution is reinvested at that day's NAV, before valuing it).
    /// 2. `value = units * nav`.
    ///
    /// Every date in the window must have a NAV.
    pub fn simulate(
        &self,
        instrument: &InstrumentId,
        reconciled: &[ReconciledPoint],
        starting_units: Decimal,
        start_date: NaiveDate,
    ) -> Result<Vec<SimulatedPoint>, CoreError> {
        if starting_units <= Decimal::ZERO {
            return Err(CoreError::ValidationError(format!(
                "Starting units for {instrument} must be positive, got {starting_units}"
            )));
        }

        let mut window: Vec<&ReconciledPoint> =
            reconciled.iter().filter(|p| p.date >= start_date).collect();
        // Downstream relies on ascending order even if the caller's series isn't
        window.sort_by_key(|p| p.date);

        let first = window.first().ok_or_else(|| CoreError::EmptyWindow {
            instrument: instrument.clone(),
            start_date,
        })?;
        let first_nav = first.nav.ok_or_else(|| CoreError::MissingPriceData {
            instrument: instrument.clone(),
            date: first.date,
        })?;
        let initial_value = starting_units
            .checked_mul(first_nav)
            .ok_or_else(|| CoreError::ArithmeticOverflow {
                subject: instrument.to_string(),
                date: first.date,
            })?;

        let mut units = starting_units;
        let mut reinvestments = 0usize;
        let mut points = Vec::with_capacity(window.len());

        for point in window {
            let nav = point.nav.ok_or_else(|| CoreError::MissingPriceData {
                instrument: instrument.clone(),
                date: point.date,
            })?;

            let overflow = || CoreError::ArithmeticOverflow {
                subject: instrument.to_string(),
                date: point.date,
            };

            if point.reinvest_ratio > Decimal::ZERO {
                units = units
                    .checked_mul(point.reinvest_ratio)
                    .and_then(|added| units.checked_add(added))
                    .ok_or_else(overflow)?;
                reinvestments += 1;
            }

            let value = units.checked_mul(nav).ok_or_else(overflow)?;
            let change_from_start_pct = if initial_value.is_zero() {
                Decimal::ZERO
            } else {
                (value - initial_value)
                    .checked_div(initial_value)
                    .and_then(|ratio| ratio.checked_mul(dec!(100)))
                    .ok_or_else(overflow)?
            };

            points.push(SimulatedPoint {
                date: point.date,
                holding_units: units,
                nav,
                value,
                change_from_start_pct,
            });
        }

        debug!(
            instrument = %instrument,
            %start_date,
            points = points.len(),
            reinvestments,
            final_units = %units,
            "simulated holding"
        );

        Ok(points)
    }

    /// Simulate using a configured holding.
    pub fn simulate_holding(
        &self,
        reconciled: &[ReconciledPoint],
        holding: &HoldingConfig,
    ) -> Result<Vec<SimulatedPoint>, CoreError> {
        self.simulate(
            &holding.instrument,
            reconciled,
            holding.starting_units,
            holding.start_date,
        )
    }
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new()
    }
}
