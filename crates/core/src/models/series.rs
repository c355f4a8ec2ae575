use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::instrument::{Instrument, InstrumentId};

/// One NAV observation (date → price).
///
/// `nav` is `None` when the upstream row exists but carried no usable price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavPoint {
    pub date: NaiveDate,
    pub nav: Option<Decimal>,
}

impl NavPoint {
    pub fn new(date: NaiveDate, nav: Decimal) -> Self {
        Self {
            date,
            nav: Some(nav),
        }
    }

    /// A dated row without a price.
    pub fn unpriced(date: NaiveDate) -> Self {
        Self { date, nav: None }
    }
}

/// An income or capital-gain distribution paid on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEvent {
    pub date: NaiveDate,

    /// Cash paid per unit held
    pub distribution_per_unit: Decimal,

    /// Reinvestment price on the payout date (always 1 for fixed-NAV funds).
    /// Required; a missing or zero price makes the ratio undefined.
    pub nav_at_distribution: Option<Decimal>,
}

impl DistributionEvent {
    pub fn new(date: NaiveDate, distribution_per_unit: Decimal, nav_at_distribution: Decimal) -> Self {
        Self {
            date,
            distribution_per_unit,
            nav_at_distribution: Some(nav_at_distribution),
        }
    }
}

/// One date of a reconciled NAV + distribution series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledPoint {
    pub date: NaiveDate,

    /// Absent only for floating-NAV instruments with no price on this date
    pub nav: Option<Decimal>,

    /// `distribution / reinvestment price` on distribution dates, else 0
    pub reinvest_ratio: Decimal,
}

impl ReconciledPoint {
    #[must_use]
    pub fn is_distribution_date(&self) -> bool {
        self.reinvest_ratio > Decimal::ZERO
    }
}

/// One valued date of a holding under automatic reinvestment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedPoint {
    pub date: NaiveDate,

    /// Units held after applying this date's reinvestment
    pub holding_units: Decimal,

    pub nav: Decimal,

    /// `holding_units * nav`
    pub value: Decimal,

    /// Percentage change against `starting_units * first nav`
    pub change_from_start_pct: Decimal,
}

/// Raw, already-parsed inputs for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentData {
    pub instrument: Instrument,
    pub nav_series: Vec<NavPoint>,
    #[serde(default)]
    pub distributions: Vec<DistributionEvent>,
}

impl InstrumentData {
    pub fn new(
        instrument: Instrument,
        nav_series: Vec<NavPoint>,
        distributions: Vec<DistributionEvent>,
    ) -> Self {
        Self {
            instrument,
            nav_series,
            distributions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &InstrumentId {
        &self.instrument.id
    }
}
