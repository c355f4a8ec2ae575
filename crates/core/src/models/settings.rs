use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::instrument::InstrumentId;

/// What to do when one instrument's data fails reconciliation or simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExclusionPolicy {
    /// Abort the whole portfolio on the first data error
    #[default]
    FailFast,
    /// Drop the failing instrument, record why, and continue with the rest
    ExcludeInstrument,
}

/// Engine-wide numeric settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Price used on every date of a fixed-NAV instrument
    pub fixed_nav_price: Decimal,

    /// Periods per year used to annualize daily volatility
    pub trading_days_per_year: u32,

    /// Calendar days per year used for the annualized-return year fraction
    pub days_per_year: u32,

    /// Minimum year fraction (≈ one week) below which annualized return is not computed
    pub min_year_fraction: Decimal,

    pub exclusion_policy: ExclusionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fixed_nav_price: Decimal::ONE,
            trading_days_per_year: 252,
            days_per_year: 365,
            min_year_fraction: dec!(0.02),
            exclusion_policy: ExclusionPolicy::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.fixed_nav_price <= Decimal::ZERO {
            return Err(CoreError::Configuration(
                "fixed_nav_price must be positive".into(),
            ));
        }
        if self.trading_days_per_year == 0 || self.days_per_year == 0 {
            return Err(CoreError::Configuration(
                "trading_days_per_year and days_per_year must be non-zero".into(),
            ));
        }
        if self.min_year_fraction < Decimal::ZERO {
            return Err(CoreError::Configuration(
                "min_year_fraction must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Initial position in one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingConfig {
    pub instrument: InstrumentId,

    /// Units held at `start_date`, before any reinvestment
    pub starting_units: Decimal,

    /// First date of the simulation window
    pub start_date: NaiveDate,
}

impl HoldingConfig {
    pub fn new(instrument: impl Into<InstrumentId>, starting_units: Decimal, start_date: NaiveDate) -> Self {
        Self {
            instrument: instrument.into(),
            starting_units,
            start_date,
        }
    }
}

/// A named set of holdings forming one portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    pub name: String,
    pub holdings: Vec<HoldingConfig>,
}

impl PortfolioConfig {
    pub fn new(name: impl Into<String>, holdings: Vec<HoldingConfig>) -> Self {
        Self {
            name: name.into(),
            holdings,
        }
    }

    /// Parse a portfolio definition from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: PortfolioConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Rules:
    /// - At least one holding
    /// - Starting units must be positive
    /// - Each instrument appears once
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.holdings.is_empty() {
            return Err(CoreError::Configuration(format!(
                "Portfolio '{}' has no holdings",
                self.name
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for holding in &self.holdings {
            if holding.starting_units <= Decimal::ZERO {
                return Err(CoreError::Configuration(format!(
                    "Holding {} in '{}' must start with positive units, got {}",
                    holding.instrument, self.name, holding.starting_units
                )));
            }
            if !seen.insert(&holding.instrument) {
                return Err(CoreError::Configuration(format!(
                    "Instrument {} appears more than once in '{}'",
                    holding.instrument, self.name
                )));
            }
        }
        Ok(())
    }
}
