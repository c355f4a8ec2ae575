pub mod errors;
pub mod models;
pub mod services;
pub mod sources;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use errors::CoreError;
use models::{
    analytics::{Comparison, PerformanceSummary},
    instrument::{Instrument, InstrumentId},
    portfolio::PortfolioSeries,
    series::{InstrumentData, ReconciledPoint, SimulatedPoint},
    settings::{ExclusionPolicy, HoldingConfig, PortfolioConfig, Settings},
};
use services::{
    aggregation_service::AggregationService, analytics_service::AnalyticsService,
    reconcile_service::ReconcileService, simulation_service::SimulationService,
};
use sources::registry::SourceRegistry;

/// An instrument dropped from a portfolio under `ExclusionPolicy::ExcludeInstrument`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedInstrument {
    pub instrument: InstrumentId,
    /// Display form of the error that caused the exclusion
    pub reason: String,
}

/// A built portfolio plus any instruments that had to be left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRun {
    pub series: PortfolioSeries,
    pub excluded: Vec<ExcludedInstrument>,
}

/// Main entry point for the fund-reinvest-core library.
///
/// Wires raw records → reconcile → simulate (per holding) → aggregate
/// (per portfolio) → compare. Holds only settings and sources; every call
/// recomputes its results from scratch and returns new values.
#[must_use]
pub struct FundTracker {
    settings: Settings,
    registry: SourceRegistry,
    reconcile_service: ReconcileService,
    simulation_service: SimulationService,
    aggregation_service: AggregationService,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for FundTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FundTracker")
            .field("settings", &self.settings)
            .field("has_sources", &!self.registry.is_empty())
            .finish()
    }
}

impl FundTracker {
    /// Create a tracker without sources; use the `InstrumentData` entry points.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        Self::with_registry(settings, SourceRegistry::new())
    }

    /// Create a tracker that can load series through registered sources.
    /// The settings are validated first.
    pub fn with_registry(settings: Settings, registry: SourceRegistry) -> Result<Self, CoreError> {
        let analytics_service = AnalyticsService::new(&settings)?;
        Ok(Self::build(settings, registry, analytics_service))
    }

    fn build(settings: Settings, registry: SourceRegistry, analytics_service: AnalyticsService) -> Self {
        Self {
            reconcile_service: ReconcileService::new(settings.fixed_nav_price),
            simulation_service: SimulationService::new(),
            aggregation_service: AggregationService::new(),
            analytics_service,
            settings,
            registry,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Single instrument ───────────────────────────────────────────

    /// Reconcile one instrument's NAV and distribution records.
    pub fn reconcile(&self, data: &InstrumentData) -> Result<Vec<ReconciledPoint>, CoreError> {
        self.reconcile_service.reconcile(
            data.id(),
            &data.nav_series,
            &data.distributions,
            data.instrument.nav_kind.is_fixed(),
        )
    }

    /// Reconcile and simulate one holding.
    pub fn run_instrument(
        &self,
        data: &InstrumentData,
        holding: &HoldingConfig,
    ) -> Result<Vec<SimulatedPoint>, CoreError> {
        if data.id() != &holding.instrument {
            return Err(CoreError::ValidationError(format!(
                "Holding for {} was given data for {}",
                holding.instrument,
                data.id()
            )));
        }
        let reconciled = self.reconcile(data)?;
        self.simulation_service.simulate_holding(&reconciled, holding)
    }

    // ── Portfolios ──────────────────────────────────────────────────

    /// Build a portfolio from already-parsed instrument data.
    ///
    /// Data errors either abort the run or exclude the instrument, depending
    /// on `Settings::exclusion_policy`. A portfolio with every instrument
    /// excluded is an error.
    pub fn build_portfolio(
        &self,
        config: &PortfolioConfig,
        data: &BTreeMap<InstrumentId, InstrumentData>,
    ) -> Result<PortfolioRun, CoreError> {
        config.validate()?;

        let mut simulated = BTreeMap::new();
        let mut excluded = Vec::new();

        for holding in &config.holdings {
            let result = data
                .get(&holding.instrument)
                .ok_or_else(|| CoreError::UnknownInstrument(holding.instrument.to_string()))
                .and_then(|d| self.run_instrument(d, holding));

            match result {
                Ok(points) => {
                    simulated.insert(holding.instrument.clone(), points);
                }
                Err(e) if e.is_data_error()
                    && self.settings.exclusion_policy == ExclusionPolicy::ExcludeInstrument =>
                {
                    warn!(
                        portfolio = %config.name,
                        instrument = %holding.instrument,
                        error = %e,
                        "excluding instrument"
                    );
                    excluded.push(ExcludedInstrument {
                        instrument: holding.instrument.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if simulated.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Portfolio '{}' has no usable holdings",
                config.name
            )));
        }

        let series = self.aggregation_service.aggregate(&config.name, &simulated)?;
        info!(
            portfolio = %config.name,
            holdings = simulated.len(),
            excluded = excluded.len(),
            points = series.len(),
            "built portfolio"
        );

        Ok(PortfolioRun { series, excluded })
    }

    /// Fetch every holding's series through the registered sources, then
    /// build the portfolio.
    ///
    /// `instruments` describes each held instrument (name, NAV kind). A fetch
    /// failure is a data error and follows the exclusion policy.
    pub async fn load_portfolio(
        &self,
        config: &PortfolioConfig,
        instruments: &BTreeMap<InstrumentId, Instrument>,
    ) -> Result<PortfolioRun, CoreError> {
        config.validate()?;

        let mut data = BTreeMap::new();
        let mut fetch_failures = Vec::new();

        for holding in &config.holdings {
            let result = match instruments.get(&holding.instrument) {
                Some(instrument) => self.registry.fetch(instrument).await,
                None => Err(CoreError::UnknownInstrument(holding.instrument.to_string())),
            };
            match result {
                Ok(d) => {
                    data.insert(holding.instrument.clone(), d);
                }
                Err(e) if self.settings.exclusion_policy == ExclusionPolicy::ExcludeInstrument => {
                    warn!(
                        portfolio = %config.name,
                        instrument = %holding.instrument,
                        error = %e,
                        "excluding instrument after fetch failure"
                    );
                    fetch_failures.push(ExcludedInstrument {
                        instrument: holding.instrument.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        // Only build what was fetched; failures are already recorded
        let fetched = PortfolioConfig::new(
            config.name.clone(),
            config
                .holdings
                .iter()
                .filter(|h| data.contains_key(&h.instrument))
                .cloned()
                .collect(),
        );
        if fetched.holdings.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "Portfolio '{}' has no usable holdings",
                config.name
            )));
        }

        let mut run = self.build_portfolio(&fetched, &data)?;
        fetch_failures.append(&mut run.excluded);
        run.excluded = fetch_failures;
        Ok(run)
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Performance statistics over a portfolio's full series.
    pub fn summarize(&self, series: &PortfolioSeries) -> Result<PerformanceSummary, CoreError> {
        self.analytics_service.summarize(series)
    }

    /// Indexed comparison of two portfolios from their first common date.
    pub fn compare(
        &self,
        portfolio_a: &PortfolioSeries,
        portfolio_b: &PortfolioSeries,
    ) -> Result<Comparison, CoreError> {
        self.analytics_service.compare(portfolio_a, portfolio_b)
    }
}

impl Default for FundTracker {
    fn default() -> Self {
        Self::build(Settings::default(), SourceRegistry::new(), AnalyticsService::default())
    }
}
