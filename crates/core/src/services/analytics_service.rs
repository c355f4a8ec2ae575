use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::analytics::{Comparison, ComparisonPoint, DegenerateStatistic, PerformanceSummary};
use crate::models::portfolio::PortfolioSeries;
use crate::models::settings::Settings;

/// sqrt(252), used if the decimal square root fails
const SQRT_TRADING_DAYS_APPROX: Decimal = dec!(15.874507866);

/// Computes performance statistics and indexed two-portfolio comparisons.
///
/// Statistics are computed over each portfolio's own full series; only the
/// indexed comparison is restricted to dates both portfolios share.
pub struct AnalyticsService {
    trading_days_per_year: u32,
    days_per_year: u32,
    min_year_fraction: Decimal,
}

impl AnalyticsService {
    /// Rejects settings that fail `Settings::validate`.
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self::from_valid(settings))
    }

    fn from_valid(settings: &Settings) -> Self {
        Self {
            trading_days_per_year: settings.trading_days_per_year,
            days_per_year: settings.days_per_year,
            min_year_fraction: settings.min_year_fraction,
        }
    }

    /// Summarize one portfolio over its full daily series.
    ///
    /// Computes:
    /// - Initial/current value, absolute and % change
    /// - Annualized return (0 when the span is about a week or less)
    /// - Min/max values with their dates (ties go to the earliest date)
    /// - Annualized volatility of simple daily returns (0 with < 2 points)
    pub fn summarize(&self, series: &PortfolioSeries) -> Result<PerformanceSummary, CoreError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(CoreError::ValidationError(format!(
                    "Portfolio '{}' has no data points",
                    series.name
                )))
            }
        };

        let mut degenerate = Vec::new();
        let initial_value = first.total_value;
        let current_value = last.total_value;
        let absolute_change = current_value - initial_value;

        let (percent_change, annualized_return_pct) = if initial_value.is_zero() {
            degenerate.push(DegenerateStatistic::ZeroInitialValue);
            degenerate.push(DegenerateStatistic::AnnualizedReturn);
            (Decimal::ZERO, Decimal::ZERO)
        } else {
            let percent = absolute_change
                .checked_div(initial_value)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(|| CoreError::ArithmeticOverflow {
                    subject: series.name.clone(),
                    date: last.date,
                })?;
            let annualized =
                self.annualized_return_pct(first.date, last.date, initial_value, current_value);
            if annualized.is_none() {
                degenerate.push(DegenerateStatistic::AnnualizedReturn);
            }
            (percent, annualized.unwrap_or(Decimal::ZERO))
        };

        // Full linear scan; strict comparisons keep the first occurrence on ties
        let mut min = first;
        let mut max = first;
        for point in &series.points[1..] {
            if point.total_value < min.total_value {
                min = point;
            }
            if point.total_value > max.total_value {
                max = point;
            }
        }

        let values: Vec<Decimal> = series.points.iter().map(|p| p.total_value).collect();
        let annualized_volatility_pct = match self.annualized_volatility_pct(&values) {
            Some(volatility) => volatility,
            None => {
                degenerate.push(DegenerateStatistic::Volatility);
                Decimal::ZERO
            }
        };

        Ok(PerformanceSummary {
            first_date: first.date,
            last_date: last.date,
            observations: series.len(),
            initial_value,
            current_value,
            absolute_change,
            percent_change,
            annualized_return_pct,
            min_value: min.total_value,
            min_date: min.date,
            max_value: max.total_value,
            max_date: max.date,
            annualized_volatility_pct,
            degenerate,
        })
    }

    /// Compare two portfolios from the first date both have a value.
    ///
    /// Both are indexed to 100 on that date; `index_difference` is
    /// `index_b - index_a`. Dates before the first common date are dropped,
    /// and afterwards only dates present in both series are aligned.
    pub fn compare(
        &self,
        portfolio_a: &PortfolioSeries,
        portfolio_b: &PortfolioSeries,
    ) -> Result<Comparison, CoreError> {
        let shared = Self::shared_dates(portfolio_a, portfolio_b);

        let Some(&(first_common_date, base_a, base_b)) = shared.first() else {
            return Err(CoreError::InsufficientAlignment {
                portfolio_a: portfolio_a.name.clone(),
                portfolio_b: portfolio_b.name.clone(),
            });
        };
        for (portfolio, base) in [(portfolio_a, base_a), (portfolio_b, base_b)] {
            if base.is_zero() {
                return Err(CoreError::ZeroBaseValue {
                    portfolio: portfolio.name.clone(),
                    date: first_common_date,
                });
            }
        }

        let mut aligned = Vec::with_capacity(shared.len());
        for &(date, value_a, value_b) in &shared {
            let index_a = Self::index(portfolio_a, date, value_a, base_a)?;
            let index_b = Self::index(portfolio_b, date, value_b, base_b)?;
            aligned.push(ComparisonPoint {
                date,
                value_a,
                value_b,
                index_a,
                index_b,
                index_difference: index_b - index_a,
            });
        }

        debug!(
            portfolio_a = %portfolio_a.name,
            portfolio_b = %portfolio_b.name,
            %first_common_date,
            aligned = aligned.len(),
            "compared portfolios"
        );

        Ok(Comparison {
            first_common_date,
            summary_a: self.summarize(portfolio_a)?,
            summary_b: self.summarize(portfolio_b)?,
            aligned,
        })
    }

    /// `value / base * 100`
    fn index(
        portfolio: &PortfolioSeries,
        date: NaiveDate,
        value: Decimal,
        base: Decimal,
    ) -> Result<Decimal, CoreError> {
        value
            .checked_div(base)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| CoreError::ArithmeticOverflow {
                subject: portfolio.name.clone(),
                date,
            })
    }

    /// Dates present in both series with both totals, oldest first.
    /// Both series are date-sorted, so a merge walk suffices.
    fn shared_dates(a: &PortfolioSeries, b: &PortfolioSeries) -> Vec<(NaiveDate, Decimal, Decimal)> {
        let mut shared = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < a.points.len() && j < b.points.len() {
            let (pa, pb) = (&a.points[i], &b.points[j]);
            match pa.date.cmp(&pb.date) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared.push((pa.date, pa.total_value, pb.total_value));
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    /// `((last/first)^(1/year_fraction) - 1) * 100`, or `None` when the span
    /// does not exceed the minimum year fraction.
    fn annualized_return_pct(
        &self,
        first_date: NaiveDate,
        last_date: NaiveDate,
        initial_value: Decimal,
        current_value: Decimal,
    ) -> Option<Decimal> {
        let elapsed_days = (last_date - first_date).num_days();
        let year_fraction = Decimal::from(elapsed_days) / Decimal::from(self.days_per_year);
        if year_fraction <= self.min_year_fraction {
            return None;
        }

        let Some(growth) = current_value.checked_div(initial_value) else {
            warn!(%initial_value, %current_value, "growth overflowed; reporting 0");
            return None;
        };
        // A total loss (or worse) cannot be raised to a fractional power
        if growth <= Decimal::ZERO {
            return Some(dec!(-100));
        }

        let exponent = Decimal::ONE / year_fraction;
        let annualized = growth
            .checked_powd(exponent)
            .and_then(|compounded| (compounded - Decimal::ONE).checked_mul(dec!(100)));
        if annualized.is_none() {
            warn!(%growth, %exponent, "annualized return overflowed; reporting 0");
        }
        annualized
    }

    /// Population standard deviation of simple daily returns, annualized and
    /// in percent. `None` when no daily return exists or a step overflows.
    fn annualized_volatility_pct(&self, values: &[Decimal]) -> Option<Decimal> {
        let returns = values
            .windows(2)
            .filter(|w| !w[0].is_zero())
            .map(|w| w[1].checked_sub(w[0])?.checked_div(w[0]))
            .collect::<Option<Vec<Decimal>>>();
        let Some(returns) = returns.filter(|r| !r.is_empty()) else {
            debug!("no usable daily returns for volatility");
            return None;
        };

        let count = Decimal::from(returns.len());
        let mean = returns
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| sum.checked_add(*r))?
            .checked_div(count)?;
        let variance = returns
            .iter()
            .try_fold(Decimal::ZERO, |sum, r| {
                let diff = r.checked_sub(mean)?;
                sum.checked_add(diff.checked_mul(diff)?)
            })?
            .checked_div(count)?;

        let daily_volatility = variance.sqrt().unwrap_or(Decimal::ZERO);
        let annualization_factor = Decimal::from(self.trading_days_per_year)
            .sqrt()
            .unwrap_or(SQRT_TRADING_DAYS_APPROX);

        daily_volatility
            .checked_mul(annualization_factor)?
            .checked_mul(dec!(100))
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::from_valid(&Settings::default())
    }
}
