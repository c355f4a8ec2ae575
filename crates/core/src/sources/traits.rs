use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::instrument::{Instrument, InstrumentId};
use crate::models::series::{DistributionEvent, NavPoint};

/// Trait abstraction for anything that can supply parsed series data.
///
/// Fetching raw files, retrying, and parsing provider-specific layouts all
/// live behind this trait. The engine only ever sees typed records.
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Whether this source can serve the given instrument.
    fn supports(&self, instrument: &InstrumentId) -> bool;

    /// NAV observations for an instrument, in any order.
    async fn nav_series(&self, instrument: &Instrument) -> Result<Vec<NavPoint>, CoreError>;

    /// Distribution events for an instrument, in any order.
    /// An instrument that never paid a distribution returns an empty Vec.
    async fn distributions(
        &self,
        instrument: &Instrument,
    ) -> Result<Vec<DistributionEvent>, CoreError>;
}
