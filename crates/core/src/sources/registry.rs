use tracing::warn;

use crate::errors::CoreError;
use crate::models::instrument::{Instrument, InstrumentId};
use crate::models::series::InstrumentData;

use super::traits::SeriesSource;

/// Registry of series sources.
///
/// Routes each instrument to the sources that support it, in registration
/// order. If one source fails, the next one is tried.
pub struct SourceRegistry {
    sources: Vec<Box<dyn SeriesSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a new source. Earlier registrations take priority.
    pub fn register(&mut self, source: Box<dyn SeriesSource>) {
        self.sources.push(source);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Return ALL sources that support the instrument, by priority.
    pub fn get_sources_for(&self, instrument: &InstrumentId) -> Vec<&dyn SeriesSource> {
        self.sources
            .iter()
            .filter(|s| s.supports(instrument))
            .map(|s| s.as_ref())
            .collect()
    }

    /// Get the names of all sources able to serve the instrument.
    pub fn get_source_names(&self, instrument: &InstrumentId) -> Vec<String> {
        self.get_sources_for(instrument)
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Fetch NAV and distributions for one instrument from the first source
    /// that returns both successfully.
    pub async fn fetch(&self, instrument: &Instrument) -> Result<InstrumentData, CoreError> {
        let sources = self.get_sources_for(&instrument.id);
        if sources.is_empty() {
            return Err(CoreError::NoSource(instrument.id.to_string()));
        }

        let mut last_error = None;
        for source in &sources {
            let result = async {
                let nav_series = source.nav_series(instrument).await?;
                let distributions = source.distributions(instrument).await?;
                Ok::<_, CoreError>(InstrumentData::new(
                    instrument.clone(),
                    nav_series,
                    distributions,
                ))
            }
            .await;

            match result {
                Ok(data) => return Ok(data),
                Err(e) => {
                    warn!(
                        source = source.name(),
                        instrument = %instrument.id,
                        error = %e,
                        "source failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoSource(instrument.id.to_string())))
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
