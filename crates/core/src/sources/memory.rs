use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::instrument::{Instrument, InstrumentId};
use crate::models::series::{DistributionEvent, InstrumentData, NavPoint};

use super::traits::SeriesSource;

/// Serves an already-parsed snapshot of series data.
///
/// For callers whose parsing happens elsewhere (a file import, a previous
/// download) and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    name: String,
    data: BTreeMap<InstrumentId, InstrumentData>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add or replace one instrument's data.
    pub fn insert(&mut self, data: InstrumentData) {
        self.data.insert(data.instrument.id.clone(), data);
    }

    /// Builder-style `insert`.
    #[must_use]
    pub fn with(mut self, data: InstrumentData) -> Self {
        self.insert(data);
        self
    }

    fn lookup(&self, instrument: &Instrument) -> Result<&InstrumentData, CoreError> {
        self.data.get(&instrument.id).ok_or_else(|| CoreError::Source {
            source_name: self.name.clone(),
            message: format!("no data for {}", instrument.id),
        })
    }
}

#[async_trait]
impl SeriesSource for InMemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, instrument: &InstrumentId) -> bool {
        self.data.contains_key(instrument)
    }

    async fn nav_series(&self, instrument: &Instrument) -> Result<Vec<NavPoint>, CoreError> {
        Ok(self.lookup(instrument)?.nav_series.clone())
    }

    async fn distributions(
        &self,
        instrument: &Instrument,
    ) -> Result<Vec<DistributionEvent>, CoreError> {
        Ok(self.lookup(instrument)?.distributions.clone())
    }
}
