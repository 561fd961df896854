//! Stub adapters and fixtures shared by the CLI tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use doorstep_core::test_support::{StraightLineEngine, StubEntranceSource};
use doorstep_core::{EntranceCandidate, EntranceSource, RoutingEngine};
use geo::Coord;

use crate::adapters::AdapterBuilder;
use crate::settings::ServiceSettings;
use crate::CliError;

pub(super) const ORIGIN_ARG: &str = "60.1690,24.9350";
pub(super) const DESTINATION_ARG: &str = "60.1710,24.9402";

/// Hands out pre-built adapters and records the settings it was given.
pub(super) struct StubAdapterBuilder {
    pub(super) source: StubEntranceSource,
    pub(super) engine: Arc<dyn RoutingEngine>,
    pub(super) seen: std::cell::RefCell<Option<ServiceSettings>>,
}

impl StubAdapterBuilder {
    pub(super) fn new(source: StubEntranceSource, engine: Arc<dyn RoutingEngine>) -> Self {
        Self {
            source,
            engine,
            seen: std::cell::RefCell::new(None),
        }
    }

    pub(super) fn straight_lines_to(candidates: Vec<EntranceCandidate>) -> Self {
        Self::new(
            StubEntranceSource::with_candidates(candidates),
            Arc::new(StraightLineEngine),
        )
    }
}

impl AdapterBuilder for StubAdapterBuilder {
    fn entrance_source(
        &self,
        settings: &ServiceSettings,
    ) -> Result<Arc<dyn EntranceSource>, CliError> {
        *self.seen.borrow_mut() = Some(settings.clone());
        Ok(Arc::new(self.source.clone()))
    }

    fn routing_engine(
        &self,
        _settings: &ServiceSettings,
    ) -> Result<Arc<dyn RoutingEngine>, CliError> {
        Ok(Arc::clone(&self.engine))
    }
}

pub(super) fn entrance(id: i64, lon: f64, lat: f64) -> EntranceCandidate {
    EntranceCandidate::new(
        id,
        Coord { x: lon, y: lat },
        BTreeMap::from([("entrance".to_owned(), "main".to_owned())]),
    )
}

pub(super) fn two_entrances() -> Vec<EntranceCandidate> {
    vec![entrance(101, 24.9401, 60.1711), entrance(102, 24.9404, 60.1709)]
}
