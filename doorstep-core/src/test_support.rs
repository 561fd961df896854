//! Deterministic entrance sources and routing engines for tests.
//!
//! None of these make network calls.

use std::time::Duration;

use async_trait::async_trait;
use geo::{Coord, Distance, Haversine, Point};

use crate::{
    EntranceCandidate, EntranceQueryError, EntranceSource, Location, Path, RouteQuery,
    RoutingEngine, RoutingError, Step,
};

/// `EntranceSource` returning a fixed answer.
#[derive(Debug, Clone)]
pub struct StubEntranceSource {
    response: Result<Vec<EntranceCandidate>, EntranceQueryError>,
}

impl StubEntranceSource {
    /// Always answer with `candidates`.
    pub fn with_candidates(candidates: Vec<EntranceCandidate>) -> Self {
        Self {
            response: Ok(candidates),
        }
    }

    /// Always fail with `error`.
    pub fn with_error(error: EntranceQueryError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl EntranceSource for StubEntranceSource {
    async fn find_entrances(
        &self,
        _destination: Coord<f64>,
    ) -> Result<Vec<EntranceCandidate>, EntranceQueryError> {
        self.response.clone()
    }
}

/// Single-step path straight from the query origin to its destination.
pub fn straight_path(from: Coord<f64>, to: Coord<f64>) -> Path {
    Path::from_steps(vec![Step {
        start: Location::at(from),
        stop: Location::at(to),
        distance_m: Haversine.distance(Point::from(from), Point::from(to)),
    }])
}

/// `RoutingEngine` answering every query with a straight line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightLineEngine;

#[async_trait]
impl RoutingEngine for StraightLineEngine {
    async fn query(&self, query: &RouteQuery) -> Result<Option<Path>, RoutingError> {
        Ok(Some(straight_path(query.from, query.to)))
    }
}

#[derive(Debug, Clone)]
enum StubBehaviour {
    Path(Path),
    NoRoute,
    Error(RoutingError),
    Delayed(Duration),
    Silent,
}

/// `RoutingEngine` with scripted behaviour.
#[derive(Debug, Clone)]
pub struct StubRoutingEngine {
    behaviour: StubBehaviour,
}

impl StubRoutingEngine {
    /// Answer every query with a clone of `path`.
    pub fn with_path(path: Path) -> Self {
        Self {
            behaviour: StubBehaviour::Path(path),
        }
    }

    /// Finish every query without a path.
    pub fn no_route() -> Self {
        Self {
            behaviour: StubBehaviour::NoRoute,
        }
    }

    /// Fail every query with `error`.
    pub fn with_error(error: RoutingError) -> Self {
        Self {
            behaviour: StubBehaviour::Error(error),
        }
    }

    /// Answer with a straight line after `delay`.
    pub fn delayed(delay: Duration) -> Self {
        Self {
            behaviour: StubBehaviour::Delayed(delay),
        }
    }

    /// Never answer.
    pub fn never_responds() -> Self {
        Self {
            behaviour: StubBehaviour::Silent,
        }
    }
}

#[async_trait]
impl RoutingEngine for StubRoutingEngine {
    async fn query(&self, query: &RouteQuery) -> Result<Option<Path>, RoutingError> {
        match &self.behaviour {
            StubBehaviour::Path(path) => Ok(Some(path.clone())),
            StubBehaviour::NoRoute => Ok(None),
            StubBehaviour::Error(error) => Err(error.clone()),
            StubBehaviour::Delayed(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Some(straight_path(query.from, query.to)))
            }
            StubBehaviour::Silent => std::future::pending().await,
        }
    }
}
