//! Resolve a destination into drawable routes, one per entrance candidate.
//!
//! [`Planner::calculate_plan`] runs the whole pipeline:
//!
//! 1. look up entrances near the destination;
//! 2. fall back to the raw destination when none exist;
//! 3. route to every candidate concurrently;
//! 4. turn each path into a four-feature GeoJSON collection and hand it to
//!    the caller's callback as soon as it is ready.
//!
//! Every call opens a new *generation*. Starting a newer plan cancels the
//! previous one: its in-flight candidates are dropped and nothing more is
//! delivered for it, so a slow stale route can never overwrite a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use geo::Coord;
use geojson::FeatureCollection;
use log::{debug, info, warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::entrance::{EntranceQueryError, EntranceSource};
use crate::features::geometry_to_geojson;
use crate::geometry::extract_geometry;
use crate::routing::{RouteQuery, RoutingEngine, RoutingError};
use crate::EntranceCandidate;

/// Default upper bound for a single routing query.
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Tuning knobs for [`Planner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Upper bound for each routing call; `None` waits indefinitely.
    pub route_timeout: Option<Duration>,
    /// Forwarded to [`RouteQuery::road_network_only`].
    pub road_network_only: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            route_timeout: Some(DEFAULT_ROUTE_TIMEOUT),
            road_network_only: true,
        }
    }
}

impl PlannerConfig {
    /// Set the per-query routing timeout.
    #[must_use]
    pub fn with_route_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.route_timeout = timeout;
        self
    }

    /// Choose whether routes must stay on the road network.
    #[must_use]
    pub fn with_road_network_only(mut self, road_network_only: bool) -> Self {
        self.road_network_only = road_network_only;
        self
    }
}

/// Errors surfaced while planning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The entrance lookup failed; no candidates were routed.
    #[error("entrance lookup failed: {0}")]
    EntranceQuery(#[from] EntranceQueryError),
    /// The routing engine failed for one candidate.
    #[error("routing to candidate {candidate_id} failed: {source}")]
    Routing {
        /// Candidate the route was computed for.
        candidate_id: i64,
        /// Engine failure.
        #[source]
        source: RoutingError,
    },
    /// The engine finished without finding a path to the candidate.
    #[error("no route found to candidate {candidate_id}")]
    NoRoute {
        /// Candidate the route was computed for.
        candidate_id: i64,
    },
    /// The engine did not answer within [`PlannerConfig::route_timeout`].
    #[error("routing to candidate {candidate_id} did not finish within {timeout:?}")]
    Timeout {
        /// Candidate the route was computed for.
        candidate_id: i64,
        /// Configured limit.
        timeout: Duration,
    },
}

/// One resolved candidate, handed to the caller's callback.
///
/// Each successful update is a complete replacement for whatever route the
/// caller displayed before.
#[derive(Debug, Clone)]
pub struct PlanUpdate {
    /// Generation of the plan this update belongs to.
    pub generation: u64,
    /// Candidate the route leads to.
    pub candidate: EntranceCandidate,
    /// Feature collection, or why the candidate could not be routed.
    pub result: Result<FeatureCollection, PlanError>,
}

/// Bookkeeping for a finished [`Planner::calculate_plan`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    /// Generation assigned to the call.
    pub generation: u64,
    /// Candidates that were routed, including the fallback.
    pub candidates: usize,
    /// Successful updates delivered.
    pub delivered: usize,
    /// Failed updates delivered.
    pub failed: usize,
    /// Whether the raw destination stood in for missing entrances.
    pub used_fallback: bool,
    /// Whether a newer plan cancelled this one before it finished.
    pub superseded: bool,
}

/// Orchestrates entrance lookup, routing and GeoJSON assembly.
///
/// A planner is shared by reference; overlapping calls are ordered by their
/// generation and only the newest one delivers updates.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use geo::Coord;
/// use doorstep_core::{Planner, PlannerConfig};
/// use doorstep_core::test_support::{StraightLineEngine, StubEntranceSource};
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let planner = Planner::new(
///     Arc::new(StubEntranceSource::with_candidates(Vec::new())),
///     Arc::new(StraightLineEngine),
///     PlannerConfig::default(),
/// );
///
/// let mut updates = Vec::new();
/// let summary = planner
///     .calculate_plan(
///         Coord { x: 24.93, y: 60.16 },
///         Coord { x: 24.94, y: 60.17 },
///         |update| updates.push(update),
///     )
///     .await?;
///
/// assert!(summary.used_fallback);
/// assert_eq!(updates.len(), 1);
/// # Ok::<(), doorstep_core::PlanError>(())
/// # }).unwrap();
/// ```
pub struct Planner {
    entrances: Arc<dyn EntranceSource>,
    router: Arc<dyn RoutingEngine>,
    config: PlannerConfig,
    generation: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("entrances", &"<dyn EntranceSource>")
            .field("router", &"<dyn RoutingEngine>")
            .field("config", &self.config)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Planner {
    /// Build a planner over an entrance source and a routing engine.
    pub fn new(
        entrances: Arc<dyn EntranceSource>,
        router: Arc<dyn RoutingEngine>,
        config: PlannerConfig,
    ) -> Self {
        Self {
            entrances,
            router,
            config,
            generation: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    /// The configuration the planner was built with.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Generation of the most recently started plan, `0` before the first.
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cancel the plan in flight, if any. No further updates are delivered
    /// for it.
    pub fn cancel(&self) {
        let (_, token) = self.begin_generation();
        token.cancel();
    }

    /// Resolve `destination` into routes from `origin`.
    ///
    /// `on_update` is called once per routed candidate, in completion order,
    /// with either a feature collection or the candidate's failure. When a
    /// newer plan starts, this call stops early, reports
    /// [`PlanSummary::superseded`] and delivers nothing further.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::EntranceQuery`] when the entrance lookup fails.
    /// Per-candidate failures are delivered through `on_update` instead.
    pub async fn calculate_plan<F>(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
        mut on_update: F,
    ) -> Result<PlanSummary, PlanError>
    where
        F: FnMut(PlanUpdate),
    {
        let (generation, token) = self.begin_generation();
        let mut summary = PlanSummary {
            generation,
            ..PlanSummary::default()
        };

        let found = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("plan {generation} superseded during entrance lookup");
                summary.superseded = true;
                return Ok(summary);
            }
            found = self.entrances.find_entrances(destination) => found?,
        };

        let candidates = if found.is_empty() {
            debug!("plan {generation}: no entrances near destination, using it directly");
            summary.used_fallback = true;
            vec![EntranceCandidate::fallback(destination)]
        } else {
            found
        };
        summary.candidates = candidates.len();
        info!(
            "plan {generation}: routing to {} candidate(s)",
            summary.candidates
        );

        let mut pending: FuturesUnordered<_> = candidates
            .into_iter()
            .map(|candidate| self.resolve(generation, origin, candidate))
            .collect();

        while !pending.is_empty() {
            let update = tokio::select! {
                biased;
                () = token.cancelled() => {
                    summary.superseded = true;
                    break;
                }
                Some(update) = pending.next() => update,
            };
            if !self.is_current(generation) {
                summary.superseded = true;
                break;
            }
            match &update.result {
                Ok(_) => summary.delivered += 1,
                Err(err) => {
                    warn!("plan {generation}: {err}");
                    summary.failed += 1;
                }
            }
            on_update(update);
        }

        if summary.superseded {
            debug!(
                "plan {generation} superseded; dropped {} unfinished candidate(s)",
                pending.len()
            );
        }
        Ok(summary)
    }

    fn begin_generation(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = std::mem::replace(&mut *current, token.clone());
        previous.cancel();
        (generation, token)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.latest_generation() == generation
    }

    async fn resolve(
        &self,
        generation: u64,
        origin: Coord<f64>,
        candidate: EntranceCandidate,
    ) -> PlanUpdate {
        let result = self.route_to(origin, &candidate).await;
        PlanUpdate {
            generation,
            candidate,
            result,
        }
    }

    async fn route_to(
        &self,
        origin: Coord<f64>,
        candidate: &EntranceCandidate,
    ) -> Result<FeatureCollection, PlanError> {
        let candidate_id = candidate.id;
        let query = RouteQuery {
            from: origin,
            to: candidate.location,
            road_network_only: self.config.road_network_only,
        };
        let routing_failed = |source| PlanError::Routing {
            candidate_id,
            source,
        };

        let path = self
            .bounded(candidate_id, self.router.query(&query))
            .await?
            .map_err(routing_failed)?
            .ok_or(PlanError::NoRoute { candidate_id })?;
        let path = self
            .bounded(candidate_id, self.router.complete_path(path))
            .await?
            .map_err(routing_failed)?;

        let geometry = extract_geometry(&path);
        debug!(
            "candidate {candidate_id}: {} coordinates, {} obstacle(s), {:.0} m",
            geometry.coordinates.len(),
            geometry.obstacles.len(),
            path.distance_m()
        );
        Ok(geometry_to_geojson(origin, candidate.location, &geometry))
    }

    async fn bounded<T>(
        &self,
        candidate_id: i64,
        future: impl Future<Output = T>,
    ) -> Result<T, PlanError> {
        match self.config.route_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| PlanError::Timeout {
                    candidate_id,
                    timeout,
                }),
            None => Ok(future.await),
        }
    }
}
