//! [`RoutingEngine`] over routable tiles fetched on demand.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use doorstep_core::projection::{TileCoord, tile_range};
use doorstep_core::{Path, RouteQuery, RoutingEngine, RoutingError};
use futures_util::future::try_join_all;
use geo::Rect;
use log::debug;
use reqwest::{Client, StatusCode};

use super::graph::RoutingGraph;
use super::jsonld::{Tile, parse_tile};
use crate::client::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ProviderBuildError, TransportFailure, build_client,
    parse_endpoint,
};

/// Public routable-tiles endpoint.
pub const DEFAULT_TILES_URL: &str = "https://tiles.openplanner.team/planet";

/// Zoom level routable tiles are published at.
pub const DEFAULT_TILE_ZOOM: u8 = 14;

/// Most tiles a single query may load.
pub const DEFAULT_MAX_TILES: usize = 64;

/// Decoded tiles kept between queries before the cache is cleared.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Tiles added around the endpoints' bounding box.
const TILE_PADDING: u32 = 1;

/// Configuration for [`RoutableTilesEngine`].
#[derive(Debug, Clone)]
pub struct RoutableTilesConfig {
    /// Tile endpoint; tiles live at `{base_url}/{zoom}/{x}/{y}`.
    pub base_url: String,
    /// Tile zoom level.
    pub zoom: u8,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Queries needing more tiles fail with [`RoutingError::AreaTooLarge`].
    pub max_tiles: usize,
    /// Decoded tiles retained across queries.
    pub cache_capacity: usize,
}

impl Default for RoutableTilesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TILES_URL.to_owned(),
            zoom: DEFAULT_TILE_ZOOM,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            max_tiles: DEFAULT_MAX_TILES,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl RoutableTilesConfig {
    /// Create a new configuration with the given tile endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the tile zoom level.
    #[must_use]
    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-query tile limit.
    #[must_use]
    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Set how many decoded tiles are retained across queries.
    #[must_use]
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }
}

/// Routing engine that downloads the tiles around a query and runs A* over
/// their highway network.
///
/// Concurrent queries share one HTTP client and one tile cache, so fanning
/// out to several nearby entrances fetches each tile once.
pub struct RoutableTilesEngine {
    client: Client,
    config: RoutableTilesConfig,
    cache: Mutex<HashMap<TileCoord, Arc<Tile>>>,
}

impl std::fmt::Debug for RoutableTilesEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutableTilesEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RoutableTilesEngine {
    /// Create an engine for the tiles at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(RoutableTilesConfig::new(base_url))
    }

    /// Create an engine with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: RoutableTilesConfig) -> Result<Self, ProviderBuildError> {
        parse_endpoint(&config.base_url)?;
        let client = build_client(&config.user_agent, config.timeout)?;
        Ok(Self {
            client,
            config,
            cache: Mutex::new(HashMap::new()),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &RoutableTilesConfig {
        &self.config
    }

    /// Tiles needed to route `query`.
    ///
    /// The tile count is checked against the limit before any tile is
    /// enumerated.
    fn tiles_for(&self, query: &RouteQuery) -> Result<Vec<TileCoord>, RoutingError> {
        let range = tile_range(
            Rect::new(query.from, query.to),
            self.config.zoom,
            TILE_PADDING,
        );
        let limit = u64::try_from(self.config.max_tiles).unwrap_or(u64::MAX);
        if range.len() > limit {
            return Err(RoutingError::AreaTooLarge {
                required: usize::try_from(range.len()).unwrap_or(usize::MAX),
                limit: self.config.max_tiles,
            });
        }
        Ok(range.tiles().collect())
    }

    fn build_tile_url(&self, tile: TileCoord) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            tile.zoom,
            tile.x,
            tile.y
        )
    }

    fn cached(&self, tile: TileCoord) -> Option<Arc<Tile>> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(&tile).cloned()
    }

    fn remember(&self, tile: TileCoord, decoded: Arc<Tile>) {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if cache.len() >= self.config.cache_capacity {
            cache.clear();
        }
        if self.config.cache_capacity > 0 {
            cache.insert(tile, decoded);
        }
    }

    async fn fetch_tile(&self, tile: TileCoord) -> Result<Arc<Tile>, RoutingError> {
        if let Some(decoded) = self.cached(tile) {
            return Ok(decoded);
        }

        let url = self.build_tile_url(tile);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        // Tiles without any data are not published.
        let decoded = if response.status() == StatusCode::NOT_FOUND {
            debug!("tile {url} not found; treating as empty");
            Tile::default()
        } else {
            let body = response
                .error_for_status()
                .map_err(|err| self.convert_reqwest_error(&err, &url))?
                .bytes()
                .await
                .map_err(|err| self.convert_reqwest_error(&err, &url))?;
            parse_tile(&body)?
        };

        let decoded = Arc::new(decoded);
        self.remember(tile, Arc::clone(&decoded));
        Ok(decoded)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> RoutingError {
        let url = url.to_owned();
        match TransportFailure::classify(error) {
            TransportFailure::Timeout => RoutingError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            TransportFailure::Status { status, message } => RoutingError::HttpError {
                url,
                status,
                message,
            },
            TransportFailure::Network { message } => RoutingError::NetworkError { url, message },
        }
    }
}

#[async_trait]
impl RoutingEngine for RoutableTilesEngine {
    async fn query(&self, query: &RouteQuery) -> Result<Option<Path>, RoutingError> {
        let tiles = self.tiles_for(query)?;
        debug!("routing over {} tiles at zoom {}", tiles.len(), self.config.zoom);

        let fetched = try_join_all(tiles.iter().map(|tile| self.fetch_tile(*tile))).await?;
        let graph = RoutingGraph::from_tiles(fetched.iter().map(|tile| &**tile));
        if graph.is_empty() {
            return Err(RoutingError::EmptyNetwork);
        }
        debug!(
            "graph has {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph.shortest_path(query))
    }
}
