//! Conversions between WGS84, spherical Web-Mercator and slippy-map tiles.
//!
//! All helpers are pure. Geographic coordinates use `x = longitude` and
//! `y = latitude` in decimal degrees; projected coordinates are metres in
//! EPSG:3857.

use std::f64::consts::PI;

use geo::{Coord, Rect};

/// Earth radius used by the spherical Mercator projection, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude bound beyond which Web-Mercator is undefined.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Address of a single slippy-map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Zoom level.
    pub zoom: u8,
    /// Column, growing eastwards.
    pub x: u32,
    /// Row, growing southwards.
    pub y: u32,
}

/// Project a WGS84 coordinate into Web-Mercator metres.
///
/// Latitudes are clamped to [`MAX_LATITUDE`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use doorstep_core::projection::lonlat_to_mercator;
///
/// let origin = lonlat_to_mercator(Coord { x: 0.0, y: 0.0 });
/// assert!(origin.x.abs() < 1e-9 && origin.y.abs() < 1e-9);
/// ```
pub fn lonlat_to_mercator(coord: Coord<f64>) -> Coord<f64> {
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    Coord {
        x: EARTH_RADIUS_M * coord.x.to_radians(),
        y: EARTH_RADIUS_M * (PI / 4.0 + lat / 2.0).tan().ln(),
    }
}

/// Inverse of [`lonlat_to_mercator`].
pub fn mercator_to_lonlat(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (coord.x / EARTH_RADIUS_M).to_degrees(),
        y: (2.0 * (coord.y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees(),
    }
}

/// Number of tiles along one axis at `zoom`.
fn tiles_per_axis(zoom: u8) -> f64 {
    f64::from(1_u32 << u32::from(zoom.min(31)))
}

/// Find the tile containing a WGS84 coordinate.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use doorstep_core::projection::lonlat_to_tile;
///
/// let tile = lonlat_to_tile(Coord { x: 3.7251, y: 51.0543 }, 14);
/// assert_eq!((tile.x, tile.y), (8361, 5481));
/// ```
pub fn lonlat_to_tile(coord: Coord<f64>, zoom: u8) -> TileCoord {
    let n = tiles_per_axis(zoom);
    let lat = coord.y.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = ((coord.x + 180.0) / 360.0 * n).floor();
    let y = ((1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n).floor();
    TileCoord {
        zoom,
        x: clamp_index(x, n),
        y: clamp_index(y, n),
    }
}

fn clamp_index(value: f64, n: f64) -> u32 {
    value.clamp(0.0, n - 1.0) as u32
}

/// North-west corner of a tile in WGS84.
pub fn tile_to_lonlat(tile: TileCoord) -> Coord<f64> {
    let n = tiles_per_axis(tile.zoom);
    let lon = f64::from(tile.x) / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * f64::from(tile.y) / n)).sinh().atan().to_degrees();
    Coord { x: lon, y: lat }
}

/// Geographic bounds of a tile.
pub fn tile_bounds(tile: TileCoord) -> Rect<f64> {
    let north_west = tile_to_lonlat(tile);
    let south_east = tile_to_lonlat(TileCoord {
        zoom: tile.zoom,
        x: tile.x + 1,
        y: tile.y + 1,
    });
    Rect::new(north_west, south_east)
}

/// Rectangular block of tiles at one zoom level, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    /// Zoom level shared by every tile in the range.
    pub zoom: u8,
    /// North-west corner.
    pub min: TileCoord,
    /// South-east corner.
    pub max: TileCoord,
}

impl TileRange {
    /// Number of tiles in the range, computed without enumerating them.
    pub fn len(&self) -> u64 {
        let columns = u64::from(self.max.x - self.min.x) + 1;
        let rows = u64::from(self.max.y - self.min.y) + 1;
        columns * rows
    }

    /// A range always holds at least its corner tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Tiles row by row, west to east.
    pub fn tiles(&self) -> impl Iterator<Item = TileCoord> + use<> {
        let zoom = self.zoom;
        let columns = self.min.x..=self.max.x;
        (self.min.y..=self.max.y)
            .flat_map(move |y| columns.clone().map(move |x| TileCoord { zoom, x, y }))
    }
}

/// Tile block intersecting `bounds`, padded by `padding` tiles on each side
/// and clipped to the world.
pub fn tile_range(bounds: Rect<f64>, zoom: u8, padding: u32) -> TileRange {
    let min = bounds.min();
    let max = bounds.max();
    // Tile rows grow southwards, so the north-west corner has the smallest y.
    let north_west = lonlat_to_tile(Coord { x: min.x, y: max.y }, zoom);
    let south_east = lonlat_to_tile(Coord { x: max.x, y: min.y }, zoom);
    let last = (1_u32 << u32::from(zoom.min(31))) - 1;

    TileRange {
        zoom,
        min: TileCoord {
            zoom,
            x: north_west.x.saturating_sub(padding),
            y: north_west.y.saturating_sub(padding),
        },
        max: TileCoord {
            zoom,
            x: south_east.x.saturating_add(padding).min(last),
            y: south_east.y.saturating_add(padding).min(last),
        },
    }
}

/// All tiles intersecting `bounds`, padded by `padding` tiles on each side.
///
/// Tiles are returned row by row, west to east. Use [`tile_range`] to check
/// the size of a large area before enumerating it.
pub fn tiles_covering(bounds: Rect<f64>, zoom: u8, padding: u32) -> Vec<TileCoord> {
    tile_range(bounds, zoom, padding).tiles().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Intersects;
    use rstest::rstest;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        let delta = (actual - expected).abs();
        assert!(
            delta <= tolerance,
            "expected {expected}, got {actual} (delta {delta})"
        );
    }

    #[rstest]
    #[case(Coord { x: 24.9384, y: 60.1699 })]
    #[case(Coord { x: -0.1276, y: 51.5072 })]
    #[case(Coord { x: -122.4194, y: 37.7749 })]
    fn mercator_round_trips(#[case] coord: Coord<f64>) {
        let back = mercator_to_lonlat(lonlat_to_mercator(coord));
        assert_close(back.x, coord.x, 1e-9);
        assert_close(back.y, coord.y, 1e-9);
    }

    #[rstest]
    fn mercator_matches_known_value() {
        let projected = lonlat_to_mercator(Coord { x: 180.0, y: 0.0 });
        assert_close(projected.x, 20_037_508.342_789_244, 1e-6);
    }

    #[rstest]
    #[case(Coord { x: 24.9384, y: 60.1699 }, 14)]
    #[case(Coord { x: 3.7251, y: 51.0543 }, 14)]
    #[case(Coord { x: -73.9857, y: 40.7484 }, 16)]
    fn tile_contains_projected_point(#[case] coord: Coord<f64>, #[case] zoom: u8) {
        let tile = lonlat_to_tile(coord, zoom);
        assert!(
            tile_bounds(tile).intersects(&coord),
            "{tile:?} misses {coord:?}"
        );
    }

    #[rstest]
    fn zoom_zero_is_single_tile() {
        let tile = lonlat_to_tile(Coord { x: 179.9, y: -84.0 }, 0);
        assert_eq!(tile, TileCoord { zoom: 0, x: 0, y: 0 });
    }

    #[rstest]
    fn covering_single_point_with_padding_is_three_by_three() {
        let point = Coord { x: 24.9384, y: 60.1699 };
        let tiles = tiles_covering(Rect::new(point, point), 14, 1);
        let centre = lonlat_to_tile(point, 14);

        assert_eq!(tiles.len(), 9);
        assert!(tiles.contains(&centre));
        assert_eq!(
            tiles.first().map(|t| (t.x, t.y)),
            Some((centre.x - 1, centre.y - 1))
        );
    }

    #[rstest]
    fn range_len_matches_enumerated_tiles() {
        let bounds = Rect::new(
            Coord { x: 3.70, y: 51.04 },
            Coord { x: 3.76, y: 51.07 },
        );
        let range = tile_range(bounds, 14, 1);
        let tiles = tiles_covering(bounds, 14, 1);

        assert_eq!(range.len(), u64::try_from(tiles.len()).unwrap_or(u64::MAX));
        assert_eq!(range.tiles().next(), tiles.first().copied());
    }

    #[rstest]
    fn whole_world_range_is_counted_not_enumerated() {
        let bounds = Rect::new(
            Coord { x: -180.0, y: -MAX_LATITUDE },
            Coord { x: 180.0, y: MAX_LATITUDE },
        );
        let range = tile_range(bounds, 14, 1);
        assert_eq!(range.len(), 1_u64 << 28);
    }

    #[rstest]
    fn covering_respects_world_edge() {
        let corner = Coord { x: -180.0, y: MAX_LATITUDE };
        let tiles = tiles_covering(Rect::new(corner, corner), 2, 1);
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.x <= 1 && t.y <= 1));
    }
}
