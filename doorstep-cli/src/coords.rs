//! `lat,lon` coordinate arguments.

use geo::Coord;
use thiserror::Error;

/// Reasons a `lat,lon` argument is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// The value is not two comma-separated parts.
    #[error("expected `lat,lon`")]
    Format,
    /// A part is not a number.
    #[error("{part:?} is not a number")]
    Number { part: String },
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("position is outside the valid latitude/longitude range")]
    Range,
}

/// Parse `lat,lon` into a coordinate with `x = lon` and `y = lat`.
pub(crate) fn parse_lat_lon(raw: &str) -> Result<Coord<f64>, CoordinateError> {
    let (lat, lon) = raw.split_once(',').ok_or(CoordinateError::Format)?;
    let lat = number(lat)?;
    let lon = number(lon)?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(CoordinateError::Range);
    }
    Ok(Coord { x: lon, y: lat })
}

fn number(part: &str) -> Result<f64, CoordinateError> {
    let trimmed = part.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CoordinateError::Number {
            part: trimmed.to_owned(),
        })
}
