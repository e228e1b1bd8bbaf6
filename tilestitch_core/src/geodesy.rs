//! Pure conversions between WGS84 coordinates, slippy-map tile space and
//! Pseudo-Mercator meters.
//!
//! Tile indices are integers, but bounding-box edges fall between tile
//! boundaries. All geographic-to-tile conversions therefore go through a
//! fixed high-precision zoom level of 32: the result is right-shifted by
//! `32 - zoom` to obtain a tile index at any target zoom, or by
//! `32 - zoom - 8` to obtain a pixel index with 1/256-tile precision.
//!
//! # Examples
//!
//! ```
//! use tilestitch_core::geodesy::{hires_to_lat_lon, lat_lon_to_hires};
//!
//! let (x, y) = lat_lon_to_hires(0.0, 0.0).unwrap();
//! // the equator/prime meridian sits at the center of the tile grid
//! assert_eq!(x >> 31, 1);
//! assert_eq!(y >> 31, 1);
//!
//! let (lat, lon) = hires_to_lat_lon(x, y);
//! assert!(lat.abs() < 1e-6);
//! assert!(lon.abs() < 1e-6);
//! ```

use crate::error::{StitchError, StitchResult};
use std::f64::consts::PI;

/// Latitude limit of the Web Mercator projection, in degrees.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Half the projected world circumference in Pseudo-Mercator meters.
pub const ORIGIN_SHIFT: f64 = 20_037_508.342_789_244;

/// The fixed zoom level used for high-precision tile coordinates.
pub const HIRES_LEVEL: u8 = 32;

/// Number of tiles along one axis at [`HIRES_LEVEL`], as a float (2^32).
const HIRES_SIZE: f64 = 4_294_967_296.0;

/// Converts a WGS84 coordinate to high-precision (zoom 32) tile coordinates.
///
/// The standard slippy-map formula, evaluated once at zoom 32 so that both
/// tile indices and sub-tile pixel offsets can later be derived by shifting.
/// Values are clamped into `[0, 2^32 - 1]`, which makes `lon = 180` land on
/// the last tile column instead of wrapping.
///
/// # Errors
///
/// Fails with [`StitchError::InvalidCoordinate`] if the latitude lies outside
/// the Web Mercator domain or the longitude outside `[-180, 180]`.
pub fn lat_lon_to_hires(lat: f64, lon: f64) -> StitchResult<(u64, u64)> {
	if !lat.is_finite() || lat.abs() > MAX_MERCATOR_LAT + 1e-9 {
		return Err(StitchError::InvalidCoordinate { lat, lon });
	}
	if !lon.is_finite() || lon.abs() > 180.0 {
		return Err(StitchError::InvalidCoordinate { lat, lon });
	}

	let lat_rad = lat.to_radians();
	let x = HIRES_SIZE * ((lon + 180.0) / 360.0);
	let y = HIRES_SIZE * (1.0 - ((lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI)) / 2.0;

	// round to the nearest unit so tile-corner coordinates survive the
	// float round trip through `hires_to_lat_lon` exactly
	let clamp = |v: f64| v.round().clamp(0.0, HIRES_SIZE - 1.0) as u64;
	Ok((clamp(x), clamp(y)))
}

/// Converts high-precision (zoom 32) tile coordinates back to WGS84.
///
/// Inverse of [`lat_lon_to_hires`] up to quantization; used to turn an
/// expanded center+size request back into an effective bounding box.
pub fn hires_to_lat_lon(x: u64, y: u64) -> (f64, f64) {
	let lon = (x as f64) / HIRES_SIZE * 360.0 - 180.0;
	let lat = (PI * (1.0 - 2.0 * (y as f64) / HIRES_SIZE)).sinh().atan().to_degrees();
	(lat, lon)
}

/// Projects a WGS84 coordinate to Pseudo-Mercator (EPSG:3857) meters.
///
/// Spherical Mercator with the origin shift constant [`ORIGIN_SHIFT`]; only
/// used for georeferencing metadata, never for pixel placement.
///
/// # Errors
///
/// Fails with [`StitchError::InvalidCoordinate`] outside the projection
/// domain, where the formula diverges.
pub fn lat_lon_to_mercator(lat: f64, lon: f64) -> StitchResult<(f64, f64)> {
	if !lat.is_finite() || lat.abs() > MAX_MERCATOR_LAT + 1e-9 {
		return Err(StitchError::InvalidCoordinate { lat, lon });
	}
	if !lon.is_finite() || lon.abs() > 180.0 {
		return Err(StitchError::InvalidCoordinate { lat, lon });
	}

	let x = lon * ORIGIN_SHIFT / 180.0;
	let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0) * ORIGIN_SHIFT / 180.0;
	Ok((x, y))
}
