use crate::error::{StitchError, StitchResult};
use crate::geodesy::{self, HIRES_LEVEL};
use std::fmt::{self, Debug, Display};

/// Highest zoom level the planner accepts.
///
/// Tile indices at this level still fit a `u32` and leave at least one bit
/// of sub-tile precision in the zoom-32 high-precision coordinates.
pub const MAX_ZOOM: u8 = 30;

/// A slippy-map tile address `(zoom, x, y)`.
///
/// `x` and `y` lie in `[0, 2^zoom)`; `x` grows eastward, `y` grows
/// southward. Created by the planner, consumed by the fetch pipeline.
///
/// # Examples
///
/// ```
/// use tilestitch_core::TileCoord;
///
/// let coord = TileCoord::from_geo(52.5, 13.4, 10).unwrap();
/// assert_eq!((coord.level, coord.x, coord.y), (10, 550, 335));
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TileCoord {
	pub level: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	pub fn new(level: u8, x: u32, y: u32) -> StitchResult<TileCoord> {
		if level > MAX_ZOOM {
			return Err(StitchError::InvalidZoom {
				zoom: i32::from(level),
				max: MAX_ZOOM,
			});
		}
		let size = 1u64 << level;
		if u64::from(x) >= size || u64::from(y) >= size {
			return Err(StitchError::Other(anyhow::anyhow!(
				"tile ({x}, {y}) is out of range for zoom level {level}"
			)));
		}
		Ok(TileCoord { level, x, y })
	}

	/// The tile containing a WGS84 coordinate at the given zoom level.
	///
	/// Computed at the high-precision zoom level and right-shifted, so the
	/// result is bit-identical to deriving it from the same high-precision
	/// coordinates the planner uses for sub-tile offsets.
	pub fn from_geo(lat: f64, lon: f64, level: u8) -> StitchResult<TileCoord> {
		if level > MAX_ZOOM {
			return Err(StitchError::InvalidZoom {
				zoom: i32::from(level),
				max: MAX_ZOOM,
			});
		}
		let (hx, hy) = geodesy::lat_lon_to_hires(lat, lon)?;
		let shift = HIRES_LEVEL - level;
		Ok(TileCoord {
			level,
			x: (hx >> shift) as u32,
			y: (hy >> shift) as u32,
		})
	}

	/// WGS84 coordinate of this tile's north-west corner.
	pub fn as_geo(&self) -> (f64, f64) {
		let shift = HIRES_LEVEL - self.level;
		geodesy::hires_to_lat_lon(u64::from(self.x) << shift, u64::from(self.y) << shift)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn new_validates() {
		assert!(TileCoord::new(3, 7, 7).is_ok());
		assert!(TileCoord::new(3, 8, 0).is_err());
		assert!(matches!(
			TileCoord::new(31, 0, 0),
			Err(StitchError::InvalidZoom { zoom: 31, .. })
		));
	}

	#[test]
	fn zoom_zero_is_always_the_root_tile() {
		for (lat, lon) in [(84.0, -179.0), (0.0, 0.0), (-84.0, 179.0)] {
			let coord = TileCoord::from_geo(lat, lon, 0).unwrap();
			assert_eq!((coord.x, coord.y), (0, 0));
		}
	}

	#[rstest]
	#[case(52.5, 13.4, 10)]
	#[case(-33.9, 151.2, 14)]
	#[case(0.0, 0.0, 5)]
	#[case(85.0, -179.9, 8)]
	fn round_trip_stays_within_one_tile(#[case] lat: f64, #[case] lon: f64, #[case] level: u8) {
		let coord = TileCoord::from_geo(lat, lon, level).unwrap();
		let (lat2, lon2) = coord.as_geo();
		let recovered = TileCoord::from_geo(lat2, lon2, level).unwrap();
		assert!(recovered.x.abs_diff(coord.x) <= 1, "{coord} vs {recovered}");
		assert!(recovered.y.abs_diff(coord.y) <= 1, "{coord} vs {recovered}");
	}

	#[test]
	fn known_tile() {
		// openstreetmap.org/#map=10/52.5/13.4 lands on tile 550/335
		let coord = TileCoord::from_geo(52.5, 13.4, 10).unwrap();
		assert_eq!((coord.x, coord.y), (550, 335));
	}

	#[test]
	fn display_format() {
		let coord = TileCoord::new(7, 66, 42).unwrap();
		assert_eq!(format!("{coord}"), "7/66/42");
		assert_eq!(format!("{coord:?}"), "TileCoord(7, [66, 42])");
	}
}
