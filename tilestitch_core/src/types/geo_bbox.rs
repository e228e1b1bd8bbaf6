use crate::error::{StitchError, StitchResult};
use crate::geodesy;
use std::fmt::{self, Debug, Display};

/// A geographic bounding box in WGS84 degrees.
///
/// Defined by four `f64` values:
/// - `x_min` (west): minimum longitude,
/// - `y_min` (south): minimum latitude,
/// - `x_max` (east): maximum longitude,
/// - `y_max` (north): maximum latitude.
///
/// Construction rejects coordinates outside the WGS84 ranges and boxes whose
/// minimum exceeds their maximum; a box may still be degenerate (zero area),
/// which the mosaic planner rejects separately once it knows the zoom level.
///
/// # Examples
///
/// ```
/// use tilestitch_core::GeoBBox;
///
/// let bbox = GeoBBox::new(-10.0, -5.0, 10.0, 5.0).unwrap();
/// assert_eq!(bbox.as_tuple(), (-10.0, -5.0, 10.0, 5.0));
/// assert!(GeoBBox::new(10.0, -5.0, -10.0, 5.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	/// Creates a new `GeoBBox` from `west, south, east, north` degrees.
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> StitchResult<GeoBBox> {
		if !x_min.is_finite() || x_min.abs() > 180.0 || !y_min.is_finite() || y_min.abs() > 90.0 {
			return Err(StitchError::InvalidCoordinate { lat: y_min, lon: x_min });
		}
		if !x_max.is_finite() || x_max.abs() > 180.0 || !y_max.is_finite() || y_max.abs() > 90.0 {
			return Err(StitchError::InvalidCoordinate { lat: y_max, lon: x_max });
		}

		let bbox = GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		};
		if x_min > x_max || y_min > y_max {
			// swapped corners never produce a usable tile range
			return Err(StitchError::DegenerateBoundingBox { bbox, zoom: 0 });
		}
		Ok(bbox)
	}

	/// Returns the bounding box as `(x_min, y_min, x_max, y_max)`.
	pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
		(self.x_min, self.y_min, self.x_max, self.y_max)
	}

	/// Projects the four corners to Pseudo-Mercator meters.
	///
	/// Returns `[x_min, y_min, x_max, y_max]` in meters.
	pub fn to_mercator(&self) -> StitchResult<[f64; 4]> {
		let (x_min, y_min) = geodesy::lat_lon_to_mercator(self.y_min, self.x_min)?;
		let (x_max, y_max) = geodesy::lat_lon_to_mercator(self.y_max, self.x_max)?;
		Ok([x_min, y_min, x_max, y_max])
	}
}

impl Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GeoBBox({}, {}, {}, {})",
			self.x_min, self.y_min, self.x_max, self.y_max
		)
	}
}

impl Display for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}, {}, {}]", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}
