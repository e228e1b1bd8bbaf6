use crate::error::{StitchError, StitchResult};
use crate::geodesy;
use std::fmt::{self, Debug, Display};

/// A WGS84 point in degrees.
///
/// Latitude must stay inside `[-90, 90]` and longitude inside `[-180, 180]`;
/// wrapping of arbitrary longitudes is the caller's concern. Conversions
/// into tile or Mercator space additionally require the latitude to lie
/// inside the Web Mercator domain.
///
/// # Examples
///
/// ```
/// use tilestitch_core::GeoPoint;
///
/// let point = GeoPoint::new(52.5, 13.4).unwrap();
/// assert_eq!(point.lat, 52.5);
/// assert_eq!(point.lon, 13.4);
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct GeoPoint {
	pub lat: f64,
	pub lon: f64,
}

impl GeoPoint {
	pub fn new(lat: f64, lon: f64) -> StitchResult<GeoPoint> {
		if !lat.is_finite() || lat.abs() > 90.0 || !lon.is_finite() || lon.abs() > 180.0 {
			return Err(StitchError::InvalidCoordinate { lat, lon });
		}
		Ok(GeoPoint { lat, lon })
	}

	/// High-precision (zoom 32) tile coordinates of this point.
	pub fn to_hires(self) -> StitchResult<(u64, u64)> {
		geodesy::lat_lon_to_hires(self.lat, self.lon)
	}

	/// Pseudo-Mercator (EPSG:3857) meters of this point.
	pub fn to_mercator(self) -> StitchResult<(f64, f64)> {
		geodesy::lat_lon_to_mercator(self.lat, self.lon)
	}
}

impl Debug for GeoPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoPoint({}, {})", self.lat, self.lon)
	}
}

impl Display for GeoPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "({}, {})", self.lat, self.lon)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validates_ranges() {
		assert!(GeoPoint::new(90.0, 180.0).is_ok());
		assert!(GeoPoint::new(-90.0, -180.0).is_ok());
		assert!(GeoPoint::new(90.5, 0.0).is_err());
		assert!(GeoPoint::new(0.0, -180.5).is_err());
		assert!(GeoPoint::new(f64::INFINITY, 0.0).is_err());
	}

	#[test]
	fn polar_points_have_no_mercator_position() {
		let pole = GeoPoint::new(90.0, 0.0);
		assert!(pole.is_ok());
		assert!(pole.unwrap().to_hires().is_err());
	}

	#[test]
	fn debug_format() {
		let point = GeoPoint::new(-33.9, 151.2).unwrap();
		assert_eq!(format!("{point:?}"), "GeoPoint(-33.9, 151.2)");
	}
}
