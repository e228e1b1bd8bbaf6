use crate::error::{StitchError, StitchResult};
use std::fmt::{self, Debug};

/// Affine georeferencing of a finished mosaic.
///
/// Pixel sizes are in Pseudo-Mercator meters per pixel; the top-left corner
/// is the projected coordinate of the canvas's (0, 0) pixel edge. Both pixel
/// sizes are strictly positive; the y axis pointing south is expressed by
/// the negative fourth world-file parameter, not by a negative size.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoReference {
	pub pixel_width: f64,
	pub pixel_height: f64,
	pub top_left_x: f64,
	pub top_left_y: f64,
}

impl GeoReference {
	pub fn new(pixel_width: f64, pixel_height: f64, top_left_x: f64, top_left_y: f64) -> StitchResult<GeoReference> {
		if !(pixel_width > 0.0 && pixel_height > 0.0) {
			return Err(StitchError::Other(anyhow::anyhow!(
				"pixel size ({pixel_width}, {pixel_height}) must be positive"
			)));
		}
		Ok(GeoReference {
			pixel_width,
			pixel_height,
			top_left_x,
			top_left_y,
		})
	}

	/// The six world-file parameters, in file order.
	///
	/// # Examples
	///
	/// ```
	/// use tilestitch_core::GeoReference;
	///
	/// let geo = GeoReference::new(10.0, 20.0, -500.0, 800.0).unwrap();
	/// assert_eq!(geo.world_file_parameters(), [10.0, 0.0, 0.0, -20.0, -500.0, 800.0]);
	/// ```
	pub fn world_file_parameters(&self) -> [f64; 6] {
		[
			self.pixel_width,
			0.0,
			0.0,
			-self.pixel_height,
			self.top_left_x,
			self.top_left_y,
		]
	}
}

impl Debug for GeoReference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"GeoReference({} x {} m/px at ({}, {}))",
			self.pixel_width, self.pixel_height, self.top_left_x, self.top_left_y
		)
	}
}
