use crate::error::{StitchError, StitchResult};
use crate::types::TileCoord;
use crate::types::tile_coord::MAX_ZOOM;
use std::fmt::{self, Debug, Display};

/// A rectangular, inclusive range of tiles at a single zoom level.
///
/// Stores minimum and maximum tile coordinates; both edges are inclusive,
/// so the smallest possible range covers exactly one tile.
///
/// # Examples
///
/// ```
/// use tilestitch_core::TileBBox;
///
/// let range = TileBBox::from_min_and_max(4, 5, 6, 7, 7).unwrap();
/// assert_eq!(range.width(), 3);
/// assert_eq!(range.height(), 2);
/// assert_eq!(range.count_tiles(), 6);
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TileBBox {
	pub level: u8,
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileBBox {
	/// Creates an inclusive tile range, validating bounds for the level.
	pub fn from_min_and_max(level: u8, x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> StitchResult<TileBBox> {
		if level > MAX_ZOOM {
			return Err(StitchError::InvalidZoom {
				zoom: i32::from(level),
				max: MAX_ZOOM,
			});
		}
		let size = 1u64 << level;
		if x_min > x_max || y_min > y_max || u64::from(x_max) >= size || u64::from(y_max) >= size {
			return Err(StitchError::Other(anyhow::anyhow!(
				"tile range [{x_min},{y_min},{x_max},{y_max}] is invalid at zoom level {level}"
			)));
		}
		Ok(TileBBox {
			level,
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}

	/// Width of the range in tiles.
	pub fn width(&self) -> u32 {
		self.x_max - self.x_min + 1
	}

	/// Height of the range in tiles.
	pub fn height(&self) -> u32 {
		self.y_max - self.y_min + 1
	}

	/// Total number of tiles in the range.
	pub fn count_tiles(&self) -> u64 {
		u64::from(self.width()) * u64::from(self.height())
	}

	/// Iterates over all tiles in row-major order (north to south rows).
	pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		let level = self.level;
		(self.y_min..=self.y_max)
			.flat_map(move |y| (self.x_min..=self.x_max).map(move |x| TileCoord { level, x, y }))
	}
}

impl Debug for TileBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"TileBBox({}: [{},{},{},{}] ({}))",
			self.level,
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.count_tiles()
		)
	}
}

impl Display for TileBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}/{}/{} to {}/{}/{}",
			self.level, self.x_min, self.y_min, self.level, self.x_max, self.y_max
		)
	}
}
