//! Mosaic planning: which tiles cover a requested area and where every tile
//! lands on the output canvas.
//!
//! All geometry is computed once, up front, from high-precision (zoom 32)
//! tile coordinates. A pixel index with 1/256-tile precision is derived by
//! shifting the high-precision coordinate to `zoom + 8` bits; the fractional
//! eight bits of the first tile become the sub-tile crop of the canvas's
//! top-left corner. This happens before any network access, so size-cap and
//! geometry errors never cost a fetch.

use crate::error::{StitchError, StitchResult};
use crate::geodesy::{self, HIRES_LEVEL};
use crate::types::{GeoBBox, GeoPoint, GeoReference, MAX_ZOOM, TileBBox, TileCoord};

/// Default edge length of a map tile in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Output pixel cap without georeferencing (10,000 x 10,000).
pub const MAX_PIXELS_PLAIN: u64 = 10_000 * 10_000;

/// Output pixel cap with georeferenced output (35,000 x 35,000).
pub const MAX_PIXELS_GEOREFERENCED: u64 = 35_000 * 35_000;

/// The requested map area, in one of two equivalent forms.
///
/// Centered mode is resolved into an effective bounding box before any other
/// planning, so all downstream logic shares one code path. Width and height
/// of a centered request are measured in **tiles** at the target zoom.
#[derive(Clone, Copy, Debug)]
pub enum MosaicArea {
	/// An explicit bounding box.
	Bounds(GeoBBox),
	/// A center point plus output width/height in tiles.
	Centered { center: GeoPoint, width: u32, height: u32 },
}

impl MosaicArea {
	/// The effective bounding box of this area at the given zoom level.
	fn resolve(&self, zoom: u8) -> StitchResult<GeoBBox> {
		match *self {
			MosaicArea::Bounds(bbox) => Ok(bbox),
			MosaicArea::Centered { center, width, height } => {
				if width == 0 || height == 0 {
					return Err(StitchError::Other(anyhow::anyhow!(
						"centered output must be at least 1x1 tiles, got {width}x{height}"
					)));
				}
				let (cx, cy) = center.to_hires()?;
				let tile_span = 1u64 << (HIRES_LEVEL - zoom);
				let world = 1u64 << HIRES_LEVEL;

				// half extents in high-precision units, capped at the world size
				let half_x = (u64::from(width) * tile_span / 2).min(world / 2);
				let half_y = (u64::from(height) * tile_span / 2).min(world / 2);

				let x1 = cx.saturating_sub(half_x);
				let y1 = cy.saturating_sub(half_y);
				let x2 = (cx + half_x).min(world - 1);
				let y2 = (cy + half_y).min(world - 1);

				let (north, west) = geodesy::hires_to_lat_lon(x1, y1);
				let (south, east) = geodesy::hires_to_lat_lon(x2, y2);
				GeoBBox::new(west, south, east, north)
			}
		}
	}
}

/// One tile of the plan together with its placement on the canvas.
///
/// Offsets may be negative or extend past the canvas for border tiles; the
/// compositor clips those pixels.
#[derive(Clone, Copy, Debug)]
pub struct TilePlacement {
	pub coord: TileCoord,
	pub x_offset: i64,
	pub y_offset: i64,
}

/// The complete, immutable geometry of one mosaic run.
#[derive(Clone, Debug)]
pub struct MosaicPlan {
	/// Target zoom level.
	pub zoom: u8,
	/// Edge length of every fetched tile in pixels.
	pub tile_size: u32,
	/// Inclusive range of tiles to fetch.
	pub tile_range: TileBBox,
	/// Pixels of the first tile column falling left of the requested box.
	pub crop_left: u32,
	/// Pixels of the first tile row falling above the requested box.
	pub crop_top: u32,
	/// Canvas width in pixels.
	pub width: u32,
	/// Canvas height in pixels.
	pub height: u32,
	/// Affine georeferencing of the canvas.
	pub geo_reference: GeoReference,
}

impl MosaicPlan {
	/// Plans a mosaic for the given area.
	///
	/// `max_pixels` overrides the built-in cap ([`MAX_PIXELS_PLAIN`] or
	/// [`MAX_PIXELS_GEOREFERENCED`], selected by `georeferenced`).
	///
	/// # Errors
	///
	/// - [`StitchError::InvalidZoom`] for zoom levels outside `0..=30`.
	/// - [`StitchError::InvalidCoordinate`] outside the Web Mercator domain.
	/// - [`StitchError::DegenerateBoundingBox`] if the area resolves to a
	///   zero-area canvas.
	/// - [`StitchError::OutputTooLarge`] if the canvas exceeds the cap.
	pub fn build(
		area: &MosaicArea,
		zoom: i32,
		tile_size: u32,
		georeferenced: bool,
		max_pixels: Option<u64>,
	) -> StitchResult<MosaicPlan> {
		if !(0..=i32::from(MAX_ZOOM)).contains(&zoom) {
			return Err(StitchError::InvalidZoom { zoom, max: MAX_ZOOM });
		}
		let zoom = zoom as u8;
		if tile_size == 0 {
			return Err(StitchError::Other(anyhow::anyhow!("tile size must be at least 1 pixel")));
		}

		let bbox = area.resolve(zoom)?;
		let (hx1, hy1) = geodesy::lat_lon_to_hires(bbox.y_max, bbox.x_min)?;
		let (hx2, hy2) = geodesy::lat_lon_to_hires(bbox.y_min, bbox.x_max)?;

		// pixel indices at `zoom + 8` bits: 1/256-tile precision
		let px1 = pixel_index(hx1, zoom);
		let py1 = pixel_index(hy1, zoom);
		let px2 = pixel_index(hx2, zoom);
		let py2 = pixel_index(hy2, zoom);

		let width = (px2 - px1) * u64::from(tile_size) / 256;
		let height = (py2 - py1) * u64::from(tile_size) / 256;
		if width == 0 || height == 0 {
			return Err(StitchError::DegenerateBoundingBox { bbox, zoom });
		}

		let max_pixels = max_pixels.unwrap_or(if georeferenced {
			MAX_PIXELS_GEOREFERENCED
		} else {
			MAX_PIXELS_PLAIN
		});
		let too_large = width > u64::from(u32::MAX)
			|| height > u64::from(u32::MAX)
			|| width.checked_mul(height).is_none_or(|pixels| pixels > max_pixels);
		if too_large {
			return Err(StitchError::OutputTooLarge {
				width,
				height,
				max_pixels,
			});
		}

		// the last covered pixel decides the last tile, so a box ending
		// exactly on a tile boundary does not drag in an unused column
		let tile_range = TileBBox::from_min_and_max(
			zoom,
			(px1 >> 8) as u32,
			(py1 >> 8) as u32,
			((px2 - 1) >> 8) as u32,
			((py2 - 1) >> 8) as u32,
		)?;

		let crop_left = ((px1 & 0xFF) * u64::from(tile_size) / 256) as u32;
		let crop_top = ((py1 & 0xFF) * u64::from(tile_size) / 256) as u32;

		let [m_x_min, m_y_min, m_x_max, m_y_max] = bbox.to_mercator()?;
		let geo_reference = GeoReference::new(
			(m_x_max - m_x_min) / width as f64,
			(m_y_max - m_y_min) / height as f64,
			m_x_min,
			m_y_max,
		)?;

		Ok(MosaicPlan {
			zoom,
			tile_size,
			tile_range,
			crop_left,
			crop_top,
			width: width as u32,
			height: height as u32,
			geo_reference,
		})
	}

	/// All planned tiles with their canvas offsets, in row-major order.
	pub fn placements(&self) -> impl Iterator<Item = TilePlacement> + '_ {
		let tile_size = i64::from(self.tile_size);
		let x_min = i64::from(self.tile_range.x_min);
		let y_min = i64::from(self.tile_range.y_min);
		let crop_left = i64::from(self.crop_left);
		let crop_top = i64::from(self.crop_top);
		self.tile_range.coords().map(move |coord| TilePlacement {
			coord,
			x_offset: (i64::from(coord.x) - x_min) * tile_size - crop_left,
			y_offset: (i64::from(coord.y) - y_min) * tile_size - crop_top,
		})
	}
}

/// Shifts a high-precision coordinate to a pixel index with 8 sub-tile bits.
fn pixel_index(hires: u64, zoom: u8) -> u64 {
	let shift = i32::from(HIRES_LEVEL) - i32::from(zoom) - 8;
	if shift >= 0 {
		hires >> shift
	} else {
		hires << (-shift)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn bounds(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> MosaicArea {
		MosaicArea::Bounds(GeoBBox::new(x_min, y_min, x_max, y_max).unwrap())
	}

	#[test]
	fn zoom_zero_covers_the_root_tile() {
		let plan = MosaicPlan::build(&bounds(-120.0, -45.0, 60.0, 45.0), 0, 256, false, None).unwrap();
		assert_eq!(
			(plan.tile_range.x_min, plan.tile_range.y_min, plan.tile_range.x_max, plan.tile_range.y_max),
			(0, 0, 0, 0)
		);
		assert_eq!(plan.tile_range.count_tiles(), 1);
	}

	#[test]
	fn rejects_invalid_zoom() {
		let area = bounds(-10.0, -10.0, 10.0, 10.0);
		assert!(matches!(
			MosaicPlan::build(&area, -1, 256, false, None),
			Err(StitchError::InvalidZoom { zoom: -1, .. })
		));
		assert!(matches!(
			MosaicPlan::build(&area, 31, 256, false, None),
			Err(StitchError::InvalidZoom { zoom: 31, .. })
		));
	}

	#[test]
	fn rejects_degenerate_boxes() {
		let area = bounds(10.0, 5.0, 10.0, 5.0);
		assert!(matches!(
			MosaicPlan::build(&area, 10, 256, false, None),
			Err(StitchError::DegenerateBoundingBox { .. })
		));
	}

	#[test]
	fn enforces_the_pixel_cap() {
		// the whole world at zoom 10 is 262144 pixels across
		let world = bounds(-179.9, -80.0, 179.9, 80.0);
		assert!(matches!(
			MosaicPlan::build(&world, 10, 256, false, None),
			Err(StitchError::OutputTooLarge { .. })
		));

		// the same area blows the plain cap but fits the georeferenced one
		let wide = bounds(-60.0, -30.0, 60.0, 30.0);
		assert!(matches!(
			MosaicPlan::build(&wide, 8, 256, false, None),
			Err(StitchError::OutputTooLarge { max_pixels: MAX_PIXELS_PLAIN, .. })
		));
		let plan = MosaicPlan::build(&wide, 8, 256, true, None);
		assert!(plan.is_ok(), "{plan:?}");

		// an override can tighten the cap arbitrarily
		assert!(matches!(
			MosaicPlan::build(&wide, 6, 256, false, Some(1000)),
			Err(StitchError::OutputTooLarge { max_pixels: 1000, .. })
		));
	}

	#[test]
	fn canvas_matches_tile_geometry() {
		// one full tile: the box from tile 550/335 to tile 551/336 corners
		let nw = TileCoord::new(10, 550, 335).unwrap().as_geo();
		let se = TileCoord::new(10, 551, 336).unwrap().as_geo();
		let plan = MosaicPlan::build(&bounds(nw.1, se.0, se.1, nw.0), 10, 256, false, None).unwrap();

		assert_eq!((plan.width, plan.height), (256, 256));
		assert_eq!((plan.crop_left, plan.crop_top), (0, 0));
		assert_eq!(
			(plan.tile_range.x_min, plan.tile_range.y_min, plan.tile_range.x_max, plan.tile_range.y_max),
			(550, 335, 550, 335)
		);
	}

	#[rstest]
	#[case(256)]
	#[case(512)]
	fn tile_size_scales_the_canvas(#[case] tile_size: u32) {
		let nw = TileCoord::new(10, 550, 335).unwrap().as_geo();
		let se = TileCoord::new(10, 552, 337).unwrap().as_geo();
		let plan = MosaicPlan::build(&bounds(nw.1, se.0, se.1, nw.0), 10, tile_size, false, None).unwrap();
		assert_eq!((plan.width, plan.height), (2 * tile_size, 2 * tile_size));
	}

	#[test]
	fn placements_are_offset_by_the_crop() {
		let area = bounds(13.3, 52.4, 13.5, 52.6);
		let plan = MosaicPlan::build(&area, 10, 256, false, None).unwrap();

		let placements: Vec<TilePlacement> = plan.placements().collect();
		assert_eq!(placements.len() as u64, plan.tile_range.count_tiles());

		let first = placements.first().unwrap();
		assert_eq!(first.x_offset, -i64::from(plan.crop_left));
		assert_eq!(first.y_offset, -i64::from(plan.crop_top));

		// consecutive tiles in a row are exactly one tile apart
		let second = placements.get(1).unwrap();
		assert_eq!(second.x_offset - first.x_offset, 256);
		assert_eq!(second.y_offset, first.y_offset);
	}

	#[test]
	fn centered_mode_matches_its_bounding_box() {
		let center = GeoPoint::new(52.5, 13.4).unwrap();
		let area = MosaicArea::Centered {
			center,
			width: 4,
			height: 2,
		};
		let plan = MosaicPlan::build(&area, 10, 256, false, None).unwrap();

		assert_eq!((plan.width, plan.height), (4 * 256, 2 * 256));

		// the center tile sits in the middle of the planned range
		let center_tile = TileCoord::from_geo(52.5, 13.4, 10).unwrap();
		assert!(plan.tile_range.x_min <= center_tile.x && center_tile.x <= plan.tile_range.x_max);
		assert!(plan.tile_range.y_min <= center_tile.y && center_tile.y <= plan.tile_range.y_max);
	}

	#[test]
	fn centered_mode_requires_a_size() {
		let area = MosaicArea::Centered {
			center: GeoPoint::new(0.0, 0.0).unwrap(),
			width: 0,
			height: 2,
		};
		assert!(MosaicPlan::build(&area, 10, 256, false, None).is_err());
	}

	#[test]
	fn geo_reference_is_consistent() {
		let area = bounds(13.3, 52.4, 13.5, 52.6);
		let plan = MosaicPlan::build(&area, 12, 256, true, None).unwrap();
		let geo = plan.geo_reference;

		assert!(geo.pixel_width > 0.0);
		assert!(geo.pixel_height > 0.0);

		// walking the whole canvas recovers the projected box
		let bbox = GeoBBox::new(13.3, 52.4, 13.5, 52.6).unwrap();
		let [m_x_min, m_y_min, m_x_max, m_y_max] = bbox.to_mercator().unwrap();
		assert!((geo.top_left_x - m_x_min).abs() < 1e-6);
		assert!((geo.top_left_y - m_y_max).abs() < 1e-6);
		let walked_x = geo.top_left_x + geo.pixel_width * f64::from(plan.width);
		let walked_y = geo.top_left_y - geo.pixel_height * f64::from(plan.height);
		assert!((walked_x - m_x_max).abs() < 1e-6);
		assert!((walked_y - m_y_min).abs() < 1e-6);
	}
}
