//! Tile image formats: magic-byte sniffing, decoding and encoding.
//!
//! Tile servers routinely lie about content types, so the pipeline never
//! trusts anything but the first bytes of the body: `89 50 4E 47` is PNG,
//! `FF D8` is JPEG, anything else is unrecognized.

pub mod geotiff;
pub mod jpeg;
pub mod png;

use anyhow::Result;
use image::DynamicImage;

const PNG_MAGIC: [u8; 4] = [0x89, 0x50, 0x4E, 0x47];
const JPEG_MAGIC: [u8; 2] = [0xFF, 0xD8];

/// A tile image format recognized by its magic bytes.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TileImageFormat {
	PNG,
	JPEG,
}

/// Identifies the format of a tile body by its magic bytes.
///
/// Returns `None` for anything that is neither PNG nor JPEG, including
/// bodies shorter than the magic itself.
///
/// # Examples
///
/// ```
/// use tilestitch_image::format::{TileImageFormat, sniff};
///
/// assert_eq!(sniff(&[0x89, 0x50, 0x4E, 0x47, 0x0D]), Some(TileImageFormat::PNG));
/// assert_eq!(sniff(&[0xFF, 0xD8, 0xFF]), Some(TileImageFormat::JPEG));
/// assert_eq!(sniff(b"<html>"), None);
/// assert_eq!(sniff(&[]), None);
/// ```
pub fn sniff(bytes: &[u8]) -> Option<TileImageFormat> {
	if bytes.starts_with(&PNG_MAGIC) {
		Some(TileImageFormat::PNG)
	} else if bytes.starts_with(&JPEG_MAGIC) {
		Some(TileImageFormat::JPEG)
	} else {
		None
	}
}

/// Decodes a tile body and normalizes its channel depth.
///
/// The result is always 8-bit grey, RGB or RGBA, the three depths the
/// compositor knows how to place. Grey+alpha and 16-bit sources are folded
/// into those.
pub fn decode_tile(bytes: &[u8], format: TileImageFormat) -> Result<DynamicImage> {
	let image = match format {
		TileImageFormat::PNG => png::decode(bytes)?,
		TileImageFormat::JPEG => jpeg::decode(bytes)?,
	};
	Ok(normalize_depth(image))
}

fn normalize_depth(image: DynamicImage) -> DynamicImage {
	match image {
		DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
		DynamicImage::ImageLuma16(_) => DynamicImage::ImageLuma8(image.to_luma8()),
		DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb8(image.to_rgb8()),
		_ => DynamicImage::ImageRgba8(image.to_rgba8()),
	}
}
