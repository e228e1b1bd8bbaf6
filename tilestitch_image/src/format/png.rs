//! PNG decoding and encoding bridges between the [`image`] crate and the
//! mosaic canvas.

use crate::canvas::Canvas;
use anyhow::{Result, anyhow};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, codecs::png::PngEncoder, load_from_memory_with_format};

/// Decodes a PNG tile body.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Png).map_err(|e| anyhow!("failed to decode PNG image: {e}"))
}

/// Encodes the canvas as 8-bit RGBA PNG.
///
/// No interlacing, default compression and filtering.
pub fn encode(canvas: &Canvas) -> Result<Vec<u8>> {
	let mut buffer: Vec<u8> = Vec::new();
	PngEncoder::new(&mut buffer).write_image(
		canvas.data(),
		canvas.width(),
		canvas.height(),
		ExtendedColorType::Rgba8,
	)?;
	Ok(buffer)
}
