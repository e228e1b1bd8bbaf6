//! JPEG decoding bridge for tile bodies.
//!
//! JPEG is a source format only; mosaics are written as PNG or GeoTIFF.

use anyhow::{Result, anyhow};
use image::{DynamicImage, ImageFormat, load_from_memory_with_format};

/// Decodes a JPEG tile body.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
	load_from_memory_with_format(bytes, ImageFormat::Jpeg).map_err(|e| anyhow!("failed to decode JPEG image: {e}"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use image::ImageBuffer;

	#[test]
	fn decodes_an_encoded_tile() {
		let tile = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(32, 32, image::Rgb([200u8, 100, 50])));
		let mut encoded = Vec::new();
		tile
			.write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)
			.unwrap();
		assert_eq!(&encoded[0..2], &[0xFF, 0xD8]);

		let decoded = decode(&encoded).unwrap();
		assert_eq!((decoded.width(), decoded.height()), (32, 32));

		// lossy, but a solid color stays close
		let [r, g, b] = decoded.to_rgb8().get_pixel(16, 16).0;
		assert!(i16::from(r).abs_diff(200) < 8);
		assert!(i16::from(g).abs_diff(100) < 8);
		assert!(i16::from(b).abs_diff(50) < 8);
	}

	#[test]
	fn decode_rejects_garbage() {
		assert!(decode(b"\xFF\xD8 but not really").is_err());
	}
}
