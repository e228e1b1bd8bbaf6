//! The output canvas and the tile compositing rules.
//!
//! The canvas is a single owned RGBA byte buffer, zero-initialized (fully
//! transparent) and mutated in place by successive tile placements. All
//! indexing goes through a bounds-checked `(x, y) -> index` accessor; source
//! pixels landing outside the canvas are silently clipped, which is how
//! partial border tiles are cropped to the requested bounding box.

use anyhow::{Result, bail, ensure};
use image::{DynamicImage, ImageBuffer, Rgba};

/// The mosaic output canvas: RGBA, one byte per channel.
#[derive(Debug)]
pub struct Canvas {
	width: u32,
	height: u32,
	data: Vec<u8>,
}

impl Canvas {
	/// Creates a fully transparent canvas.
	pub fn new(width: u32, height: u32) -> Result<Canvas> {
		ensure!(width > 0 && height > 0, "canvas must not be empty, got {width}x{height}");
		let len = width as usize * height as usize * 4;
		Ok(Canvas {
			width,
			height,
			data: vec![0u8; len],
		})
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// The raw RGBA bytes, row-major, top to bottom.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// The RGBA value of one pixel.
	pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
		let i = self.index(x, y);
		[self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
	}

	fn index(&self, x: u32, y: u32) -> usize {
		assert!(x < self.width && y < self.height, "pixel ({x}, {y}) is off the canvas");
		(y as usize * self.width as usize + x as usize) * 4
	}

	/// Draws a decoded tile at the given canvas offset.
	///
	/// The offset may be negative or reach past the canvas; clipped pixels
	/// are dropped. Channel depths are normalized as follows:
	///
	/// - RGBA sources are blended over the existing content with the
	///   standard source-over rule, so later layers show earlier layers
	///   through their transparent regions.
	/// - RGB sources overwrite opaquely (no transparency information).
	/// - Grayscale sources replicate their single channel into R, G and B
	///   and overwrite opaquely.
	pub fn place_tile(&mut self, tile: &DynamicImage, x_offset: i64, y_offset: i64) -> Result<()> {
		match tile {
			DynamicImage::ImageLuma8(image) => self.copy_opaque(x_offset, y_offset, image.width(), image.height(), |x, y| {
				let v = image.get_pixel(x, y).0[0];
				[v, v, v]
			}),
			DynamicImage::ImageRgb8(image) => self.copy_opaque(x_offset, y_offset, image.width(), image.height(), |x, y| {
				image.get_pixel(x, y).0
			}),
			DynamicImage::ImageRgba8(image) => self.blend_over(x_offset, y_offset, image.width(), image.height(), |x, y| {
				image.get_pixel(x, y).0
			}),
			_ => bail!("unsupported tile color type {:?}, expected 8-bit grey, RGB or RGBA", tile.color()),
		}
		Ok(())
	}

	/// Converts the canvas into an owned RGBA image for encoding.
	pub fn to_image(&self) -> DynamicImage {
		let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
			ImageBuffer::from_vec(self.width, self.height, self.data.clone()).unwrap();
		DynamicImage::ImageRgba8(buffer)
	}

	fn copy_opaque(&mut self, x_offset: i64, y_offset: i64, w: u32, h: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) {
		self.for_each_visible(x_offset, y_offset, w, h, |data, i, x, y| {
			let [r, g, b] = pixel(x, y);
			data[i] = r;
			data[i + 1] = g;
			data[i + 2] = b;
			data[i + 3] = 255;
		});
	}

	fn blend_over(&mut self, x_offset: i64, y_offset: i64, w: u32, h: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) {
		self.for_each_visible(x_offset, y_offset, w, h, |data, i, x, y| {
			let [r, g, b, a] = pixel(x, y);
			if a == 255 {
				data[i] = r;
				data[i + 1] = g;
				data[i + 2] = b;
				data[i + 3] = 255;
				return;
			}
			if a == 0 {
				return;
			}

			// source-over: the incoming tile is the source, the canvas the
			// destination; a fully transparent result stays transparent
			let sa = f64::from(a) / 255.0;
			let da = f64::from(data[i + 3]) / 255.0;
			let ra = sa + da * (1.0 - sa);
			for (offset, channel) in [r, g, b].into_iter().enumerate() {
				let blended = (f64::from(channel) * sa + f64::from(data[i + offset]) * da * (1.0 - sa)) / ra;
				data[i + offset] = blended.round() as u8;
			}
			data[i + 3] = (ra * 255.0).round() as u8;
		});
	}

	/// Calls `apply` for every source pixel that lands on the canvas.
	fn for_each_visible(
		&mut self,
		x_offset: i64,
		y_offset: i64,
		w: u32,
		h: u32,
		apply: impl Fn(&mut [u8], usize, u32, u32),
	) {
		for y in 0..h {
			let dy = y_offset + i64::from(y);
			if dy < 0 || dy >= i64::from(self.height) {
				continue;
			}
			let row = dy as usize * self.width as usize;
			for x in 0..w {
				let dx = x_offset + i64::from(x);
				if dx < 0 || dx >= i64::from(self.width) {
					continue;
				}
				let i = (row + dx as usize) * 4;
				apply(&mut self.data, i, x, y);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rgb_tile(w: u32, h: u32, color: [u8; 3]) -> DynamicImage {
		DynamicImage::ImageRgb8(ImageBuffer::from_pixel(w, h, image::Rgb(color)))
	}

	fn rgba_tile(w: u32, h: u32, color: [u8; 4]) -> DynamicImage {
		DynamicImage::ImageRgba8(ImageBuffer::from_pixel(w, h, image::Rgba(color)))
	}

	#[test]
	fn starts_fully_transparent() {
		let canvas = Canvas::new(4, 4).unwrap();
		assert!(canvas.data().iter().all(|&v| v == 0));
	}

	#[test]
	fn rejects_empty_canvases() {
		assert!(Canvas::new(0, 4).is_err());
		assert!(Canvas::new(4, 0).is_err());
	}

	#[test]
	fn opaque_rgb_copies_exactly() {
		let mut canvas = Canvas::new(8, 8).unwrap();
		canvas.place_tile(&rgb_tile(8, 8, [12, 34, 56]), 0, 0).unwrap();
		for y in 0..8 {
			for x in 0..8 {
				assert_eq!(canvas.pixel(x, y), [12, 34, 56, 255]);
			}
		}
	}

	#[test]
	fn grayscale_replicates_into_rgb() {
		let mut canvas = Canvas::new(2, 2).unwrap();
		let tile = DynamicImage::ImageLuma8(ImageBuffer::from_pixel(2, 2, image::Luma([77u8])));
		canvas.place_tile(&tile, 0, 0).unwrap();
		assert_eq!(canvas.pixel(1, 1), [77, 77, 77, 255]);
	}

	#[test]
	fn blends_toward_the_upper_layer() {
		let mut canvas = Canvas::new(2, 2).unwrap();
		canvas.place_tile(&rgba_tile(2, 2, [255, 0, 0, 255]), 0, 0).unwrap();
		canvas.place_tile(&rgba_tile(2, 2, [0, 0, 255, 128]), 0, 0).unwrap();

		// half-transparent blue over opaque red moves toward blue and
		// saturates the alpha, without ever exceeding full opacity
		let [r, g, b, a] = canvas.pixel(0, 0);
		assert_eq!(a, 255);
		assert_eq!(g, 0);
		assert!(b >= 127 && r <= 128, "got ({r}, {g}, {b}, {a})");
		assert_eq!(u16::from(r) + u16::from(b), 255);
	}

	#[test]
	fn transparent_source_keeps_the_destination() {
		let mut canvas = Canvas::new(2, 2).unwrap();
		canvas.place_tile(&rgba_tile(2, 2, [10, 20, 30, 255]), 0, 0).unwrap();
		canvas.place_tile(&rgba_tile(2, 2, [200, 200, 200, 0]), 0, 0).unwrap();
		assert_eq!(canvas.pixel(0, 0), [10, 20, 30, 255]);
	}

	#[test]
	fn semi_transparent_over_nothing_keeps_its_alpha() {
		let mut canvas = Canvas::new(1, 1).unwrap();
		canvas.place_tile(&rgba_tile(1, 1, [0, 200, 0, 128]), 0, 0).unwrap();
		assert_eq!(canvas.pixel(0, 0), [0, 200, 0, 128]);
	}

	#[test]
	fn clips_partial_border_tiles() {
		let mut canvas = Canvas::new(4, 4).unwrap();
		canvas.place_tile(&rgb_tile(4, 4, [9, 9, 9]), -2, -2).unwrap();
		canvas.place_tile(&rgb_tile(4, 4, [7, 7, 7]), 2, 2).unwrap();

		assert_eq!(canvas.pixel(0, 0), [9, 9, 9, 255]);
		assert_eq!(canvas.pixel(1, 1), [9, 9, 9, 255]);
		assert_eq!(canvas.pixel(2, 2), [7, 7, 7, 255]);
		assert_eq!(canvas.pixel(3, 3), [7, 7, 7, 255]);
		// untouched corners stay transparent
		assert_eq!(canvas.pixel(3, 0), [0, 0, 0, 0]);
		assert_eq!(canvas.pixel(0, 3), [0, 0, 0, 0]);
	}

	#[test]
	fn fully_off_canvas_tiles_are_dropped() {
		let mut canvas = Canvas::new(4, 4).unwrap();
		canvas.place_tile(&rgb_tile(4, 4, [50, 50, 50]), 100, 100).unwrap();
		canvas.place_tile(&rgb_tile(4, 4, [50, 50, 50]), -100, -100).unwrap();
		assert!(canvas.data().iter().all(|&v| v == 0));
	}

	#[test]
	fn rejects_unsupported_color_types() {
		let mut canvas = Canvas::new(4, 4).unwrap();
		let tile = DynamicImage::ImageRgb16(ImageBuffer::from_pixel(4, 4, image::Rgb([0u16, 0, 0])));
		assert!(canvas.place_tile(&tile, 0, 0).is_err());
	}

	#[test]
	fn to_image_round_trips() {
		let mut canvas = Canvas::new(3, 2).unwrap();
		canvas.place_tile(&rgb_tile(1, 1, [1, 2, 3]), 2, 1).unwrap();
		let image = canvas.to_image();
		assert_eq!((image.width(), image.height()), (3, 2));
		assert_eq!(image.to_rgba8().get_pixel(2, 1).0, [1, 2, 3, 255]);
	}
}
