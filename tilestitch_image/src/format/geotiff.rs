//! GeoTIFF encoding of the finished mosaic.
//!
//! Writes a strip-based RGBA TIFF with LZW compression and the horizontal
//! differencing predictor, tagged with the pixel scale and a tie-point
//! anchoring pixel (0, 0) to the top-left projected coordinate. The GeoKey
//! directory declares Pseudo-Mercator (EPSG:3857) as a projected CRS over a
//! WGS84 geographic base.
//!
//! TIFF directories contain file offsets, so the target must be seekable;
//! this encoder only writes to files, never to a stream.

use crate::canvas::Canvas;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::Tag;
use tilestitch_core::GeoReference;

/// GeoTIFF tag ids, per the GeoTIFF 1.1 specification.
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GEO_ASCII_PARAMS: u16 = 34737;

/// TIFF predictor value for horizontal differencing.
const PREDICTOR_HORIZONTAL: u16 = 2;

/// GeoKey citations, '|'-separated as GeoTIFF requires.
const ASCII_PARAMS: &str = "WGS 84 / Pseudo-Mercator|WGS 84|";

/// GeoKey directory: projected model, pixel-is-area raster, EPSG:3857
/// projected CRS with an EPSG:4326 geographic base, meters as linear unit.
/// Entries are `(key id, tag location, count, value)`, sorted by key id.
const GEO_KEYS: [u16; 32] = [
	1, 1, 1, 7, // version 1.1.1, 7 keys
	1024, 0, 1, 1, // GTModelType: projected
	1025, 0, 1, 1, // GTRasterType: pixel is area
	1026, GEO_ASCII_PARAMS, 25, 0, // GTCitation: "WGS 84 / Pseudo-Mercator|"
	2048, 0, 1, 4326, // GeodeticCRS: WGS 84
	2049, GEO_ASCII_PARAMS, 7, 25, // GeogCitation: "WGS 84|"
	3072, 0, 1, 3857, // ProjectedCRS: Pseudo-Mercator
	3076, 0, 1, 9001, // ProjLinearUnits: metre
];

/// Writes the canvas as a georeferenced TIFF file.
pub fn write(path: &Path, canvas: &Canvas, geo: &GeoReference) -> Result<()> {
	let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
	let mut encoder = TiffEncoder::new(BufWriter::new(file))?.with_compression(Compression::Lzw);

	let mut image = encoder.new_image::<colortype::RGBA8>(canvas.width(), canvas.height())?;
	image.encoder().write_tag(Tag::Predictor, PREDICTOR_HORIZONTAL)?;
	image.encoder().write_tag(
		Tag::Unknown(MODEL_PIXEL_SCALE),
		&[geo.pixel_width, geo.pixel_height, 0.0][..],
	)?;
	image.encoder().write_tag(
		Tag::Unknown(MODEL_TIEPOINT),
		&[0.0, 0.0, 0.0, geo.top_left_x, geo.top_left_y, 0.0][..],
	)?;
	image.encoder().write_tag(Tag::Unknown(GEO_KEY_DIRECTORY), &GEO_KEYS[..])?;
	image.encoder().write_tag(Tag::Unknown(GEO_ASCII_PARAMS), ASCII_PARAMS)?;

	image.write_data(&differenced(canvas))?;
	Ok(())
}

/// Applies per-row horizontal differencing across the four RGBA samples.
///
/// The predictor runs before LZW sees the data; decoders undo it after
/// decompression, guided by the `Predictor` tag.
fn differenced(canvas: &Canvas) -> Vec<u8> {
	let mut data = canvas.data().to_vec();
	let row_len = canvas.width() as usize * 4;
	for row in data.chunks_exact_mut(row_len) {
		for i in (4..row_len).rev() {
			row[i] = row[i].wrapping_sub(row[i - 4]);
		}
	}
	data
}
