//! # tilestitch_image
//!
//! Canvas ownership and raster codecs for the tilestitch pipeline: the RGBA
//! mosaic canvas with its alpha-compositing rules, magic-byte format
//! sniffing, PNG/JPEG tile decoding, and PNG/GeoTIFF mosaic encoding.

pub mod canvas;
pub mod format;

pub use canvas::Canvas;
pub use format::{TileImageFormat, decode_tile, sniff};
