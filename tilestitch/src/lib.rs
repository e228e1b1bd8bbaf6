//! # tilestitch
//!
//! Turns a geographic bounding box and one or more slippy-map tile URL
//! templates into a single georeferenced raster image: computes which tiles
//! cover the requested area, fetches and decodes each one, composites
//! overlapping layers with alpha blending, and writes the mosaic as PNG or
//! GeoTIFF, optionally with a world file.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tilestitch::{HttpFetcher, TileUrlTemplate, stitch_tiles};
//! use tilestitch_core::{GeoBBox, MosaicArea, MosaicPlan, ProgressBar};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bbox = GeoBBox::new(13.3, 52.4, 13.5, 52.6)?;
//!     let plan = MosaicPlan::build(&MosaicArea::Bounds(bbox), 12, 256, false, None)?;
//!     let templates = vec![TileUrlTemplate::new("https://tile.openstreetmap.org/{z}/{x}/{y}.png")?];
//!
//!     let fetcher = HttpFetcher::new()?;
//!     let canvas = stitch_tiles(&plan, &templates, &fetcher, &ProgressBar::hidden(), 6).await?;
//!     println!("stitched {}x{} pixels", canvas.width(), canvas.height());
//!     Ok(())
//! }
//! ```

pub mod fetch;
pub mod output;
pub mod pipeline;
pub mod url_template;

pub use fetch::{HttpFetcher, TileFetcher};
pub use output::{OutputFormat, write_mosaic};
pub use pipeline::{DEFAULT_CONCURRENCY, stitch_tiles};
pub use url_template::TileUrlTemplate;

pub use tilestitch_core as core;
pub use tilestitch_image as image;
