//! # tilestitch_core
//!
//! Leaf types and pure math for stitching slippy-map tiles into one raster:
//! geodesy (WGS84 ↔ tile space ↔ Pseudo-Mercator), mosaic planning (which
//! tiles cover a bounding box and where they land on the canvas), the typed
//! error taxonomy, and progress reporting.
//!
//! Nothing in this crate performs IO; the fetch/decode pipeline and the
//! encoders live in the `tilestitch` and `tilestitch_image` crates.
//!
//! ## Usage Example
//!
//! ```
//! use tilestitch_core::{GeoBBox, MosaicArea, MosaicPlan};
//!
//! let bbox = GeoBBox::new(13.3, 52.4, 13.5, 52.6).unwrap();
//! let plan = MosaicPlan::build(&MosaicArea::Bounds(bbox), 10, 256, false, None).unwrap();
//!
//! assert!(plan.tile_range.count_tiles() > 0);
//! assert_eq!(plan.placements().count() as u64, plan.tile_range.count_tiles());
//! ```

pub mod error;
pub mod geodesy;
pub mod plan;
pub mod progress;
pub mod types;

pub use error::{StitchError, StitchResult};
pub use plan::{DEFAULT_TILE_SIZE, MAX_PIXELS_GEOREFERENCED, MAX_PIXELS_PLAIN, MosaicArea, MosaicPlan, TilePlacement};
pub use progress::ProgressBar;
pub use types::{GeoBBox, GeoPoint, GeoReference, MAX_ZOOM, TileBBox, TileCoord};
