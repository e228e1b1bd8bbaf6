//! Value types shared across the stitching pipeline.

mod geo_bbox;
mod geo_point;
mod geo_reference;
mod tile_bbox;
mod tile_coord;

pub use geo_bbox::GeoBBox;
pub use geo_point::GeoPoint;
pub use geo_reference::GeoReference;
pub use tile_bbox::TileBBox;
pub use tile_coord::{MAX_ZOOM, TileCoord};
