//! Typed error taxonomy for the stitching pipeline.
//!
//! Every fatal condition carries enough context (tile coordinate, layer URL,
//! sizes) to diagnose the failure against a specific remote resource. The
//! pipeline performs no retries and no partial-result salvage; the only
//! locally absorbed condition is a zero-length tile response, which is
//! treated as a missing tile and never reaches this type.

use crate::types::{GeoBBox, TileCoord};

/// Convenience result type used across tilestitch.
pub type StitchResult<T> = Result<T, StitchError>;

/// Top-level error taxonomy for planning, fetching, decoding and output.
#[derive(thiserror::Error, Debug)]
pub enum StitchError {
	/// A coordinate outside the WGS84 / Web Mercator domain.
	#[error("coordinate ({lat}, {lon}) is outside the Web Mercator domain")]
	InvalidCoordinate { lat: f64, lon: f64 },

	/// A zoom level this pipeline cannot produce tiles for.
	#[error("zoom level {zoom} is not supported (expected 0..={max})")]
	InvalidZoom { zoom: i32, max: u8 },

	/// A bounding box that resolves to a zero-area canvas.
	#[error("bounding box {bbox} covers no pixels at zoom {zoom}")]
	DegenerateBoundingBox { bbox: GeoBBox, zoom: u8 },

	/// The planned canvas exceeds the configured pixel cap.
	#[error("output of {width}x{height} pixels exceeds the limit of {max_pixels} pixels")]
	OutputTooLarge {
		width: u64,
		height: u64,
		max_pixels: u64,
	},

	/// A placeholder in a tile URL template that is not `{z}`, `{x}`, `{y}` or `{s}`.
	#[error("unknown placeholder '{{{token}}}' in tile URL template '{template}'")]
	UnknownUrlToken { token: String, template: String },

	/// The transport failed while retrieving a tile.
	#[error("failed to fetch tile {coord} from '{url}'")]
	FetchFailed {
		coord: TileCoord,
		url: String,
		#[source]
		source: anyhow::Error,
	},

	/// A non-empty tile body that is neither PNG nor JPEG.
	#[error("tile {coord} from '{url}' is neither PNG nor JPEG")]
	UnrecognizedFormat { coord: TileCoord, url: String },

	/// A recognized tile body that the codec could not decode.
	#[error("failed to decode tile {coord} from '{url}'")]
	DecodeFailed {
		coord: TileCoord,
		url: String,
		#[source]
		source: anyhow::Error,
	},

	/// A decoded tile whose dimensions do not match the configured tile size.
	#[error("tile {coord} from '{url}' is {width}x{height} pixels, expected {expected}x{expected}")]
	TileSizeMismatch {
		coord: TileCoord,
		url: String,
		width: u32,
		height: u32,
		expected: u32,
	},

	/// An output format or sidecar that cannot be written to the given target.
	#[error("unsupported output target: {reason}")]
	UnsupportedOutputTarget { reason: String },

	/// Wrapped lower-level error from collaborators or IO.
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}
