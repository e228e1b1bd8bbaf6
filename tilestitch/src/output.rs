//! Writing the finished mosaic: PNG or GeoTIFF, plus the optional world
//! file sidecar.
//!
//! PNG goes to a file or to stdout. GeoTIFF needs a seekable file target,
//! and a world file needs an output filename to derive its own name from;
//! both fail fast with `UnsupportedOutputTarget` otherwise, before anything
//! is written.

use anyhow::Context;
use clap::ValueEnum;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tilestitch_core::{GeoReference, StitchError, StitchResult};
use tilestitch_image::Canvas;
use tilestitch_image::format::{geotiff, png};

/// The mosaic output format.
#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
	Png,
	Geotiff,
}

impl OutputFormat {
	/// Extension of the world file sidecar for this format.
	pub fn world_file_extension(self) -> &'static str {
		match self {
			OutputFormat::Png => "pnw",
			OutputFormat::Geotiff => "tfw",
		}
	}
}

/// Serializes the canvas and, if requested, the world file.
pub fn write_mosaic(
	canvas: &Canvas,
	geo: &GeoReference,
	format: OutputFormat,
	output: Option<&Path>,
	world_file: bool,
) -> StitchResult<()> {
	match format {
		OutputFormat::Png => {
			let bytes = png::encode(canvas)?;
			match output {
				Some(path) => fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?,
				None => io::stdout()
					.lock()
					.write_all(&bytes)
					.context("failed to write PNG to stdout")?,
			}
		}
		OutputFormat::Geotiff => {
			let Some(path) = output else {
				return Err(StitchError::UnsupportedOutputTarget {
					reason: "GeoTIFF needs a seekable file, it cannot be written to stdout (use --output)".to_string(),
				});
			};
			geotiff::write(path, canvas, geo)?;
		}
	}

	if world_file {
		let Some(path) = output else {
			return Err(StitchError::UnsupportedOutputTarget {
				reason: "a world file needs an output filename to derive its own name from (use --output)".to_string(),
			});
		};
		let sidecar = path.with_extension(format.world_file_extension());
		let mut content = String::new();
		for value in geo.world_file_parameters() {
			let _ = writeln!(&mut content, "{value}");
		}
		fs::write(&sidecar, content).with_context(|| format!("failed to write {}", sidecar.display()))?;
	}

	Ok(())
}
