//! The fetch → decode → composite pipeline.
//!
//! Tiles are fetched and decoded concurrently through a bounded stream and
//! handed to a single sequential compositing consumer. `buffered` preserves
//! the planned row-major order, so the final pixels are deterministic no
//! matter which fetches finish first; the layers of one tile are fetched
//! inside one task, which keeps later layers on top. The first error drops
//! the stream and with it all in-flight work.

use crate::fetch::TileFetcher;
use crate::url_template::TileUrlTemplate;
use futures::StreamExt;
use futures::stream;
use image::DynamicImage;
use tilestitch_core::{MosaicPlan, ProgressBar, StitchError, StitchResult, TilePlacement};
use tilestitch_image::{Canvas, decode_tile, sniff};

/// Default number of tiles fetched concurrently.
pub const DEFAULT_CONCURRENCY: usize = 6;

/// Fetches every planned tile and composites the mosaic.
///
/// Layer templates are applied in the given order, later layers on top.
/// Missing tiles (empty responses) leave their canvas region transparent;
/// every other failure aborts the run with a typed error naming the tile
/// and URL.
pub async fn stitch_tiles(
	plan: &MosaicPlan,
	templates: &[TileUrlTemplate],
	fetcher: &dyn TileFetcher,
	progress: &ProgressBar,
	concurrency: usize,
) -> StitchResult<Canvas> {
	let mut canvas = Canvas::new(plan.width, plan.height)?;

	log::info!(
		"fetching {} tiles ({}), {} layer(s), into {}x{} pixels",
		plan.tile_range.count_tiles(),
		plan.tile_range,
		templates.len(),
		plan.width,
		plan.height
	);
	progress.init("fetching tiles", plan.tile_range.count_tiles() * templates.len() as u64);

	let placements: Vec<TilePlacement> = plan.placements().collect();
	let mut tiles = stream::iter(placements)
		.map(|placement| fetch_tile_layers(placement, plan.tile_size, templates, fetcher, progress))
		.buffered(concurrency.max(1));

	while let Some(tile) = tiles.next().await {
		let (placement, layers) = tile?;
		for image in &layers {
			canvas.place_tile(image, placement.x_offset, placement.y_offset)?;
		}
	}

	progress.finish();
	Ok(canvas)
}

/// Fetches and decodes all layers of one tile, in layer order.
async fn fetch_tile_layers(
	placement: TilePlacement,
	tile_size: u32,
	templates: &[TileUrlTemplate],
	fetcher: &dyn TileFetcher,
	progress: &ProgressBar,
) -> StitchResult<(TilePlacement, Vec<DynamicImage>)> {
	let coord = placement.coord;
	let mut layers = Vec::with_capacity(templates.len());

	for template in templates {
		let url = template.url_for(&coord);
		log::trace!("fetching {url}");
		progress.inc(1);

		let bytes = fetcher
			.fetch(&url)
			.await
			.map_err(|source| StitchError::FetchFailed {
				coord,
				url: url.clone(),
				source,
			})?;

		if bytes.is_empty() {
			log::debug!("tile {coord} is missing in layer '{template}'");
			continue;
		}

		let format = sniff(&bytes).ok_or_else(|| StitchError::UnrecognizedFormat {
			coord,
			url: url.clone(),
		})?;
		let image = decode_tile(&bytes, format).map_err(|source| StitchError::DecodeFailed {
			coord,
			url: url.clone(),
			source,
		})?;

		if image.width() != tile_size || image.height() != tile_size {
			return Err(StitchError::TileSizeMismatch {
				coord,
				url,
				width: image.width(),
				height: image.height(),
				expected: tile_size,
			});
		}

		layers.push(image);
	}

	Ok((placement, layers))
}
