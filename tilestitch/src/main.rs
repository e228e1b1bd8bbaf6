use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;
use tilestitch::{DEFAULT_CONCURRENCY, HttpFetcher, OutputFormat, TileUrlTemplate, stitch_tiles, write_mosaic};
use tilestitch_core::{DEFAULT_TILE_SIZE, GeoBBox, GeoPoint, MosaicArea, MosaicPlan, ProgressBar};

// Define the command-line interface using the clap crate
#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	disable_help_subcommand = true,
)]
struct Cli {
	/// zoom level of the fetched tiles
	#[arg(value_name = "zoom", allow_hyphen_values = true)]
	zoom: i32,

	/// tile URL templates with {z}, {x}, {y} and optional {s} placeholders;
	/// later templates are drawn on top of earlier ones
	#[arg(value_name = "url", required = true)]
	urls: Vec<String>,

	/// stitch the area inside a bounding box
	#[arg(
		long,
		short,
		value_name = "min_lat,min_lon,max_lat,max_lon",
		allow_hyphen_values = true,
		conflicts_with = "center"
	)]
	bbox: Option<String>,

	/// stitch an area around a center point instead of a bounding box
	#[arg(long, value_name = "lat,lon", allow_hyphen_values = true, requires = "tiles")]
	center: Option<String>,

	/// width and height of the centered output, in tiles
	#[arg(long, value_name = "width,height", requires = "center")]
	tiles: Option<String>,

	/// output file; PNG is written to stdout if omitted
	#[arg(long, short)]
	output: Option<PathBuf>,

	/// output raster format
	#[arg(long, short, value_enum, default_value_t = OutputFormat::Png)]
	format: OutputFormat,

	/// also write a world file next to the output file
	#[arg(long)]
	world_file: bool,

	/// edge length of a map tile in pixels
	#[arg(long, value_name = "int", default_value_t = DEFAULT_TILE_SIZE)]
	tile_size: u32,

	/// override the maximum number of output pixels
	#[arg(long, value_name = "int")]
	max_pixels: Option<u64>,

	/// number of tiles fetched concurrently
	#[arg(long, value_name = "int", default_value_t = DEFAULT_CONCURRENCY)]
	concurrency: usize,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Initialize logger and set log level based on verbosity flag
	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
	let area = parse_area(&cli)?;
	let templates = cli
		.urls
		.iter()
		.map(|url| TileUrlTemplate::new(url))
		.collect::<Result<Vec<_>, _>>()?;

	let georeferenced = cli.format == OutputFormat::Geotiff || cli.world_file;
	let plan = MosaicPlan::build(&area, cli.zoom, cli.tile_size, georeferenced, cli.max_pixels)?;
	log::info!("at zoom level {}, that's tiles {}", plan.zoom, plan.tile_range);

	let progress = if cli.verbose.log_level_filter() == log::LevelFilter::Off {
		ProgressBar::hidden()
	} else {
		ProgressBar::new("fetching tiles", 0)
	};

	let fetcher = HttpFetcher::new()?;
	let canvas = stitch_tiles(&plan, &templates, &fetcher, &progress, cli.concurrency).await?;

	write_mosaic(&canvas, &plan.geo_reference, cli.format, cli.output.as_deref(), cli.world_file)?;
	Ok(())
}

fn parse_area(cli: &Cli) -> Result<MosaicArea> {
	match (&cli.bbox, &cli.center) {
		(Some(bbox), None) => {
			let v = parse_floats(bbox, 4)?;
			// CLI order is min_lat,min_lon,max_lat,max_lon
			Ok(MosaicArea::Bounds(GeoBBox::new(v[1], v[0], v[3], v[2])?))
		}
		(None, Some(center)) => {
			let c = parse_floats(center, 2)?;
			let tiles = cli.tiles.as_ref().expect("clap enforces --tiles with --center");
			let t = parse_ints(tiles, 2)?;
			Ok(MosaicArea::Centered {
				center: GeoPoint::new(c[0], c[1])?,
				width: t[0],
				height: t[1],
			})
		}
		(Some(_), Some(_)) => bail!("--bbox and --center are mutually exclusive"),
		(None, None) => bail!("either --bbox or --center/--tiles is required"),
	}
}

fn parse_floats(input: &str, expected: usize) -> Result<Vec<f64>> {
	let values: Vec<f64> = input
		.split([' ', ',', ';'])
		.filter(|s| !s.is_empty())
		.map(|s| s.parse().with_context(|| format!("'{s}' is not a number")))
		.collect::<Result<_>>()?;
	ensure!(
		values.len() == expected,
		"expected {expected} comma-separated numbers, got {} in '{input}'",
		values.len()
	);
	Ok(values)
}

fn parse_ints(input: &str, expected: usize) -> Result<Vec<u32>> {
	let values: Vec<u32> = input
		.split([' ', ',', ';'])
		.filter(|s| !s.is_empty())
		.map(|s| s.parse().with_context(|| format!("'{s}' is not a whole number")))
		.collect::<Result<_>>()?;
	ensure!(
		values.len() == expected,
		"expected {expected} comma-separated numbers, got {} in '{input}'",
		values.len()
	);
	Ok(values)
}
