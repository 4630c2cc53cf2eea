use anyhow::{Context, Result};
use clap::Args;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tilecache::{
	atlas::{Atlas, MapRegistry},
	config::Config,
	dispatch::run_pool,
	operation::{OperationKind, PurgeOperation, SeedOperation, TileOperation},
	stream::{TileExpansion, from_bounds, from_single_tile, from_tile_list},
};
use tilecache_core::{CacheError, GeoBBox, MAX_ZOOM, TileNameFormat, ZoomRange};
use tokio::{
	fs::File,
	io::{AsyncBufRead, BufReader},
	runtime,
};
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	#[command(subcommand)]
	action: Action,
}

#[derive(clap::Subcommand, Debug)]
enum Action {
	/// Render tiles and store them in the cache
	Seed(Arguments),

	/// Remove tiles from the cache
	Purge(Arguments),
}

#[derive(Args, Debug)]
#[command(disable_version_flag = true)]
struct Arguments {
	/// YAML file describing the cache and the maps
	#[arg(long, short, value_name = "FILE")]
	config: PathBuf,

	/// only process this map, all configured maps otherwise
	#[arg(long, value_name = "NAME")]
	map: Option<String>,

	/// number of tiles processed at the same time
	#[arg(long, default_value_t = num_cpus::get())]
	concurrency: usize,

	/// seed tiles even if they are already cached
	#[arg(long)]
	overwrite: bool,

	/// only log seeded tiles that took at least this many milliseconds
	#[arg(long, value_name = "MS", default_value_t = 0)]
	log_threshold: u64,

	/// area to process when no tile list or tile name is given: minLon,minLat,maxLon,maxLat
	#[arg(long, allow_hyphen_values = true, default_value = "-180,-85.0511,180,85.0511")]
	bounds: String,

	/// lowest zoom level to process
	#[arg(long, global = true, value_name = "ZOOM")]
	min_zoom: Option<u8>,

	/// highest zoom level to process
	#[arg(long, global = true, value_name = "ZOOM")]
	max_zoom: Option<u8>,

	#[command(subcommand)]
	input: Option<Input>,
}

#[derive(clap::Subcommand, Debug)]
enum Input {
	/// Process the tiles named in a file, one per line
	///
	/// Without --min-zoom and --max-zoom exactly the listed tiles are processed. With them, every
	/// listed tile is expanded to its ancestors and descendants at those zoom levels.
	TileList(TileListArguments),

	/// Process a single tile, expanded like a tile list
	TileName(TileNameArguments),
}

#[derive(Args, Debug)]
struct TileListArguments {
	/// file with one tile name per line, "-" reads standard input
	#[arg(value_name = "FILE")]
	file: String,

	/// tile name layout: a separator followed by z, x and y in any order
	#[arg(long, default_value = "/zxy")]
	format: String,
}

#[derive(Args, Debug)]
struct TileNameArguments {
	/// tile name, for example 14/300/781
	#[arg(value_name = "TILE")]
	tile: String,

	/// tile name layout: a separator followed by z, x and y in any order
	#[arg(long, default_value = "/zxy")]
	format: String,
}

/// How long the runtime waits for blocking tasks on exit. A read from standard input cannot be
/// interrupted and would otherwise keep the process alive until the next line arrives.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

pub fn run(arguments: &Subcommand) -> Result<()> {
	block_on(run_action(arguments))?
}

fn block_on<F: Future>(future: F) -> Result<F::Output> {
	let runtime = runtime::Builder::new_multi_thread().enable_all().build()?;
	let output = runtime.block_on(future);
	runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
	Ok(output)
}

async fn run_action(arguments: &Subcommand) -> Result<()> {
	let (kind, arguments) = match &arguments.action {
		Action::Seed(arguments) => (OperationKind::Seed, arguments),
		Action::Purge(arguments) => (OperationKind::Purge, arguments),
	};

	let config = Config::from_path(&arguments.config)?;
	let atlas = Arc::new(config.build_atlas()?);
	let maps = select_maps(&atlas, arguments.map.as_deref())?;

	let operation: Arc<dyn TileOperation> = match kind {
		OperationKind::Seed => Arc::new(
			SeedOperation::from_atlas(&atlas, arguments.overwrite)?
				.with_log_threshold(Duration::from_millis(arguments.log_threshold)),
		),
		OperationKind::Purge => Arc::new(PurgeOperation::from_atlas(&atlas)?),
	};

	let token = CancellationToken::new();
	let interrupt = tokio::spawn(cancel_on_interrupt(token.clone()));
	let result = execute(&token, arguments, &maps, operation).await;
	interrupt.abort();

	match result {
		Ok(()) => {
			log::info!("cache {kind} finished");
			Ok(())
		}
		Err(err) if CacheError::is_canceled_error(&err) => {
			log::warn!("cache {kind} canceled");
			Ok(())
		}
		Err(err) => Err(err).with_context(|| format!("cache {kind} failed")),
	}
}

async fn cancel_on_interrupt(token: CancellationToken) {
	if tokio::signal::ctrl_c().await.is_ok() {
		log::warn!("interrupt received, stopping workers");
		token.cancel();
	}
}

/// The map named on the command line, or all configured maps.
fn select_maps(atlas: &Atlas, name: Option<&str>) -> Result<Vec<String>, CacheError> {
	let maps = match name {
		Some(name) => vec![atlas.get_map(name)?.name],
		None => atlas.map_names(),
	};
	if maps.is_empty() {
		return Err(CacheError::NoMaps);
	}
	Ok(maps)
}

/// Tile lists and tile names are processed as given unless a zoom flag asks for expansion.
fn expansion(min_zoom: Option<u8>, max_zoom: Option<u8>) -> Result<TileExpansion, CacheError> {
	if min_zoom.is_none() && max_zoom.is_none() {
		return Ok(TileExpansion::explicit());
	}
	let min = min_zoom.unwrap_or(0);
	let max = max_zoom.unwrap_or(min);
	Ok(TileExpansion::across(ZoomRange::new(min, max)?))
}

async fn execute(
	token: &CancellationToken,
	arguments: &Arguments,
	maps: &[String],
	operation: Arc<dyn TileOperation>,
) -> Result<()> {
	let concurrency = arguments.concurrency;

	match &arguments.input {
		None => {
			let bbox: GeoBBox = arguments.bounds.parse()?;
			let zooms = ZoomRange::new(
				arguments.min_zoom.unwrap_or(0),
				arguments.max_zoom.unwrap_or(MAX_ZOOM),
			)?;
			log::info!("zoom list: {zooms}");
			let stream = from_bounds(token, bbox, &zooms);
			run_pool(token, stream, maps, concurrency, operation).await?;
		}
		Some(Input::TileList(list)) => {
			let format: TileNameFormat = list.format.parse()?;
			let expansion = expansion(arguments.min_zoom, arguments.max_zoom)?;
			log_expansion(&expansion);

			let reader: Box<dyn AsyncBufRead + Unpin + Send> = if list.file == "-" {
				Box::new(BufReader::new(tokio::io::stdin()))
			} else {
				let file = File::open(&list.file)
					.await
					.with_context(|| format!("opening tile list {:?}", list.file))?;
				Box::new(BufReader::new(file))
			};

			let stream = from_tile_list(token, reader, format, expansion, maps.to_vec());
			run_pool(token, stream, maps, concurrency, operation).await?;
		}
		Some(Input::TileName(name)) => {
			let format: TileNameFormat = name.format.parse()?;
			let tile = format.parse_tile(&name.tile)?;
			let expansion = expansion(arguments.min_zoom, arguments.max_zoom)?;
			log_expansion(&expansion);

			let stream = from_single_tile(token, tile, expansion, maps.to_vec())?;
			run_pool(token, stream, maps, concurrency, operation).await?;
		}
	}
	Ok(())
}

fn log_expansion(expansion: &TileExpansion) {
	if expansion.is_explicit() {
		log::info!("zoom list: explicit");
	} else {
		log::info!("zoom list: {}", expansion.zooms);
	}
}
