use super::TileOperation;
use crate::{
	atlas::{Atlas, MapRegistry, MapTileRenderer},
	cache::TileCache,
};
use async_trait::async_trait;
use std::{
	sync::Arc,
	time::{Duration, Instant},
};
use tilecache_core::{CacheError, CacheKey, MapTile};
use tokio_util::sync::CancellationToken;

/// Renders tiles into the cache.
///
/// Unless `overwrite` is set, tiles that are already cached are skipped without rendering.
pub struct SeedOperation {
	registry: Arc<dyn MapRegistry>,
	renderer: Arc<dyn MapTileRenderer>,
	cache: Arc<dyn TileCache>,
	overwrite: bool,
	log_threshold: Duration,
}

impl SeedOperation {
	pub fn new(
		registry: Arc<dyn MapRegistry>,
		renderer: Arc<dyn MapTileRenderer>,
		cache: Arc<dyn TileCache>,
		overwrite: bool,
	) -> SeedOperation {
		SeedOperation {
			registry,
			renderer,
			cache,
			overwrite,
			log_threshold: Duration::ZERO,
		}
	}

	pub fn from_atlas(atlas: &Arc<Atlas>, overwrite: bool) -> Result<SeedOperation, CacheError> {
		let cache = atlas.cache()?;
		Ok(SeedOperation::new(atlas.clone(), atlas.clone(), cache, overwrite))
	}

	/// Only tiles taking at least `threshold` are logged with their duration.
	pub fn with_log_threshold(mut self, threshold: Duration) -> SeedOperation {
		self.log_threshold = threshold;
		self
	}

	async fn seed(&self, token: &CancellationToken, map_tile: &MapTile) -> Result<(), CacheError> {
		let tile = map_tile.tile;
		let map = self.registry.get_map(&map_tile.map_name)?.filter_layers_by_zoom(tile.level);

		if !self.overwrite {
			let key = CacheKey::new(map_tile.map_name.as_str(), tile);
			let cached = self
				.cache
				.get(&key)
				.await
				.map_err(|err| CacheError::CacheIo(format!("{err:#}")))?;
			if cached.is_some() {
				log::info!("{map_tile} is already cached, skipping");
				return Ok(());
			}
		}

		self.renderer.seed_map_tile(token, &map, tile).await
	}
}

#[async_trait]
impl TileOperation for SeedOperation {
	async fn run(&self, token: CancellationToken, map_tile: MapTile) -> Result<(), CacheError> {
		let started = Instant::now();
		match self.seed(&token, &map_tile).await {
			Ok(()) => {
				let elapsed = started.elapsed();
				if elapsed >= self.log_threshold {
					log::info!("seeding {map_tile} took {}ms", elapsed.as_millis());
				}
				Ok(())
			}
			Err(CacheError::Canceled) => Err(CacheError::Canceled),
			Err(err) => Err(CacheError::worker_tile(false, map_tile.tile, err)),
		}
	}
}
