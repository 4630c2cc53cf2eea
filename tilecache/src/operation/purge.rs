use super::TileOperation;
use crate::atlas::{Atlas, MapRegistry, MapTileRenderer};
use async_trait::async_trait;
use std::sync::Arc;
use tilecache_core::{CacheError, MapTile};
use tokio_util::sync::CancellationToken;

/// Removes tiles from the cache.
pub struct PurgeOperation {
	registry: Arc<dyn MapRegistry>,
	renderer: Arc<dyn MapTileRenderer>,
}

impl PurgeOperation {
	pub fn new(registry: Arc<dyn MapRegistry>, renderer: Arc<dyn MapTileRenderer>) -> PurgeOperation {
		PurgeOperation { registry, renderer }
	}

	pub fn from_atlas(atlas: &Arc<Atlas>) -> Result<PurgeOperation, CacheError> {
		atlas.cache()?;
		Ok(PurgeOperation::new(atlas.clone(), atlas.clone()))
	}
}

#[async_trait]
impl TileOperation for PurgeOperation {
	async fn run(&self, token: CancellationToken, map_tile: MapTile) -> Result<(), CacheError> {
		if token.is_cancelled() {
			return Err(CacheError::Canceled);
		}
		let tile = map_tile.tile;
		let result = match self.registry.get_map(&map_tile.map_name) {
			Ok(map) => self.renderer.purge_map_tile(&map, tile).await,
			Err(err) => Err(err),
		};
		match result {
			Ok(()) => {
				log::info!("purged {map_tile}");
				Ok(())
			}
			Err(CacheError::Canceled) => Err(CacheError::Canceled),
			Err(err) => Err(CacheError::worker_tile(true, tile, err)),
		}
	}
}
