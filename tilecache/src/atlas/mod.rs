//! The configured maps and the collaborators that seed and purge their tiles.

mod map;

pub use map::{Layer, Map};

use crate::{cache::TileCache, source::TileSource};
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::{collections::HashSet, sync::Arc};
use tilecache_core::{CacheError, CacheKey, Tile};
use tokio_util::sync::CancellationToken;

/// Lookup of configured maps.
pub trait MapRegistry: Send + Sync {
	fn get_map(&self, name: &str) -> Result<Map, CacheError>;

	/// All maps in configuration order.
	fn all_maps(&self) -> Vec<Map>;
}

/// Renders a map tile into the cache, or removes it from there.
#[async_trait]
pub trait MapTileRenderer: Send + Sync {
	async fn seed_map_tile(&self, token: &CancellationToken, map: &Map, tile: Tile) -> Result<(), CacheError>;

	async fn purge_map_tile(&self, map: &Map, tile: Tile) -> Result<(), CacheError>;
}

/// The maps of a configuration together with their cache and tile source.
#[derive(Debug)]
pub struct Atlas {
	maps: Vec<Map>,
	cache: Option<Arc<dyn TileCache>>,
	source: Arc<dyn TileSource>,
}

impl Atlas {
	pub fn new(maps: Vec<Map>, source: Arc<dyn TileSource>) -> Result<Atlas> {
		let mut names = HashSet::new();
		for map in &maps {
			if !names.insert(map.name.as_str()) {
				bail!("map ({}) is defined more than once", map.name);
			}
		}
		Ok(Atlas {
			maps,
			cache: None,
			source,
		})
	}

	pub fn with_cache(mut self, cache: Arc<dyn TileCache>) -> Atlas {
		self.cache = Some(cache);
		self
	}

	pub fn cache(&self) -> Result<Arc<dyn TileCache>, CacheError> {
		self.cache.clone().ok_or(CacheError::MissingCache)
	}

	pub fn map_names(&self) -> Vec<String> {
		self.maps.iter().map(|map| map.name.clone()).collect()
	}
}

impl MapRegistry for Atlas {
	fn get_map(&self, name: &str) -> Result<Map, CacheError> {
		self.maps
			.iter()
			.find(|map| map.name == name)
			.cloned()
			.ok_or_else(|| CacheError::UnknownMap(name.to_string()))
	}

	fn all_maps(&self) -> Vec<Map> {
		self.maps.clone()
	}
}

#[async_trait]
impl MapTileRenderer for Atlas {
	async fn seed_map_tile(&self, token: &CancellationToken, map: &Map, tile: Tile) -> Result<(), CacheError> {
		let cache = self.cache()?;

		let data = tokio::select! {
			biased;
			() = token.cancelled() => return Err(CacheError::Canceled),
			data = self.source.fetch_tile(map, tile) => data,
		};
		let data = match data {
			Ok(data) => data,
			Err(err) if CacheError::is_canceled_error(&err) => return Err(CacheError::Canceled),
			Err(err) => return Err(CacheError::Render(format!("{err:#}"))),
		};

		cache
			.set(&CacheKey::new(map.name.as_str(), tile), data)
			.await
			.map_err(|err| CacheError::CacheIo(format!("{err:#}")))
	}

	async fn purge_map_tile(&self, map: &Map, tile: Tile) -> Result<(), CacheError> {
		self.cache()?
			.purge(&CacheKey::new(map.name.as_str(), tile))
			.await
			.map_err(|err| CacheError::CacheIo(format!("{err:#}")))
	}
}
