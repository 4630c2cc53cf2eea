use super::{TileCache, stores_zoom};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tilecache_core::CacheKey;

/// Keeps tiles in a hash map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
	max_zoom: Option<u8>,
	tiles: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
	pub fn new(max_zoom: Option<u8>) -> MemoryCache {
		MemoryCache {
			max_zoom,
			tiles: RwLock::new(HashMap::new()),
		}
	}

	pub fn len(&self) -> usize {
		self.tiles.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tiles.read().is_empty()
	}

	pub fn contains(&self, key: &CacheKey) -> bool {
		self.tiles.read().contains_key(&key.to_string())
	}
}

#[async_trait]
impl TileCache for MemoryCache {
	async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
		Ok(self.tiles.read().get(&key.to_string()).cloned())
	}

	async fn set(&self, key: &CacheKey, value: Vec<u8>) -> Result<()> {
		if !stores_zoom(self.max_zoom, key.z) {
			log::trace!("not caching {key}, zoom is above {:?}", self.max_zoom);
			return Ok(());
		}
		self.tiles.write().insert(key.to_string(), value);
		Ok(())
	}

	async fn purge(&self, key: &CacheKey) -> Result<()> {
		self.tiles.write().remove(&key.to_string());
		Ok(())
	}
}
