//! Tile cache backends.
//!
//! A [`TileCache`] stores encoded tiles under a [`CacheKey`]. Implementations must be safe to use
//! from many workers at once; the dispatcher adds no locking of its own.

mod directory;
mod memory;

pub use directory::DirectoryCache;
pub use memory::MemoryCache;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use tilecache_core::CacheKey;

#[async_trait]
pub trait TileCache: Debug + Send + Sync {
	/// The stored tile, or `None` on a miss.
	async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;

	async fn set(&self, key: &CacheKey, value: Vec<u8>) -> Result<()>;

	/// Removes the tile. Purging a missing key succeeds.
	async fn purge(&self, key: &CacheKey) -> Result<()>;
}

/// `true` if a cache limited to `max_zoom` stores tiles of zoom `z`.
fn stores_zoom(max_zoom: Option<u8>, z: u8) -> bool {
	max_zoom.is_none_or(|max| z <= max)
}
