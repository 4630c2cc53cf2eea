use crate::cache::{DirectoryCache, MemoryCache, TileCache};
use serde::Deserialize;
use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

/// Cache backend, selected by its `type`.
///
/// ```yaml
/// cache:
///   type: directory
///   path: ./tiles
///   max_zoom: 14
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheConfig {
	/// Tiles live in memory for the duration of the process.
	Memory {
		#[serde(default)]
		max_zoom: Option<u8>,
	},
	/// One file per tile below `path`.
	Directory {
		path: PathBuf,
		#[serde(default)]
		max_zoom: Option<u8>,
	},
}

impl CacheConfig {
	/// Makes a relative directory path relative to `base`.
	pub fn resolve_paths(&mut self, base: &Path) {
		if let CacheConfig::Directory { path, .. } = self
			&& path.is_relative()
		{
			*path = base.join(&*path);
		}
	}

	pub fn build(&self) -> Arc<dyn TileCache> {
		match self {
			CacheConfig::Memory { max_zoom } => Arc::new(MemoryCache::new(*max_zoom)),
			CacheConfig::Directory { path, max_zoom } => Arc::new(DirectoryCache::new(path.clone(), *max_zoom)),
		}
	}
}
