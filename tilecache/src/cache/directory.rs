use super::{TileCache, stores_zoom};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::{
	io::ErrorKind,
	path::{Path, PathBuf},
};
use tilecache_core::CacheKey;
use tokio::fs;

/// Stores every tile as a file at `root/<cache key>`.
///
/// Writes go to a temporary sibling first and are renamed into place, so readers never see a partial tile.
#[derive(Debug)]
pub struct DirectoryCache {
	root: PathBuf,
	max_zoom: Option<u8>,
}

impl DirectoryCache {
	pub fn new(root: impl Into<PathBuf>, max_zoom: Option<u8>) -> DirectoryCache {
		DirectoryCache {
			root: root.into(),
			max_zoom,
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
		let mut path = self.root.join(&key.map_name);
		if let Some(layer) = &key.layer_name {
			path.push(layer);
		}
		path.push(key.z.to_string());
		path.push(key.x.to_string());
		path.push(key.y.to_string());
		path
	}
}

#[async_trait]
impl TileCache for DirectoryCache {
	async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
		let path = self.entry_path(key);
		match fs::read(&path).await {
			Ok(data) => Ok(Some(data)),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err).with_context(|| format!("reading cached tile {path:?}")),
		}
	}

	async fn set(&self, key: &CacheKey, value: Vec<u8>) -> Result<()> {
		if !stores_zoom(self.max_zoom, key.z) {
			log::trace!("not caching {key}, zoom is above {:?}", self.max_zoom);
			return Ok(());
		}

		let path = self.entry_path(key);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)
				.await
				.with_context(|| format!("creating cache directory {parent:?}"))?;
		}

		let mut temp = path.clone().into_os_string();
		temp.push("-tmp");
		let temp = PathBuf::from(temp);
		fs::write(&temp, value)
			.await
			.with_context(|| format!("writing cached tile {temp:?}"))?;
		fs::rename(&temp, &path)
			.await
			.with_context(|| format!("moving cached tile into place at {path:?}"))?;
		Ok(())
	}

	async fn purge(&self, key: &CacheKey) -> Result<()> {
		let path = self.entry_path(key);
		match fs::remove_file(&path).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err).with_context(|| format!("removing cached tile {path:?}")),
		}
	}
}
