//! Where seeded tiles come from.

mod upstream;

pub use upstream::UpstreamSource;

use crate::atlas::Map;
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Debug;
use tilecache_core::Tile;

/// Produces the encoded tile of a map. `map` has already been reduced to the layers active at the tile's zoom.
#[async_trait]
pub trait TileSource: Debug + Send + Sync {
	async fn fetch_tile(&self, map: &Map, tile: Tile) -> Result<Vec<u8>>;
}
