use super::{TileExpansion, TileStream};
use tilecache_core::{CacheError, MapTile, Tile};
use tokio_util::sync::CancellationToken;

/// Streams `tile`, expanded with `expansion`, for every map.
///
/// Maps are the outer loop: all work for the first map is generated before the second.
/// Fails with [`CacheError::NoMaps`] without starting a generator if `maps` is empty.
pub fn from_single_tile(
	token: &CancellationToken,
	tile: Tile,
	expansion: TileExpansion,
	maps: Vec<String>,
) -> Result<TileStream<MapTile>, CacheError> {
	if maps.is_empty() {
		return Err(CacheError::NoMaps);
	}

	Ok(TileStream::spawn(token, move |sender| async move {
		for map_name in &maps {
			if !expansion.send(&sender, tile, std::slice::from_ref(map_name)).await {
				return;
			}
		}
	}))
}
