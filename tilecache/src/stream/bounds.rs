use super::TileStream;
use tilecache_core::{GeoBBox, Tile, TileBBox, ZoomRange};
use tokio_util::sync::CancellationToken;

/// Streams every tile covering `bbox`, level by level in the order of `zooms`.
///
/// Within a level tiles run `x` ascending outer and `y` ascending inner.
pub fn from_bounds(token: &CancellationToken, bbox: GeoBBox, zooms: &ZoomRange) -> TileStream<Tile> {
	let levels = zooms.as_slice().to_vec();
	TileStream::spawn(token, move |sender| async move {
		for level in levels {
			let range = TileBBox::from_geo(level, &bbox);
			log::debug!("generating {} tiles at zoom {level}", range.count_tiles());
			for tile in range.iter_tiles() {
				if !sender.send(tile).await {
					return;
				}
			}
		}
	})
}
