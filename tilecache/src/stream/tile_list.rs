use super::{TileExpansion, TileStream};
use tilecache_core::{CacheError, MapTile, TileNameFormat};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;

/// Streams the tiles named in `reader`, one tile name per line.
///
/// Every name is parsed with `format`, expanded with `expansion` and sent once per map.
/// Blank lines are skipped but still counted. The first line that fails to parse latches
/// [`CacheError::TileListParse`] with its line number and ends the stream; nothing after it is read.
pub fn from_tile_list<R>(
	token: &CancellationToken,
	reader: R,
	format: TileNameFormat,
	expansion: TileExpansion,
	maps: Vec<String>,
) -> TileStream<MapTile>
where
	R: AsyncBufRead + Unpin + Send + 'static,
{
	TileStream::spawn(token, move |sender| async move {
		let mut lines = reader.lines();
		let mut line_number = 0usize;

		loop {
			let line = tokio::select! {
				biased;
				() = sender.stopped() => return,
				line = lines.next_line() => line,
			};
			line_number += 1;

			let line = match line {
				Ok(Some(line)) => line,
				Ok(None) => return,
				Err(err) => {
					sender.fail(CacheError::TileListParse {
						line: line_number,
						reason: err.to_string(),
					});
					return;
				}
			};
			if line.trim().is_empty() {
				continue;
			}

			let tile = match format.parse_tile(&line) {
				Ok(tile) => tile,
				Err(err) => {
					sender.fail(CacheError::TileListParse {
						line: line_number,
						reason: err.to_string(),
					});
					return;
				}
			};

			if !expansion.send(&sender, tile, &maps).await {
				return;
			}
		}
	})
}
