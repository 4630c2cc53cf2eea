use super::TileSender;
use tilecache_core::{MapTile, Tile, ZoomRange};

/// How a named tile becomes the tiles to process.
///
/// An explicit expansion, or one without zoom levels, processes the named tile itself. Otherwise
/// the tile's family is processed at every zoom level: its ancestor at lower levels and all of its
/// descendants at higher ones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TileExpansion {
	pub explicit: bool,
	pub zooms: ZoomRange,
}

impl TileExpansion {
	pub fn explicit() -> TileExpansion {
		TileExpansion {
			explicit: true,
			zooms: ZoomRange::default(),
		}
	}

	pub fn across(zooms: ZoomRange) -> TileExpansion {
		TileExpansion { explicit: false, zooms }
	}

	pub fn is_explicit(&self) -> bool {
		self.explicit || self.zooms.is_empty()
	}

	/// Sends the expansion of `tile`, each resulting tile once per map. Returns `false` if the stream has to stop.
	pub(crate) async fn send(&self, sender: &TileSender<MapTile>, tile: Tile, maps: &[String]) -> bool {
		if self.is_explicit() {
			return sender.send_for_maps(tile, maps).await;
		}
		for &level in self.zooms.as_slice() {
			for member in tile.family_iter(level) {
				if !sender.send_for_maps(member, maps).await {
					return false;
				}
			}
		}
		true
	}
}

/// Turns one generated item into work items for the target maps.
///
/// Bare tiles are crossed with every map. Map tiles already name their map and pass through unchanged.
pub trait IntoMapTiles: Send + 'static {
	fn into_map_tiles(self, maps: &[String]) -> Vec<MapTile>;
}

impl IntoMapTiles for Tile {
	fn into_map_tiles(self, maps: &[String]) -> Vec<MapTile> {
		maps.iter().map(|name| MapTile::new(name.as_str(), self)).collect()
	}
}

impl IntoMapTiles for MapTile {
	fn into_map_tiles(self, _maps: &[String]) -> Vec<MapTile> {
		vec![self]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn explicit_when_asked_or_without_zooms() {
		assert!(TileExpansion::explicit().is_explicit());
		assert!(TileExpansion::default().is_explicit());
		assert!(!TileExpansion::across(ZoomRange::new(3, 4).unwrap()).is_explicit());
	}

	#[test]
	fn tiles_are_crossed_with_maps() {
		let tile = Tile::new(2, 1, 3).unwrap();
		let maps = vec!["osm".to_string(), "satellite".to_string()];
		assert_eq!(
			tile.into_map_tiles(&maps),
			vec![MapTile::new("osm", tile), MapTile::new("satellite", tile)]
		);
		assert!(tile.into_map_tiles(&[]).is_empty());
	}

	#[test]
	fn map_tiles_pass_through() {
		let item = MapTile::new("osm", Tile::new(0, 0, 0).unwrap());
		let maps = vec!["a".to_string(), "b".to_string()];
		assert_eq!(item.clone().into_map_tiles(&maps), vec![item]);
	}
}
