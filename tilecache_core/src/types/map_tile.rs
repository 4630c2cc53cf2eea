use crate::Tile;
use std::fmt::{self, Display};

/// One unit of work: apply an operation to `tile` of the map called `map_name`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MapTile {
	pub map_name: String,
	pub tile: Tile,
}

impl MapTile {
	pub fn new(map_name: impl Into<String>, tile: Tile) -> MapTile {
		MapTile {
			map_name: map_name.into(),
			tile,
		}
	}
}

impl Display for MapTile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "map ({}) tile ({})", self.map_name, self.tile)
	}
}
