use crate::Tile;
use std::fmt::{self, Display};

/// Address of one cache slot.
///
/// The canonical form is the path `map/layer/z/x/y`; the layer segment is left out for whole-map tiles.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct CacheKey {
	pub map_name: String,
	pub layer_name: Option<String>,
	pub z: u8,
	pub x: u32,
	pub y: u32,
}

impl CacheKey {
	pub fn new(map_name: impl Into<String>, tile: Tile) -> CacheKey {
		CacheKey {
			map_name: map_name.into(),
			layer_name: None,
			z: tile.level,
			x: tile.x,
			y: tile.y,
		}
	}

	pub fn with_layer(mut self, layer_name: impl Into<String>) -> CacheKey {
		let layer_name = layer_name.into();
		self.layer_name = (!layer_name.is_empty()).then_some(layer_name);
		self
	}

	pub fn tile(&self) -> Tile {
		Tile {
			level: self.z,
			x: self.x,
			y: self.y,
		}
	}
}

impl Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.layer_name {
			Some(layer) => write!(f, "{}/{}/{}/{}/{}", self.map_name, layer, self.z, self.x, self.y),
			None => write!(f, "{}/{}/{}/{}", self.map_name, self.z, self.x, self.y),
		}
	}
}
