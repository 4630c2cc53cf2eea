use crate::{GeoBBox, Tile, max_index_at_level};
use itertools::Itertools;

/// An inclusive rectangle of tiles at one zoom level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileBBox {
	pub level: u8,
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileBBox {
	/// Covers `bbox` at `level`.
	///
	/// Both corners are projected, ordered low to high on each axis and clamped to the grid.
	pub fn from_geo(level: u8, bbox: &GeoBBox) -> TileBBox {
		let a = Tile::from_geo(bbox.x_min, bbox.y_min, level);
		let b = Tile::from_geo(bbox.x_max, bbox.y_max, level);
		let max = max_index_at_level(level);
		TileBBox {
			level,
			x_min: a.x.min(b.x),
			y_min: a.y.min(b.y),
			x_max: a.x.max(b.x).min(max),
			y_max: a.y.max(b.y).min(max),
		}
	}

	/// Number of tiles in the rectangle.
	pub fn count_tiles(&self) -> u64 {
		u64::from(self.x_max - self.x_min + 1) * u64::from(self.y_max - self.y_min + 1)
	}

	/// All tiles of the rectangle, `x` ascending outer and `y` ascending inner.
	pub fn iter_tiles(&self) -> impl Iterator<Item = Tile> + Send + use<> {
		let level = self.level;
		(self.x_min..=self.x_max)
			.cartesian_product(self.y_min..=self.y_max)
			.map(move |(x, y)| Tile { level, x, y })
	}
}
