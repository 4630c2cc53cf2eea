//! Tile coordinates in a Web Mercator tile pyramid
//!
//! A [`Tile`] addresses one node of the quad-tree: zoom `level` splits the world into
//! `2^level × 2^level` tiles indexed by `x` (west to east) and `y` (north to south).
//!
//! # Examples
//!
//! ```
//! use tilecache_core::Tile;
//!
//! let tile = Tile::from_geo(13.404954, 52.520008, 10);
//! assert_eq!(tile, Tile::new(10, 550, 335).unwrap());
//!
//! // the four children one level down
//! let children: Vec<Tile> = tile.family_iter(11).collect();
//! assert_eq!(children.len(), 4);
//! ```

use crate::{CacheError, GeoBBox, MAX_LEVEL, MAX_MERCATOR_LAT};
use itertools::{Either, Itertools};
use std::{
	f64::consts::PI,
	fmt::{self, Debug, Display},
	iter,
};

/// A tile in the pyramid. Ordering is by level, then `x`, then `y`, which is the order tiles are generated in.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tile {
	pub level: u8,
	pub x: u32,
	pub y: u32,
}

/// Largest valid `x` or `y` index at `level`, `2^level - 1`.
pub fn max_index_at_level(level: u8) -> u32 {
	assert!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
	((1u64 << level) - 1) as u32
}

impl Tile {
	/// Creates a tile, rejecting indices outside the grid of `level`.
	pub fn new(level: u8, x: u32, y: u32) -> Result<Tile, CacheError> {
		if level > MAX_LEVEL {
			return Err(CacheError::InvalidTileName(format!(
				"level ({level}) must be <= {MAX_LEVEL}"
			)));
		}
		let max = max_index_at_level(level);
		if x > max || y > max {
			return Err(CacheError::InvalidTileName(format!(
				"{level}/{x}/{y} is outside of the grid, x and y must be <= {max}"
			)));
		}
		Ok(Tile { level, x, y })
	}

	/// Projects a WGS84 point onto the tile grid of `level`.
	///
	/// Latitude is clamped to the Mercator limits and the resulting indices to the grid,
	/// so every finite input lands on a valid tile.
	pub fn from_geo(lon: f64, lat: f64, level: u8) -> Tile {
		assert!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");

		let lat = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
		let zoom = 2.0f64.powi(i32::from(level));
		let x = zoom * (lon / 360.0 + 0.5);
		let y = zoom * (0.5 - 0.5 * (lat * PI / 360.0 + PI / 4.0).tan().ln() / PI);

		let clamp = |v: f64| v.min(zoom - 1.0).max(0.0).floor() as u32;
		Tile {
			level,
			x: clamp(x),
			y: clamp(y),
		}
	}

	/// Longitude and latitude of the north-west corner of grid cell `x`, `y` at `level`.
	pub fn coord_to_geo(level: u8, x: u32, y: u32) -> [f64; 2] {
		let zoom = 2.0f64.powi(i32::from(level));
		[
			(f64::from(x) / zoom - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(y) / zoom)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// Geographic extent of the tile.
	pub fn to_geo_bbox(&self) -> GeoBBox {
		let [west, north] = Tile::coord_to_geo(self.level, self.x, self.y);
		let [east, south] = Tile::coord_to_geo(self.level, self.x + 1, self.y + 1);
		GeoBBox {
			x_min: west,
			y_min: south,
			x_max: east,
			y_max: north,
		}
	}

	/// Tiles at `level` that are related to this one.
	///
	/// At or above this tile's level the single ancestor (or the tile itself) is returned.
	/// Below it, every descendant nesting inside this tile is returned, `x` ascending outer and
	/// `y` ascending inner. The sequence is lazy, so large level deltas do not allocate.
	pub fn family_iter(&self, level: u8) -> impl Iterator<Item = Tile> + Send + use<> {
		assert!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");

		if level <= self.level {
			let shift = self.level - level;
			Either::Left(iter::once(Tile {
				level,
				x: self.x >> shift,
				y: self.y >> shift,
			}))
		} else {
			let shift = level - self.level;
			let size = 1u32 << shift;
			let x0 = self.x << shift;
			let y0 = self.y << shift;
			Either::Right(
				(x0..x0 + size)
					.cartesian_product(y0..y0 + size)
					.map(move |(x, y)| Tile { level, x, y }),
			)
		}
	}
}

impl Display for Tile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.level, self.x, self.y)
	}
}

impl Debug for Tile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Tile({}, [{}, {}])", self.level, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn t(level: u8, x: u32, y: u32) -> Tile {
		Tile::new(level, x, y).unwrap()
	}

	#[test]
	fn new_validates_the_grid() {
		assert_eq!(t(5, 31, 0), Tile { level: 5, x: 31, y: 0 });
		assert!(Tile::new(5, 32, 0).is_err());
		assert!(Tile::new(5, 0, 32).is_err());
		assert!(Tile::new(32, 0, 0).is_err());
		assert!(Tile::new(31, u32::MAX >> 1, 0).is_ok());
	}

	#[rstest]
	#[case(0, 0)]
	#[case(1, 1)]
	#[case(8, 255)]
	#[case(22, 4_194_303)]
	#[case(31, 2_147_483_647)]
	fn max_index(#[case] level: u8, #[case] expected: u32) {
		assert_eq!(max_index_at_level(level), expected);
	}

	#[rstest]
	#[case(0.0, 0.0, 1, [1, 1])]
	#[case(-180.0, 85.0511, 3, [0, 0])]
	#[case(180.0, -85.0511, 3, [7, 7])]
	#[case(180.0, 90.0, 4, [15, 0])]
	#[case(-180.0, -90.0, 4, [0, 15])]
	#[case(13.404954, 52.520008, 10, [550, 335])]
	fn from_geo(#[case] lon: f64, #[case] lat: f64, #[case] level: u8, #[case] expected: [u32; 2]) {
		let tile = Tile::from_geo(lon, lat, level);
		assert_eq!([tile.x, tile.y], expected);
	}

	#[rstest]
	#[case(0)]
	#[case(1)]
	#[case(7)]
	#[case(15)]
	#[case(22)]
	fn from_geo_stays_on_the_grid(#[case] level: u8) {
		let max = max_index_at_level(level);
		for lon in [-180.0, -179.999, -0.001, 0.0, 90.0, 179.999, 180.0] {
			for lat in [-90.0, -89.9, -85.06, -85.0511, 0.0, 85.0511, 85.06, 89.9, 90.0] {
				let tile = Tile::from_geo(lon, lat, level);
				assert!(tile.x <= max && tile.y <= max, "{lon},{lat} -> {tile:?}");
			}
		}
	}

	#[test]
	fn to_geo_bbox_of_the_root() {
		let bbox = t(0, 0, 0).to_geo_bbox();
		assert_abs_diff_eq!(bbox.x_min, -180.0, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.x_max, 180.0, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_min, -MAX_MERCATOR_LAT, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_max, MAX_MERCATOR_LAT, epsilon = 1e-9);
	}

	#[test]
	fn to_geo_bbox_of_a_quadrant() {
		let bbox = t(1, 1, 0).to_geo_bbox();
		assert_abs_diff_eq!(bbox.x_min, 0.0, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.x_max, 180.0, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_min, 0.0, epsilon = 1e-9);
		assert_abs_diff_eq!(bbox.y_max, MAX_MERCATOR_LAT, epsilon = 1e-9);
	}

	#[rstest]
	#[case(t(0, 0, 0))]
	#[case(t(1, 1, 0))]
	#[case(t(3, 7, 0))]
	#[case(t(3, 0, 7))]
	#[case(t(10, 550, 335))]
	#[case(t(14, 300, 781))]
	#[case(t(22, 4_194_303, 4_194_303))]
	#[case(t(22, 2_200_000, 1_300_000))]
	fn center_of_bbox_round_trips(#[case] tile: Tile) {
		let [lon, lat] = tile.to_geo_bbox().center();
		assert_eq!(Tile::from_geo(lon, lat, tile.level), tile);
	}

	#[test]
	fn family_descendants() {
		let family: Vec<Tile> = t(8, 3, 5).family_iter(10).collect();
		let expected: Vec<Tile> = (12..16).flat_map(|x| (20..24).map(move |y| t(10, x, y))).collect();
		assert_eq!(family, expected);
	}

	#[rstest]
	#[case(t(3, 3, 5), 1, t(1, 0, 1))]
	#[case(t(3, 3, 5), 3, t(3, 3, 5))]
	#[case(t(3, 3, 5), 0, t(0, 0, 0))]
	#[case(t(14, 300, 781), 13, t(13, 150, 390))]
	fn family_ancestor(#[case] tile: Tile, #[case] level: u8, #[case] expected: Tile) {
		let family: Vec<Tile> = tile.family_iter(level).collect();
		assert_eq!(family, vec![expected]);
	}

	#[test]
	fn family_stops_when_no_longer_pulled() {
		let seen: Vec<Tile> = t(0, 0, 0).family_iter(2).take(3).collect();
		assert_eq!(seen, vec![t(2, 0, 0), t(2, 0, 1), t(2, 0, 2)]);
	}

	#[test]
	fn family_of_a_deep_delta_is_lazy() {
		let mut family = t(0, 0, 0).family_iter(31);
		assert_eq!(family.next(), Some(t(31, 0, 0)));
		assert_eq!(family.next(), Some(t(31, 0, 1)));
	}

	#[test]
	fn ordering_follows_generation_order() {
		let mut tiles = vec![t(2, 1, 0), t(1, 1, 1), t(2, 0, 3), t(2, 0, 1)];
		tiles.sort();
		assert_eq!(tiles, vec![t(1, 1, 1), t(2, 0, 1), t(2, 0, 3), t(2, 1, 0)]);
	}

	#[test]
	fn formatting() {
		assert_eq!(t(3, 1, 2).to_string(), "3/1/2");
		assert_eq!(format!("{:?}", t(3, 1, 2)), "Tile(3, [1, 2])");
	}
}
