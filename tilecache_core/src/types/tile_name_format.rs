//! Textual layout of tile names such as `14/300/781` or `x_y_z`.
//!
//! A format string is four characters long: the separator followed by a permutation of `z`, `x` and `y`.
//! The separator may not be a digit or one of the axis letters. `/zxy` is the slippy-map default.

use crate::{CacheError, MAX_ZOOM, Tile, max_index_at_level};
use std::{
	fmt::{self, Display},
	str::FromStr,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileNameFormat {
	separator: char,
	/// Position of the z, x and y field.
	z: usize,
	x: usize,
	y: usize,
}

impl TileNameFormat {
	pub fn new(format: &str) -> Result<TileNameFormat, CacheError> {
		let invalid = |reason: &str| CacheError::InvalidTileNameFormat(format!("{format}: {reason}"));

		let chars: Vec<char> = format.chars().collect();
		let [separator, a, b, c] = chars.as_slice() else {
			return Err(invalid("expected a separator followed by z, x and y"));
		};
		if separator.is_ascii_digit() || "zxy".contains(*separator) {
			return Err(invalid("separator must not be a digit, z, x or y"));
		}

		let fields = [*a, *b, *c];
		let position = |axis: char| -> Result<usize, CacheError> {
			match fields.iter().filter(|&&f| f == axis).count() {
				1 => Ok(fields.iter().position(|&f| f == axis).unwrap_or_default()),
				_ => Err(invalid("z, x and y must each appear exactly once")),
			}
		};

		Ok(TileNameFormat {
			separator: *separator,
			z: position('z')?,
			x: position('x')?,
			y: position('y')?,
		})
	}

	/// Parses one tile name. Surrounding whitespace is ignored.
	pub fn parse_tile(&self, name: &str) -> Result<Tile, CacheError> {
		let name = name.trim();
		let invalid = |reason: String| CacheError::InvalidTileName(format!("{name}: {reason}"));

		let parts: Vec<&str> = name.split(self.separator).collect();
		if parts.len() != 3 {
			return Err(invalid(format!(
				"expected 3 fields separated by '{}', found {}",
				self.separator,
				parts.len()
			)));
		}

		let number = |index: usize, axis: char| -> Result<u32, CacheError> {
			parts[index]
				.parse::<u32>()
				.map_err(|_| invalid(format!("{axis} ({}) is not a valid number", parts[index])))
		};
		let z = number(self.z, 'z')?;
		let x = number(self.x, 'x')?;
		let y = number(self.y, 'y')?;

		if z > u32::from(MAX_ZOOM) {
			return Err(invalid(format!("z ({z}) must be <= {MAX_ZOOM}")));
		}
		let level = z as u8;
		let max = max_index_at_level(level);
		if x > max {
			return Err(invalid(format!("x ({x}) must be <= {max} at zoom {z}")));
		}
		if y > max {
			return Err(invalid(format!("y ({y}) must be <= {max} at zoom {z}")));
		}
		Tile::new(level, x, y)
	}
}

impl Default for TileNameFormat {
	fn default() -> Self {
		TileNameFormat {
			separator: '/',
			z: 0,
			x: 1,
			y: 2,
		}
	}
}

impl FromStr for TileNameFormat {
	type Err = CacheError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		TileNameFormat::new(s)
	}
}

impl Display for TileNameFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut order = [' '; 3];
		order[self.z] = 'z';
		order[self.x] = 'x';
		order[self.y] = 'y';
		write!(f, "{}{}{}{}", self.separator, order[0], order[1], order[2])
	}
}
