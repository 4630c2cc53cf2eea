use crate::{CacheError, DEFAULT_BOUNDS};
use std::{
	fmt::{self, Display},
	str::FromStr,
};

/// A geographic bounding box in WGS84 degrees: `[west, south, east, north]`.
///
/// The corners are only range checked. Generators normalise their order, so a box given
/// as `east,north,west,south` covers the same tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBBox {
	pub x_min: f64,
	pub y_min: f64,
	pub x_max: f64,
	pub y_max: f64,
}

impl GeoBBox {
	pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Result<GeoBBox, CacheError> {
		let bbox = GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		};
		bbox.check()?;
		Ok(bbox)
	}

	fn check(&self) -> Result<(), CacheError> {
		for lon in [self.x_min, self.x_max] {
			if !(-180.0..=180.0).contains(&lon) {
				return Err(CacheError::InvalidBounds(format!(
					"longitude ({lon}) must be within [-180, 180]"
				)));
			}
		}
		for lat in [self.y_min, self.y_max] {
			if !(-90.0..=90.0).contains(&lat) {
				return Err(CacheError::InvalidBounds(format!(
					"latitude ({lat}) must be within [-90, 90]"
				)));
			}
		}
		Ok(())
	}

	/// Midpoint of the box as `[lon, lat]`.
	pub fn center(&self) -> [f64; 2] {
		[(self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0]
	}
}

impl Default for GeoBBox {
	fn default() -> Self {
		let [x_min, y_min, x_max, y_max] = DEFAULT_BOUNDS;
		GeoBBox {
			x_min,
			y_min,
			x_max,
			y_max,
		}
	}
}

impl FromStr for GeoBBox {
	type Err = CacheError;

	/// Parses `minLon,minLat,maxLon,maxLat`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let values = s
			.split(',')
			.map(|part| {
				part.trim()
					.parse::<f64>()
					.map_err(|_| CacheError::InvalidBounds(format!("({}) is not a number", part.trim())))
			})
			.collect::<Result<Vec<f64>, CacheError>>()?;

		match values.as_slice() {
			[x_min, y_min, x_max, y_max] => GeoBBox::new(*x_min, *y_min, *x_max, *y_max),
			_ => Err(CacheError::InvalidBounds(format!(
				"expected 4 comma separated values, got {}",
				values.len()
			))),
		}
	}
}

impl Display for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{},{}", self.x_min, self.y_min, self.x_max, self.y_max)
	}
}
