use crate::{CacheError, MAX_ZOOM};
use std::fmt::{self, Display};

/// Zoom levels to process, ascending and without duplicates.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ZoomRange {
	levels: Vec<u8>,
}

impl ZoomRange {
	/// All levels from `min` to `max`, both inclusive.
	pub fn new(min: u8, max: u8) -> Result<ZoomRange, CacheError> {
		if min > max || max > MAX_ZOOM {
			return Err(CacheError::InvalidZoomRange { min, max });
		}
		Ok(ZoomRange {
			levels: (min..=max).collect(),
		})
	}

	pub fn as_slice(&self) -> &[u8] {
		&self.levels
	}

	pub fn is_empty(&self) -> bool {
		self.levels.is_empty()
	}

	pub fn len(&self) -> usize {
		self.levels.len()
	}

}

impl Display for ZoomRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.levels)
	}
}
