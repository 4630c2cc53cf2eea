//! Error type shared by tile generators, the dispatcher and the cache operations.

use crate::{MAX_ZOOM, Tile};
use thiserror::Error;

/// Every failure a cache run can report.
///
/// The type is `Clone` so it can be latched once and handed out to several readers.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CacheError {
	#[error("invalid bounds ({0})")]
	InvalidBounds(String),

	#[error("invalid zoom range ({min}..={max}): min must not exceed max and max must not exceed {limit}", limit = MAX_ZOOM)]
	InvalidZoomRange { min: u8, max: u8 },

	#[error("invalid tile name ({0})")]
	InvalidTileName(String),

	#[error("invalid tile name format ({0})")]
	InvalidTileNameFormat(String),

	#[error("failed to parse tile list line [{line}]: {reason}")]
	TileListParse { line: usize, reason: String },

	#[error("map ({0}) not found")]
	UnknownMap(String),

	#[error("expected at least one map to be defined, check your config")]
	NoMaps,

	#[error("no cache backend is configured")]
	MissingCache,

	#[error("cache failure: {0}")]
	CacheIo(String),

	#[error("render failure: {0}")]
	Render(String),

	#[error("error {verb} tile ({tile}): {source}", verb = operation_verb(.purge))]
	WorkerTile {
		purge: bool,
		tile: Tile,
		source: Box<CacheError>,
	},

	#[error("operation canceled")]
	Canceled,
}

fn operation_verb(purge: &bool) -> &'static str {
	if *purge { "purging" } else { "seeding" }
}

impl CacheError {
	/// Wraps a failure of a single seed (`purge == false`) or purge tile job.
	pub fn worker_tile(purge: bool, tile: Tile, source: CacheError) -> CacheError {
		CacheError::WorkerTile {
			purge,
			tile,
			source: Box::new(source),
		}
	}

	/// `true` if this error only reports a cancellation.
	pub fn is_canceled(&self) -> bool {
		matches!(self, CacheError::Canceled)
	}

	/// `true` if an `anyhow` error coming from a collaborator carries [`CacheError::Canceled`].
	pub fn is_canceled_error(err: &anyhow::Error) -> bool {
		err.chain()
			.any(|cause| cause.downcast_ref::<CacheError>().is_some_and(CacheError::is_canceled))
	}
}
