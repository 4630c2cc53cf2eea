//! Per-tile operations run by the dispatcher's workers.

mod purge;
mod seed;

pub use purge::PurgeOperation;
pub use seed::SeedOperation;

use async_trait::async_trait;
use std::fmt::{self, Display};
use tilecache_core::{CacheError, MapTile};
use tokio_util::sync::CancellationToken;

/// Work applied to one [`MapTile`].
///
/// Returning [`CacheError::Canceled`] signals a clean shutdown, any other error fails the run.
#[async_trait]
pub trait TileOperation: Send + Sync {
	async fn run(&self, token: CancellationToken, map_tile: MapTile) -> Result<(), CacheError>;
}

#[async_trait]
impl<F, Fut> TileOperation for F
where
	F: Fn(CancellationToken, MapTile) -> Fut + Send + Sync,
	Fut: Future<Output = Result<(), CacheError>> + Send,
{
	async fn run(&self, token: CancellationToken, map_tile: MapTile) -> Result<(), CacheError> {
		self(token, map_tile).await
	}
}

/// Which cache command a run performs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OperationKind {
	Seed,
	Purge,
}

impl Display for OperationKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			OperationKind::Seed => "seed",
			OperationKind::Purge => "purge",
		})
	}
}
