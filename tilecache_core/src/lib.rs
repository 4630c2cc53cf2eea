//! Core building blocks for maintaining map tile caches.
//!
//! This crate holds the pieces that do not need an async runtime:
//! - tile pyramid math ([`Tile`], [`TileBBox`], [`GeoBBox`], [`ZoomRange`])
//! - the work item passed to cache workers ([`MapTile`]) and the cache addressing scheme ([`CacheKey`])
//! - the configurable tile-name grammar used by tile lists ([`TileNameFormat`])
//! - the shared error type ([`CacheError`]) and the first-error-wins [`ErrorLatch`]

mod error;
pub use error::*;

mod latch;
pub use latch::*;

pub mod types;
pub use types::*;
