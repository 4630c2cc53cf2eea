//! Seed and purge map tile caches.
//!
//! A run is a pipeline of three stages:
//! 1. a generator in [`stream`] produces tiles (from bounds, a tile list or a single tile) on a [`stream::TileStream`],
//! 2. [`dispatch::run_pool`] fans the tiles, crossed with the target maps, out to a fixed pool of workers,
//! 3. every worker applies a [`operation::TileOperation`], usually [`operation::SeedOperation`] or
//!    [`operation::PurgeOperation`], which talk to an [`atlas::Atlas`] and its [`cache::TileCache`].
//!
//! All stages share one `CancellationToken`. Cancelling it stops the generator, the dispatcher and
//! the operations, and `run_pool` still waits for every task it started.

pub mod atlas;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod operation;
pub mod source;
pub mod stream;

pub use tilecache_core as core;
