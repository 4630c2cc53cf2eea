//! YAML configuration: the cache backend and the maps to maintain.

mod cache;
mod main;

pub use cache::CacheConfig;
pub use main::Config;
