//! Tile pyramid types, work items and cache addressing.

mod cache_key;
pub use cache_key::*;

mod constants;
pub use constants::*;

mod geo_bbox;
pub use geo_bbox::*;

mod map_tile;
pub use map_tile::*;

mod tile;
pub use tile::*;

mod tile_bbox;
pub use tile_bbox::*;

mod tile_name_format;
pub use tile_name_format::*;

mod zoom_range;
pub use zoom_range::*;
