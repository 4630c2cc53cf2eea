/// Highest zoom level a [`Tile`](crate::Tile) can address with `u32` indices.
pub const MAX_LEVEL: u8 = 31;

/// Highest zoom level accepted from tile names, tile lists and the command line.
pub const MAX_ZOOM: u8 = 22;

/// Latitude at which the Web Mercator projection turns the world into a square.
pub const MAX_MERCATOR_LAT: f64 = 85.051_128_779_806_59;

/// Bounds used when a run does not name its own.
pub const DEFAULT_BOUNDS: [f64; 4] = [-180.0, -85.0511, 180.0, 85.0511];
