use super::CacheConfig;
use crate::{
	atlas::{Atlas, Map},
	source::UpstreamSource,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
	sync::Arc,
};

/// ```yaml
/// cache:
///   type: directory
///   path: ./tiles
/// maps:
///   - name: osm
///     source: https://tiles.example.org/{map}/{z}/{x}/{y}.pbf
///     layers:
///       - name: roads
///         min_zoom: 6
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	#[serde(default)]
	pub cache: Option<CacheConfig>,

	#[serde(default)]
	pub maps: Vec<Map>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parses a config file. A relative cache directory is resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut config =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		if let (Some(cache), Some(base)) = (config.cache.as_mut(), path.parent()) {
			cache.resolve_paths(base);
		}
		Ok(config)
	}

	/// Builds the maps, their upstream source and the cache.
	pub fn build_atlas(&self) -> Result<Atlas> {
		let source = Arc::new(UpstreamSource::new()?);
		let atlas = Atlas::new(self.maps.clone(), source)?;
		Ok(match &self.cache {
			Some(cache) => atlas.with_cache(cache.build()),
			None => atlas,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::atlas::{Layer, MapRegistry};
	use pretty_assertions::assert_eq;
	use std::path::PathBuf;

	#[test]
	fn parse_example_config() {
		let config = Config::from_path(Path::new("../testdata/config.yml")).unwrap();

		assert_eq!(
			config,
			Config {
				cache: Some(CacheConfig::Directory {
					path: PathBuf::from("../testdata/tiles"),
					max_zoom: Some(18)
				}),
				maps: vec![
					Map::new("osm")
						.with_source("https://tiles.example.org/osm/{z}/{x}/{y}.pbf?layers={layers}")
						.with_layer(Layer::new("water"))
						.with_layer(Layer::new("roads").with_zooms(Some(6), None))
						.with_layer(Layer::new("buildings").with_zooms(Some(14), Some(18))),
					Map::new("satellite").with_source("https://imagery.example.org/{z}/{x}/{y}.jpg"),
				]
			}
		);
	}

	#[test]
	fn unknown_fields_are_rejected() {
		assert!(Config::from_string("mapz: []").is_err());
		assert!(Config::from_string("maps:\n  - name: osm\n    colour: red").is_err());
	}

	#[test]
	fn empty_config() {
		assert_eq!(Config::from_string("{}").unwrap(), Config::default());
	}

	#[test]
	fn missing_file() {
		let err = Config::from_path(Path::new("../testdata/does-not-exist.yml")).unwrap_err();
		assert!(err.to_string().starts_with("opening config file"));
	}

	#[test]
	fn build_atlas_with_memory_cache() {
		let config = Config::from_string("cache:\n  type: memory\nmaps:\n  - name: a\n  - name: b\n").unwrap();
		let atlas = config.build_atlas().unwrap();
		assert_eq!(atlas.map_names(), vec!["a", "b"]);
		assert!(atlas.cache().is_ok());
		assert!(atlas.get_map("a").is_ok());
	}

	#[test]
	fn build_atlas_without_cache() {
		let config = Config::from_string("maps:\n  - name: a\n").unwrap();
		assert!(config.build_atlas().unwrap().cache().is_err());
	}
}
