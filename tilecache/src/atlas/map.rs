use serde::Deserialize;

/// A layer of a map, active between its optional zoom bounds.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Layer {
	pub name: String,
	#[serde(default)]
	pub min_zoom: Option<u8>,
	#[serde(default)]
	pub max_zoom: Option<u8>,
}

impl Layer {
	pub fn new(name: impl Into<String>) -> Layer {
		Layer {
			name: name.into(),
			min_zoom: None,
			max_zoom: None,
		}
	}

	pub fn with_zooms(mut self, min_zoom: Option<u8>, max_zoom: Option<u8>) -> Layer {
		self.min_zoom = min_zoom;
		self.max_zoom = max_zoom;
		self
	}

	/// A missing bound does not limit the layer.
	pub fn is_active_at(&self, zoom: u8) -> bool {
		self.min_zoom.is_none_or(|min| min <= zoom) && self.max_zoom.is_none_or(|max| max >= zoom)
	}
}

/// A named map made of layers.
///
/// `source` is the upstream URL template tiles of this map are fetched from when seeding.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Map {
	pub name: String,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub layers: Vec<Layer>,
}

impl Map {
	pub fn new(name: impl Into<String>) -> Map {
		Map {
			name: name.into(),
			source: None,
			layers: Vec::new(),
		}
	}

	pub fn with_source(mut self, source: impl Into<String>) -> Map {
		self.source = Some(source.into());
		self
	}

	pub fn with_layer(mut self, layer: Layer) -> Map {
		self.layers.push(layer);
		self
	}

	/// A copy of the map that keeps only the layers active at `zoom`.
	pub fn filter_layers_by_zoom(&self, zoom: u8) -> Map {
		Map {
			name: self.name.clone(),
			source: self.source.clone(),
			layers: self.layers.iter().filter(|layer| layer.is_active_at(zoom)).cloned().collect(),
		}
	}

	pub fn layer_names(&self) -> Vec<&str> {
		self.layers.iter().map(|layer| layer.name.as_str()).collect()
	}
}
