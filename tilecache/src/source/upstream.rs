//! Fetches tiles from an upstream tile server.
//!
//! Every map names a URL template in its `source`. The placeholders `{map}`, `{z}`, `{x}`, `{y}` and
//! `{layers}` (comma separated active layer names) are replaced per tile, for example
//! `https://tiles.example.org/{map}/{z}/{x}/{y}.pbf?layers={layers}`.

use super::TileSource;
use crate::atlas::Map;
use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tilecache_core::Tile;
use tokio::time::sleep;

const MAX_RETRIES: u32 = 3;

fn is_retryable_error(err: &reqwest::Error) -> bool {
	err.is_connect() || err.is_timeout() || err.is_body()
}

fn is_retryable_status(status: StatusCode) -> bool {
	status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

#[derive(Debug)]
pub struct UpstreamSource {
	client: Client,
}

impl UpstreamSource {
	pub fn new() -> Result<UpstreamSource> {
		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.timeout(Duration::from_secs(60))
			.build()?;
		Ok(UpstreamSource { client })
	}

	/// The URL of `tile` for `map`, built from the map's source template.
	pub fn tile_url(map: &Map, tile: Tile) -> Result<String> {
		let template = map
			.source
			.as_deref()
			.ok_or_else(|| anyhow!("map ({}) has no source to seed from", map.name))?;

		Ok(template
			.replace("{map}", &map.name)
			.replace("{z}", &tile.level.to_string())
			.replace("{x}", &tile.x.to_string())
			.replace("{y}", &tile.y.to_string())
			.replace("{layers}", &map.layer_names().join(",")))
	}
}

#[async_trait]
impl TileSource for UpstreamSource {
	async fn fetch_tile(&self, map: &Map, tile: Tile) -> Result<Vec<u8>> {
		let url = UpstreamSource::tile_url(map, tile)?;

		for attempt in 0..=MAX_RETRIES {
			if attempt > 0 {
				let backoff = Duration::from_secs(1 << (attempt - 1));
				log::warn!("retry attempt {attempt}/{MAX_RETRIES} fetching '{url}', waiting {backoff:?}");
				sleep(backoff).await;
			}

			let response = match self.client.get(&url).send().await {
				Ok(r) => r,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error: {e}");
					continue;
				}
				Err(e) => return Err(anyhow!(e).context(format!("fetching '{url}'"))),
			};

			let status = response.status();
			if is_retryable_status(status) && attempt < MAX_RETRIES {
				log::warn!("upstream answered {status} for '{url}'");
				continue;
			}
			if !status.is_success() {
				bail!("fetching '{url}' failed with HTTP status {status}");
			}

			let bytes = match response.bytes().await {
				Ok(b) => b,
				Err(e) if is_retryable_error(&e) && attempt < MAX_RETRIES => {
					log::warn!("retryable error reading response body: {e}");
					continue;
				}
				Err(e) => return Err(anyhow!(e).context(format!("reading body of '{url}'"))),
			};

			return Ok(bytes.to_vec());
		}

		bail!("fetching '{url}' failed after {MAX_RETRIES} retries")
	}
}
