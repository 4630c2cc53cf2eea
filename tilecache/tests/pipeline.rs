use anyhow::Result;
use async_trait::async_trait;
use std::{
	io::Cursor,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};
use tilecache::{
	atlas::{Atlas, Layer, Map},
	cache::{DirectoryCache, MemoryCache, TileCache},
	dispatch::run_pool,
	operation::{PurgeOperation, SeedOperation, TileOperation},
	source::TileSource,
	stream::{TileExpansion, from_bounds, from_single_tile, from_tile_list},
};
use tilecache_core::{CacheError, CacheKey, GeoBBox, Tile, TileNameFormat, ZoomRange};
use tokio::{io::BufReader, time::sleep};
use tokio_util::sync::CancellationToken;

/// Answers every tile with its name and counts the requests.
#[derive(Debug, Default)]
struct CountingSource {
	fetches: AtomicUsize,
	delay: Option<Duration>,
}

#[async_trait]
impl TileSource for CountingSource {
	async fn fetch_tile(&self, map: &Map, tile: Tile) -> Result<Vec<u8>> {
		self.fetches.fetch_add(1, Ordering::SeqCst);
		if let Some(delay) = self.delay {
			sleep(delay).await;
		}
		Ok(format!("{}/{tile}", map.name).into_bytes())
	}
}

fn maps() -> Vec<Map> {
	vec![
		Map::new("osm").with_layer(Layer::new("roads")),
		Map::new("topo").with_layer(Layer::new("contours").with_zooms(Some(1), None)),
	]
}

fn names(atlas: &Atlas) -> Vec<String> {
	atlas.map_names()
}

fn setup(cache: Arc<dyn TileCache>, source: Arc<CountingSource>) -> Arc<Atlas> {
	Arc::new(Atlas::new(maps(), source).unwrap().with_cache(cache))
}

fn seed(atlas: &Arc<Atlas>, overwrite: bool) -> Arc<dyn TileOperation> {
	Arc::new(SeedOperation::from_atlas(atlas, overwrite).unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seed_bounds_then_skip_then_purge() {
	let cache = Arc::new(MemoryCache::default());
	let source = Arc::new(CountingSource::default());
	let atlas = setup(cache.clone(), source.clone());
	let token = CancellationToken::new();
	let zooms = ZoomRange::new(0, 2).unwrap();

	let stream = from_bounds(&token, GeoBBox::default(), &zooms);
	run_pool(&token, stream, &names(&atlas), 4, seed(&atlas, false))
		.await
		.unwrap();
	assert_eq!(cache.len(), 21 * 2);
	assert_eq!(source.fetches.load(Ordering::SeqCst), 21 * 2);
	assert_eq!(
		cache.get(&CacheKey::new("topo", Tile::new(2, 3, 1).unwrap())).await.unwrap(),
		Some(b"topo/2/3/1".to_vec())
	);

	let stream = from_bounds(&token, GeoBBox::default(), &zooms);
	run_pool(&token, stream, &names(&atlas), 4, seed(&atlas, false))
		.await
		.unwrap();
	assert_eq!(source.fetches.load(Ordering::SeqCst), 21 * 2);

	let stream = from_bounds(&token, GeoBBox::default(), &zooms);
	run_pool(&token, stream, &names(&atlas), 4, seed(&atlas, true))
		.await
		.unwrap();
	assert_eq!(source.fetches.load(Ordering::SeqCst), 21 * 4);

	let purge: Arc<dyn TileOperation> = Arc::new(PurgeOperation::from_atlas(&atlas).unwrap());
	let stream = from_bounds(&token, GeoBBox::default(), &ZoomRange::new(1, 2).unwrap());
	run_pool(&token, stream, &["osm".to_string()], 4, purge).await.unwrap();
	assert_eq!(cache.len(), 1 + 21);
	assert!(cache.contains(&CacheKey::new("osm", Tile::new(0, 0, 0).unwrap())));
	assert!(!cache.contains(&CacheKey::new("osm", Tile::new(2, 3, 3).unwrap())));
	assert!(cache.contains(&CacheKey::new("topo", Tile::new(2, 3, 3).unwrap())));
}

#[tokio::test]
async fn tile_list_into_a_directory_cache() {
	let dir = tempfile::tempdir().unwrap();
	let cache = Arc::new(DirectoryCache::new(dir.path(), None));
	let source = Arc::new(CountingSource::default());
	let atlas = setup(cache, source.clone());
	let token = CancellationToken::new();

	let list = BufReader::new(Cursor::new(b"14/300/781\n".to_vec()));
	let stream = from_tile_list(
		&token,
		list,
		TileNameFormat::default(),
		TileExpansion::across(ZoomRange::new(13, 15).unwrap()),
		vec!["osm".to_string()],
	);
	run_pool(&token, stream, &names(&atlas), 2, seed(&atlas, false))
		.await
		.unwrap();

	assert_eq!(source.fetches.load(Ordering::SeqCst), 6);
	for path in ["osm/13/150/390", "osm/14/300/781", "osm/15/600/1562", "osm/15/601/1563"] {
		assert!(dir.path().join(path).is_file(), "{path} was not written");
	}
	assert!(!dir.path().join("topo").exists());
}

#[tokio::test]
async fn broken_tile_list_fails_the_run() {
	let cache = Arc::new(MemoryCache::default());
	let atlas = setup(cache.clone(), Arc::new(CountingSource::default()));
	let token = CancellationToken::new();

	let list = BufReader::new(Cursor::new(b"1/0/0\n1/0/9\n1/1/1\n".to_vec()));
	let stream = from_tile_list(
		&token,
		list,
		TileNameFormat::default(),
		TileExpansion::explicit(),
		vec!["osm".to_string()],
	);
	let err = run_pool(&token, stream, &names(&atlas), 2, seed(&atlas, false))
		.await
		.unwrap_err();

	assert!(matches!(err, CacheError::TileListParse { line: 2, .. }), "{err}");
	assert!(!cache.contains(&CacheKey::new("osm", Tile::new(1, 1, 1).unwrap())));
}

#[tokio::test]
async fn unknown_map_is_reported_per_tile() {
	let atlas = setup(Arc::new(MemoryCache::default()), Arc::new(CountingSource::default()));
	let token = CancellationToken::new();
	let stream = from_single_tile(
		&token,
		Tile::new(2, 1, 1).unwrap(),
		TileExpansion::explicit(),
		vec!["ghost".to_string()],
	)
	.unwrap();

	let err = run_pool(&token, stream, &[], 1, seed(&atlas, false)).await.unwrap_err();
	assert_eq!(err.to_string(), "error seeding tile (2/1/1): map (ghost) not found");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn cancelling_a_slow_seed() {
	let cache = Arc::new(MemoryCache::default());
	let source = Arc::new(CountingSource {
		delay: Some(Duration::from_secs(30)),
		..CountingSource::default()
	});
	let atlas = setup(cache.clone(), source);
	let token = CancellationToken::new();

	let canceller = {
		let token = token.clone();
		tokio::spawn(async move {
			sleep(Duration::from_millis(100)).await;
			token.cancel();
		})
	};

	let stream = from_bounds(&token, GeoBBox::default(), &ZoomRange::new(0, 10).unwrap());
	let result = tokio::time::timeout(
		Duration::from_secs(5),
		run_pool(&token, stream, &names(&atlas), 4, seed(&atlas, false)),
	)
	.await
	.expect("seeding did not stop after cancellation");

	canceller.await.unwrap();
	assert_eq!(result, Err(CacheError::Canceled));
	assert!(cache.is_empty());
}
