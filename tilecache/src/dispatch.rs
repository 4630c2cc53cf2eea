//! Bounded worker pool.
//!
//! [`run_pool`] starts a fixed number of workers that share one jobs channel. A single coordinator
//! reads the tile stream, crosses every item with the target maps and hands the resulting
//! [`MapTile`]s to the workers one by one.
//!
//! The first failing job latches the pool error. Jobs already running finish, but the coordinator
//! stops handing out new ones and workers skip whatever is still queued. Whether the run ends by
//! exhaustion, failure or cancellation, the coordinator stops and drains the stream and waits for
//! every worker before it returns.

use crate::{
	operation::TileOperation,
	stream::{IntoMapTiles, TileStream},
};
use futures::future::join_all;
use std::{panic, sync::Arc};
use tilecache_core::{CacheError, ErrorLatch, MapTile};
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

/// Why the coordinator stopped feeding jobs.
#[derive(Debug, PartialEq)]
enum Feed {
	Exhausted,
	Failed,
	Canceled,
}

/// Runs `operation` for every item of `stream` crossed with `maps`, on `concurrency` workers.
///
/// Errors are returned in this order of precedence: the stream's latched error, then the first
/// job error, then [`CacheError::Canceled`] if the run was cancelled before every job ran. Jobs
/// skipped because of cancellation latch [`CacheError::Canceled`] like a failing job would.
pub async fn run_pool<T: IntoMapTiles>(
	token: &CancellationToken,
	mut stream: TileStream<T>,
	maps: &[String],
	concurrency: usize,
	operation: Arc<dyn TileOperation>,
) -> Result<(), CacheError> {
	let concurrency = concurrency.max(1);
	let (jobs, receiver) = mpsc::channel::<MapTile>(1);
	let receiver = Arc::new(Mutex::new(receiver));
	let dispatch_error = Arc::new(ErrorLatch::new());

	log::debug!("starting {concurrency} workers");
	let workers = (0..concurrency)
		.map(|id| {
			tokio::spawn(work(
				id,
				Arc::clone(&receiver),
				Arc::clone(&operation),
				Arc::clone(&dispatch_error),
				token.clone(),
			))
		})
		.collect::<Vec<_>>();
	drop(receiver);

	let outcome = feed(token, &mut stream, maps, &jobs, &dispatch_error).await;
	drop(jobs);

	if outcome != Feed::Exhausted {
		log::debug!("stopping tile generation ({outcome:?})");
		stream.abort();
	}
	let stream_result = stream.finish().await;

	for result in join_all(workers).await {
		if let Err(err) = result
			&& err.is_panic()
		{
			panic::resume_unwind(err.into_panic());
		}
	}
	log::debug!("all workers finished");

	stream_result?;
	if let Some(err) = dispatch_error.get() {
		return Err(err);
	}
	if outcome == Feed::Canceled {
		return Err(CacheError::Canceled);
	}
	Ok(())
}

async fn feed<T: IntoMapTiles>(
	token: &CancellationToken,
	stream: &mut TileStream<T>,
	maps: &[String],
	jobs: &mpsc::Sender<MapTile>,
	dispatch_error: &ErrorLatch,
) -> Feed {
	loop {
		let item = tokio::select! {
			biased;
			() = token.cancelled() => return Feed::Canceled,
			item = stream.next() => item,
		};
		let Some(item) = item else {
			return Feed::Exhausted;
		};

		for map_tile in item.into_map_tiles(maps) {
			if dispatch_error.is_set() {
				return Feed::Failed;
			}
			log::debug!("dispatching {map_tile}");
			tokio::select! {
				biased;
				() = token.cancelled() => return Feed::Canceled,
				sent = jobs.send(map_tile) => {
					if sent.is_err() {
						return Feed::Failed;
					}
				}
			}
		}
	}
}

async fn work(
	id: usize,
	jobs: Arc<Mutex<mpsc::Receiver<MapTile>>>,
	operation: Arc<dyn TileOperation>,
	dispatch_error: Arc<ErrorLatch>,
	token: CancellationToken,
) {
	let mut skipping = false;
	loop {
		let job = jobs.lock().await.recv().await;
		let Some(map_tile) = job else {
			break;
		};
		if skipping {
			continue;
		}
		if token.is_cancelled() {
			dispatch_error.set(CacheError::Canceled);
		}
		if dispatch_error.is_set() {
			log::debug!("worker {id} skipping remaining jobs");
			skipping = true;
			continue;
		}

		if let Err(err) = operation.run(token.clone(), map_tile).await {
			if !err.is_canceled() {
				log::debug!("worker {id} stopped: {err}");
			}
			dispatch_error.set(err);
			skipping = true;
		}
	}
	log::debug!("worker {id} done");
}
