//! Cancellable tile streams.
//!
//! A [`TileStream`] is the receiving end of a generator task. The generator owns a [`TileSender`]
//! and is the only writer of the stream's [`ErrorLatch`]. The latch may be read at any time, but it
//! is only final once the channel has been observed closed, which [`TileStream::finish`] does.
//!
//! Every send races the run's `CancellationToken`, so a generator never blocks forever on a
//! consumer that went away. A consumer that stops early must keep reading until the channel
//! closes ([`TileStream::drain`]) so the generator task can exit.

mod bounds;
mod expand;
mod single_tile;
mod tile_list;

pub use bounds::from_bounds;
pub use expand::{IntoMapTiles, TileExpansion};
pub use single_tile::from_single_tile;
pub use tile_list::from_tile_list;

use std::{panic, sync::Arc};
use tilecache_core::{CacheError, ErrorLatch, MapTile, Tile};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

/// Receiving half of a generator.
#[derive(Debug)]
pub struct TileStream<T> {
	receiver: mpsc::Receiver<T>,
	error: Arc<ErrorLatch>,
	stop: CancellationToken,
	producer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> TileStream<T> {
	/// Spawns `produce` as the generator task of a new stream.
	///
	/// The channel has a capacity of one item, so the generator runs at most one tile ahead of its consumer.
	pub fn spawn<F, Fut>(token: &CancellationToken, produce: F) -> TileStream<T>
	where
		F: FnOnce(TileSender<T>) -> Fut,
		Fut: Future<Output = ()> + Send + 'static,
	{
		let (sender, receiver) = mpsc::channel(1);
		let error = Arc::new(ErrorLatch::new());
		let stop = token.child_token();

		let producer = tokio::spawn(produce(TileSender {
			sender,
			error: Arc::clone(&error),
			token: token.clone(),
			stop: stop.clone(),
		}));

		TileStream {
			receiver,
			error,
			stop,
			producer: Some(producer),
		}
	}
}

impl<T> TileStream<T> {
	/// Next generated item, or `None` once the generator has closed the channel.
	pub async fn next(&mut self) -> Option<T> {
		self.receiver.recv().await
	}

	/// Asks the generator to stop at its next send. Unlike cancelling the run, this does not latch an error.
	pub fn abort(&self) {
		self.stop.cancel();
	}

	/// Reads and discards items until the generator closes the channel. Returns how many were discarded.
	pub async fn drain(&mut self) -> usize {
		let mut count = 0;
		while self.receiver.recv().await.is_some() {
			count += 1;
		}
		count
	}

	/// The latched generator error, if any.
	pub fn error(&self) -> Option<CacheError> {
		self.error.get()
	}

	/// Drains the stream, waits for the generator task and returns its latched error.
	pub async fn finish(mut self) -> Result<(), CacheError> {
		let skipped = self.drain().await;
		if skipped > 0 {
			log::debug!("discarded {skipped} tiles while closing the stream");
		}
		if let Some(producer) = self.producer.take()
			&& let Err(err) = producer.await
			&& err.is_panic()
		{
			panic::resume_unwind(err.into_panic());
		}
		match self.error.get() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}

	/// Collects the whole stream.
	pub async fn to_vec(mut self) -> Result<Vec<T>, CacheError> {
		let mut items = Vec::new();
		while let Some(item) = self.next().await {
			items.push(item);
		}
		self.finish().await?;
		Ok(items)
	}
}

impl<T> Drop for TileStream<T> {
	fn drop(&mut self) {
		self.stop.cancel();
	}
}

/// Sending half of a generator.
#[derive(Debug)]
pub struct TileSender<T> {
	sender: mpsc::Sender<T>,
	error: Arc<ErrorLatch>,
	token: CancellationToken,
	stop: CancellationToken,
}

impl<T> TileSender<T> {
	/// Sends one item, racing cancellation.
	///
	/// Returns `false` when the generator has to stop: the run was cancelled (latches
	/// [`CacheError::Canceled`]), the stream was aborted, or the consumer is gone.
	pub async fn send(&self, item: T) -> bool {
		tokio::select! {
			biased;
			() = self.stop.cancelled() => {
				self.record_stop();
				false
			}
			result = self.sender.send(item) => result.is_ok(),
		}
	}

	/// Resolves once the generator has to stop. Use it to race blocking reads.
	pub async fn stopped(&self) {
		self.stop.cancelled().await;
		self.record_stop();
	}

	/// Latches `err` as the stream's error. The generator should return right after.
	pub fn fail(&self, err: CacheError) {
		self.error.set(err);
	}

	fn record_stop(&self) {
		if self.token.is_cancelled() {
			self.error.set(CacheError::Canceled);
		}
	}
}

impl TileSender<MapTile> {
	/// Sends `tile` once for every map, in map order.
	pub async fn send_for_maps(&self, tile: Tile, maps: &[String]) -> bool {
		for map_name in maps {
			if !self.send(MapTile::new(map_name.as_str(), tile)).await {
				return false;
			}
		}
		true
	}
}
