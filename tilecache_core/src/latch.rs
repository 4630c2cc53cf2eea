use crate::CacheError;
use parking_lot::Mutex;

/// A cell that keeps the first error stored into it.
///
/// Writers race with [`ErrorLatch::set`]; later writes are ignored. Readers get a clone.
#[derive(Debug, Default)]
pub struct ErrorLatch {
	slot: Mutex<Option<CacheError>>,
}

impl ErrorLatch {
	pub fn new() -> ErrorLatch {
		ErrorLatch::default()
	}

	/// Stores `err` if the latch is still empty. Returns `true` if this call set it.
	pub fn set(&self, err: CacheError) -> bool {
		let mut slot = self.slot.lock();
		if slot.is_some() {
			return false;
		}
		*slot = Some(err);
		true
	}

	pub fn get(&self) -> Option<CacheError> {
		self.slot.lock().clone()
	}

	pub fn is_set(&self) -> bool {
		self.slot.lock().is_some()
	}
}
