use crate::player::Player;
use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identity of the tick notification. Observers are registered for it and the time source names the
/// tick interval after it.
pub const TICK_NOTIFICATION: &str = "player-tick";

pub type TickCallback = Arc<dyn Fn(&Player) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into)]
pub struct ObserverId(u64);

#[derive(Default)]
pub struct TickObservers {
	next_id: u64,
	callbacks: BTreeMap<ObserverId, TickCallback>,
}

impl TickObservers {
	pub fn register(&mut self, callback: TickCallback) -> ObserverId {
		let id = ObserverId(self.next_id);
		self.next_id += 1;

		if self.callbacks.insert(id, callback).is_some() {
			unreachable!("There must never be two observers with the same id!");
		}
		id
	}

	/// Returns `false` if there was no observer with this id.
	pub fn remove(&mut self, id: ObserverId) -> bool {
		self.callbacks.remove(&id).is_some()
	}

	/// Callbacks in registration order. Cloned so they can be called without holding any lock.
	pub fn callbacks(&self) -> Vec<TickCallback> {
		self.callbacks.values().cloned().collect()
	}

	#[cfg(test)]
	pub fn len(&self) -> usize {
		self.callbacks.len()
	}

	#[cfg(test)]
	pub fn is_empty(&self) -> bool {
		self.callbacks.is_empty()
	}
}
