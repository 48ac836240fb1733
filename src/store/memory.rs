//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, StoreError, StoreKey},
};

/// Storage backend that keeps entries in-process; lost when the process exits.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<HashMap<StoreKey, String>>>);
impl MemoryStore {
	/// Returns `true` when no entry is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns a copy of every stored entry.
	pub fn snapshot(&self) -> BTreeMap<StoreKey, String> {
		self.0.read().iter().map(|(k, v)| (*k, v.clone())).collect()
	}
}
impl SessionStore for MemoryStore {
	fn get(&self, key: StoreKey) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(&key).cloned())
	}

	fn set(&self, key: StoreKey, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(key, value.to_owned());

		Ok(())
	}

	fn remove(&self, key: StoreKey) -> Result<(), StoreError> {
		self.0.write().remove(&key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn set_get_remove() {
		let store = MemoryStore::default();

		store.set(StoreKey::AccessToken, "T1").expect("Memory store writes cannot fail.");

		assert_eq!(
			store.get(StoreKey::AccessToken).expect("Memory store reads cannot fail."),
			Some("T1".into())
		);

		store.remove(StoreKey::AccessToken).expect("Removing an entry should succeed.");
		store.remove(StoreKey::AccessToken).expect("Removing a missing entry should succeed.");

		assert!(store.is_empty());
	}
}
