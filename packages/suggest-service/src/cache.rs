use std::{
	collections::HashMap,
	sync::{Arc, RwLock},
};

use suggest_domain::{Identity, ProfileRecord};

/// Identity to profile snapshot map. Storage only; admission and eviction policy live with the
/// hop stream consumer.
#[derive(Debug, Default)]
pub struct ProfileCache {
	entries: HashMap<Identity, ProfileRecord>,
}
impl ProfileCache {
	pub fn get(&self, id: &Identity) -> Option<&ProfileRecord> {
		self.entries.get(id)
	}

	/// Inserts or overwrites the entry keyed by `record.id`, returning the replaced record.
	pub fn upsert(&mut self, record: ProfileRecord) -> Option<ProfileRecord> {
		self.entries.insert(record.id.clone(), record)
	}

	pub fn remove(&mut self, id: &Identity) -> Option<ProfileRecord> {
		self.entries.remove(id)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &ProfileRecord> {
		self.entries.values()
	}
}

/// The cache plus the generation allowed to write it. Both change under the same write lock, so
/// a writer that observes its own generation cannot race a restart.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
	pub(crate) generation: u64,
	pub(crate) cache: ProfileCache,
}

pub(crate) type SharedCache = Arc<RwLock<CacheState>>;

#[cfg(test)]
mod tests {
	use super::ProfileCache;
	use suggest_domain::{Identity, ProfileRecord};

	fn record(id: &str, name: &str, latest: i64) -> ProfileRecord {
		ProfileRecord {
			id: Identity::from(id),
			name: Some(name.to_string()),
			image: None,
			latest,
		}
	}

	#[test]
	fn upsert_overwrites_existing_entry() {
		let mut cache = ProfileCache::default();

		assert!(cache.upsert(record("a", "alice", 1)).is_none());

		let replaced = cache.upsert(record("a", "alicia", 2)).expect("Expected a replaced entry.");

		assert_eq!(replaced.name.as_deref(), Some("alice"));
		assert_eq!(cache.len(), 1);
		assert_eq!(
			cache.get(&Identity::from("a")).and_then(|entry| entry.name.as_deref()),
			Some("alicia")
		);
	}

	#[test]
	fn remove_and_clear_drop_entries() {
		let mut cache = ProfileCache::default();

		cache.upsert(record("a", "alice", 1));
		cache.upsert(record("b", "bob", 1));

		assert!(cache.remove(&Identity::from("a")).is_some());
		assert!(cache.remove(&Identity::from("a")).is_none());
		assert_eq!(cache.iter().count(), 1);

		cache.clear();

		assert!(cache.is_empty());
	}
}
