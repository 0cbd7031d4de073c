//! In-process collaborators backed by maps and channels.
//!
//! [`MemoryHost`] implements every capability the service consumes, for embedders that keep
//! their social graph in memory, for fixture replays, and for tests.

use std::{
	collections::{HashMap, HashSet},
	sync::{
		Arc, Mutex, RwLock,
		atomic::{AtomicBool, Ordering},
	},
};

use color_eyre::eyre;
use tokio::sync::{mpsc, watch};

use crate::{
	AboutProfile, ActivityIndex, BoxFuture, Collaborators, HopEvent, HopSnapshot, HopStream,
	HopSubscription, ProfileIndex, ShutdownHook, ShutdownHooks,
};
use suggest_domain::{ActivityRecord, Identity};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexStatus {
	Drained,
	Indexing,
	Failed(String),
}

#[derive(Default)]
pub struct MemoryHost {
	absent: AtomicBool,
	profiles: RwLock<HashMap<Identity, AboutProfile>>,
	failing: RwLock<HashSet<Identity>>,
	activity: RwLock<HashMap<Identity, ActivityRecord>>,
	indexes: Mutex<HashMap<String, watch::Sender<IndexStatus>>>,
	feed: Mutex<HopFeed>,
	hooks: Mutex<Vec<ShutdownHook>>,
}

#[derive(Default)]
struct HopFeed {
	known: HopSnapshot,
	subscribers: Vec<mpsc::UnboundedSender<HopEvent>>,
	opened: usize,
}

impl MemoryHost {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn collaborators(self: &Arc<Self>) -> Collaborators {
		Collaborators {
			hops: self.clone(),
			profiles: self.clone(),
			activity: self.clone(),
		}
	}

	/// Simulates a host without the profile index plugin.
	pub fn set_present(&self, present: bool) {
		self.absent.store(!present, Ordering::SeqCst);
	}

	pub fn set_profile(&self, id: impl Into<Identity>, profile: AboutProfile) {
		let mut profiles = self.profiles.write().unwrap_or_else(|err| err.into_inner());

		profiles.insert(id.into(), profile);
	}

	/// Makes every later lookup of `id` fail.
	pub fn fail_profile(&self, id: impl Into<Identity>) {
		let mut failing = self.failing.write().unwrap_or_else(|err| err.into_inner());

		failing.insert(id.into());
	}

	pub fn set_activity(&self, id: impl Into<Identity>, record: ActivityRecord) {
		let mut activity = self.activity.write().unwrap_or_else(|err| err.into_inner());

		activity.insert(id.into(), record);
	}

	/// Indexes are drained unless told otherwise.
	pub fn set_index_status(&self, index: &str, status: IndexStatus) {
		let mut indexes = self.indexes.lock().unwrap_or_else(|err| err.into_inner());

		indexes
			.entry(index.to_string())
			.or_insert_with(|| watch::channel(IndexStatus::Drained).0)
			.send_replace(status);
	}

	/// Merges `snapshot` into the known state and delivers it to live subscribers.
	pub fn publish(&self, snapshot: HopSnapshot) {
		let mut feed = self.lock_feed();

		feed.known.extend(snapshot.iter().map(|(id, hops)| (id.clone(), *hops)));
		feed.broadcast(HopEvent::Snapshot(snapshot));
	}

	pub fn publish_sync(&self) {
		self.lock_feed().broadcast(HopEvent::Synced);
	}

	/// Subscriptions whose receiving end is still alive.
	pub fn live_subscriptions(&self) -> usize {
		self.lock_feed().subscribers.iter().filter(|sender| !sender.is_closed()).count()
	}

	/// Subscriptions ever opened.
	pub fn opened_subscriptions(&self) -> usize {
		self.lock_feed().opened
	}

	/// Runs and forgets every registered shutdown hook.
	pub fn close(&self) {
		let hooks = std::mem::take(&mut *self.hooks.lock().unwrap_or_else(|err| err.into_inner()));

		for hook in hooks {
			hook();
		}
	}

	fn lock_feed(&self) -> std::sync::MutexGuard<'_, HopFeed> {
		self.feed.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn index_receiver(&self, index: &str) -> watch::Receiver<IndexStatus> {
		let mut indexes = self.indexes.lock().unwrap_or_else(|err| err.into_inner());

		indexes
			.entry(index.to_string())
			.or_insert_with(|| watch::channel(IndexStatus::Drained).0)
			.subscribe()
	}
}

impl HopFeed {
	fn broadcast(&mut self, event: HopEvent) {
		self.subscribers.retain(|sender| sender.send(event.clone()).is_ok());
	}
}

impl HopStream for MemoryHost {
	fn subscribe(&self, include_known: bool) -> HopSubscription {
		let (sender, receiver) = mpsc::unbounded_channel();
		let mut feed = self.lock_feed();

		if include_known {
			if !feed.known.is_empty() {
				let _ = sender.send(HopEvent::Snapshot(feed.known.clone()));
			}

			let _ = sender.send(HopEvent::Synced);
		}

		feed.subscribers.push(sender);
		feed.opened += 1;

		HopSubscription::new(receiver)
	}
}

impl ProfileIndex for MemoryHost {
	fn is_present(&self) -> bool {
		!self.absent.load(Ordering::SeqCst)
	}

	fn profile(&self, id: &Identity) -> color_eyre::Result<Option<AboutProfile>> {
		if self.failing.read().unwrap_or_else(|err| err.into_inner()).contains(id) {
			return Err(eyre::eyre!("Profile index failed to read {id}."));
		}

		Ok(self.profiles.read().unwrap_or_else(|err| err.into_inner()).get(id).cloned())
	}

	fn wait_drained<'a>(&'a self, index: &'a str) -> BoxFuture<'a, color_eyre::Result<()>> {
		let mut receiver = self.index_receiver(index);

		Box::pin(async move {
			let status = match receiver.wait_for(|status| *status != IndexStatus::Indexing).await
			{
				Ok(status) => status.clone(),
				Err(_) => return Err(eyre::eyre!("Index {index} went away.")),
			};

			match status {
				IndexStatus::Failed(message) => Err(eyre::eyre!(message)),
				IndexStatus::Drained | IndexStatus::Indexing => Ok(()),
			}
		})
	}
}

impl ActivityIndex for MemoryHost {
	fn latest_activity(
		&self,
	) -> BoxFuture<'_, color_eyre::Result<HashMap<Identity, ActivityRecord>>> {
		let activity = self.activity.read().unwrap_or_else(|err| err.into_inner()).clone();

		Box::pin(async move { Ok(activity) })
	}
}

impl ShutdownHooks for MemoryHost {
	fn register(&self, hook: ShutdownHook) {
		self.hooks.lock().unwrap_or_else(|err| err.into_inner()).push(hook);
	}
}
