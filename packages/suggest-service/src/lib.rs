mod cache;
mod consumer;
mod error;
mod gate;
mod lifecycle;
mod query;

pub mod memory;

pub use cache::ProfileCache;
pub use error::{Error, Result};
pub use gate::{GateState, ReadinessGate};
pub use lifecycle::{Phase, SuggestService, SuggestServiceBuilder};
pub use query::ProfileQuery;
pub use suggest_domain::{ActivityRecord, Identity, ProfileRecord};

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Hop distance per identity. 0 is the local feed, negative means blocked.
pub type HopSnapshot = HashMap<Identity, i64>;

pub type ShutdownHook = Box<dyn FnOnce() + Send + 'static>;

/// Log index that must be caught up before hop snapshots are resolved.
pub const BASE_INDEX: &str = "base";
/// Index holding self-published profile metadata.
pub const PROFILE_INDEX: &str = "aboutSelf";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HopEvent {
	Snapshot(HopSnapshot),
	/// Marks the switch from already-known state to live updates. Carries no data.
	Synced,
}

/// Receiving end of one hop stream subscription. Dropping it cancels the subscription.
#[derive(Debug)]
pub struct HopSubscription {
	receiver: mpsc::UnboundedReceiver<HopEvent>,
}
impl HopSubscription {
	pub fn new(receiver: mpsc::UnboundedReceiver<HopEvent>) -> Self {
		Self { receiver }
	}

	pub async fn next(&mut self) -> Option<HopEvent> {
		self.receiver.recv().await
	}
}

/// Profile metadata as published by the identity itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutProfile {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub image: Option<String>,
}

pub trait HopStream
where
	Self: Send + Sync,
{
	/// Opens a subscription. With `include_known`, the current state is delivered first and
	/// followed by [`HopEvent::Synced`] before live updates.
	fn subscribe(&self, include_known: bool) -> HopSubscription;
}

pub trait ProfileIndex
where
	Self: Send + Sync,
{
	fn is_present(&self) -> bool;

	fn profile(&self, id: &Identity) -> color_eyre::Result<Option<AboutProfile>>;

	/// Resolves once the named index has processed all currently available input.
	fn wait_drained<'a>(&'a self, index: &'a str) -> BoxFuture<'a, color_eyre::Result<()>>;
}

pub trait ActivityIndex
where
	Self: Send + Sync,
{
	/// Latest message record of every known feed.
	fn latest_activity(
		&self,
	) -> BoxFuture<'_, color_eyre::Result<HashMap<Identity, ActivityRecord>>>;
}

pub trait ShutdownHooks
where
	Self: Send + Sync,
{
	fn register(&self, hook: ShutdownHook);
}

#[derive(Clone)]
pub struct Collaborators {
	pub hops: Arc<dyn HopStream>,
	pub profiles: Arc<dyn ProfileIndex>,
	pub activity: Arc<dyn ActivityIndex>,
}
