use std::{
	sync::{Arc, Mutex, MutexGuard, RwLockReadGuard, Weak},
	time::Duration,
};

use tokio::{
	runtime::Handle,
	task::JoinHandle,
	time::{self, Instant, MissedTickBehavior},
};

use crate::{
	ActivityIndex, Collaborators, Error, HopStream, ProfileIndex, Result, ShutdownHooks,
	cache::{CacheState, SharedCache},
	consumer::HopConsumer,
	gate::{GateState, ReadinessGate},
};
use suggest_config::{CacheRetention, Config};
use suggest_domain::Identity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	Stopped,
	/// Subscribed, readiness gate still pending.
	Subscribing,
	Running,
}

/// Hop-bounded profile suggestions over a live social graph.
///
/// Cloning is cheap and every clone drives the same cache and subscription.
#[derive(Clone)]
pub struct SuggestService {
	pub(crate) inner: Arc<Inner>,
}

pub struct SuggestServiceBuilder {
	cfg: Config,
	local_id: Option<Identity>,
	hops: Option<Arc<dyn HopStream>>,
	profiles: Option<Arc<dyn ProfileIndex>>,
	activity: Option<Arc<dyn ActivityIndex>>,
	shutdown: Option<Arc<dyn ShutdownHooks>>,
}

pub(crate) struct Inner {
	pub(crate) cfg: Config,
	pub(crate) local_id: Identity,
	pub(crate) collaborators: Collaborators,
	pub(crate) cache: SharedCache,
	runtime: Handle,
	lifecycle: Mutex<Lifecycle>,
}

struct Lifecycle {
	gate: Arc<ReadinessGate>,
	subscription: Option<JoinHandle<()>>,
	refresh: Option<JoinHandle<()>>,
}

impl SuggestServiceBuilder {
	pub fn local_id(mut self, id: impl Into<Identity>) -> Self {
		self.local_id = Some(id.into());

		self
	}

	pub fn hop_stream(mut self, hops: Arc<dyn HopStream>) -> Self {
		self.hops = Some(hops);

		self
	}

	pub fn profile_index(mut self, profiles: Arc<dyn ProfileIndex>) -> Self {
		self.profiles = Some(profiles);

		self
	}

	pub fn activity_index(mut self, activity: Arc<dyn ActivityIndex>) -> Self {
		self.activity = Some(activity);

		self
	}

	pub fn shutdown_hooks(mut self, shutdown: Arc<dyn ShutdownHooks>) -> Self {
		self.shutdown = Some(shutdown);

		self
	}

	/// Uses one host object for every collaborator capability.
	pub fn host<H>(self, host: Arc<H>) -> Self
	where
		H: HopStream + ProfileIndex + ActivityIndex + ShutdownHooks + 'static,
	{
		self.hop_stream(host.clone())
			.profile_index(host.clone())
			.activity_index(host.clone())
			.shutdown_hooks(host)
	}

	/// Validates configuration and capabilities, then starts the service when `autostart` is
	/// set. Must be called from within a tokio runtime.
	pub fn build(self) -> Result<SuggestService> {
		suggest_config::validate(&self.cfg)?;

		let local_id = self.local_id.ok_or(Error::MissingLocalId)?;
		let hops = self.hops.ok_or(Error::MissingCapability { capability: "hop stream" })?;
		let profiles =
			self.profiles.ok_or(Error::MissingCapability { capability: "profile index" })?;
		let activity =
			self.activity.ok_or(Error::MissingCapability { capability: "activity index" })?;

		if !profiles.is_present() {
			return Err(Error::ProfileIndexAbsent);
		}

		let runtime =
			Handle::try_current().map_err(|err| Error::Runtime { message: err.to_string() })?;
		let inner = Arc::new(Inner {
			cfg: self.cfg,
			local_id,
			collaborators: Collaborators { hops, profiles, activity },
			cache: SharedCache::default(),
			runtime,
			lifecycle: Mutex::new(Lifecycle {
				gate: Arc::new(ReadinessGate::new(0)),
				subscription: None,
				refresh: None,
			}),
		});

		if let Some(shutdown) = self.shutdown {
			let weak = Arc::downgrade(&inner);

			shutdown.register(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.stop();
				}
			}));
		}

		let service = SuggestService { inner };

		if service.inner.cfg.suggest.autostart {
			service.start();
		}

		Ok(service)
	}
}

impl SuggestService {
	pub fn builder(cfg: Config) -> SuggestServiceBuilder {
		SuggestServiceBuilder {
			cfg,
			local_id: None,
			hops: None,
			profiles: None,
			activity: None,
			shutdown: None,
		}
	}

	/// Starts a new generation, superseding the previous subscription if there is one.
	pub fn start(&self) {
		self.inner.start();
	}

	/// Cancels the active subscription and periodic refresh. Queries still waiting for
	/// readiness resolve with [`Error::Stopped`].
	pub fn stop(&self) {
		self.inner.stop();
	}

	pub fn phase(&self) -> Phase {
		let lifecycle = self.inner.lock_lifecycle();

		match (&lifecycle.subscription, lifecycle.gate.state()) {
			(None, _) => Phase::Stopped,
			(Some(_), GateState::Open) => Phase::Running,
			(Some(_), _) => Phase::Subscribing,
		}
	}

	pub fn generation(&self) -> u64 {
		self.inner.read_cache().generation
	}

	pub fn cache_len(&self) -> usize {
		self.inner.read_cache().cache.len()
	}

	pub fn config(&self) -> &Config {
		&self.inner.cfg
	}
}

impl Inner {
	fn start(self: &Arc<Self>) {
		let mut lifecycle = self.lock_lifecycle();
		let clear = self.cfg.suggest.cache_retention == CacheRetention::Evict;
		let generation = self.advance_generation(clear);

		if let Some(task) = lifecycle.subscription.take() {
			task.abort();
		}

		lifecycle.gate.supersede();
		lifecycle.gate = Arc::new(ReadinessGate::new(generation));

		let consumer = HopConsumer {
			generation,
			local_id: self.local_id.clone(),
			max_hops: self.cfg.friends.hops,
			retention: self.cfg.suggest.cache_retention,
			collaborators: self.collaborators.clone(),
			cache: self.cache.clone(),
			gate: lifecycle.gate.clone(),
		};
		let subscription = self.collaborators.hops.subscribe(true);

		lifecycle.subscription = Some(self.runtime.spawn(consumer.run(subscription)));

		if lifecycle.refresh.is_none() {
			lifecycle.refresh = Some(self.spawn_refresh());
		}

		tracing::info!(
			generation,
			max_hops = self.cfg.friends.hops,
			"Hop stream subscription started."
		);
	}

	fn stop(&self) {
		let mut lifecycle = self.lock_lifecycle();
		let generation = self.advance_generation(false);

		if let Some(task) = lifecycle.subscription.take() {
			task.abort();
		}
		if let Some(task) = lifecycle.refresh.take() {
			task.abort();
		}

		lifecycle.gate.close();

		tracing::info!(generation, "Suggestion service stopped.");
	}

	fn spawn_refresh(self: &Arc<Self>) -> JoinHandle<()> {
		let weak: Weak<Self> = Arc::downgrade(self);
		let period = Duration::from_millis(self.cfg.suggest.refresh_interval_ms);

		self.runtime.spawn(async move {
			let mut ticker = time::interval_at(Instant::now() + period, period);

			ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

			loop {
				ticker.tick().await;

				let Some(inner) = weak.upgrade() else { break };

				tracing::debug!("Refreshing hop stream subscription.");

				inner.start();
			}
		})
	}

	/// Bumps the generation under the cache write lock so in-flight writers of the previous
	/// generation become no-ops.
	fn advance_generation(&self, clear: bool) -> u64 {
		let mut state = self.cache.write().unwrap_or_else(|err| err.into_inner());

		state.generation += 1;

		if clear {
			state.cache.clear();
		}

		state.generation
	}

	pub(crate) fn current_gate(&self) -> Arc<ReadinessGate> {
		self.lock_lifecycle().gate.clone()
	}

	pub(crate) fn read_cache(&self) -> RwLockReadGuard<'_, CacheState> {
		self.cache.read().unwrap_or_else(|err| err.into_inner())
	}

	fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
		self.lifecycle.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl Drop for Inner {
	fn drop(&mut self) {
		let lifecycle = self.lifecycle.get_mut().unwrap_or_else(|err| err.into_inner());

		let tasks = [lifecycle.subscription.take(), lifecycle.refresh.take()];

		for task in tasks.into_iter().flatten() {
			task.abort();
		}

		lifecycle.gate.close();
	}
}
