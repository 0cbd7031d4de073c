use std::{collections::HashMap, sync::Arc};

use color_eyre::eyre::WrapErr;

use crate::{
	AboutProfile, BASE_INDEX, Collaborators, HopEvent, HopSnapshot, HopSubscription, PROFILE_INDEX,
	cache::SharedCache, gate::ReadinessGate,
};
use suggest_config::CacheRetention;
use suggest_domain::{ActivityRecord, Identity, ProfileRecord, within_hops};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct SnapshotOutcome {
	pub(crate) in_range: usize,
	pub(crate) upserted: usize,
	pub(crate) evicted: usize,
	pub(crate) failed: usize,
	pub(crate) opened: bool,
}

/// Feeds one generation's hop stream subscription into the shared cache.
pub(crate) struct HopConsumer {
	pub(crate) generation: u64,
	pub(crate) local_id: Identity,
	pub(crate) max_hops: i64,
	pub(crate) retention: CacheRetention,
	pub(crate) collaborators: Collaborators,
	pub(crate) cache: SharedCache,
	pub(crate) gate: Arc<ReadinessGate>,
}
impl HopConsumer {
	pub(crate) async fn run(self, mut subscription: HopSubscription) {
		while let Some(event) = subscription.next().await {
			let hops = match event {
				HopEvent::Snapshot(hops) => hops,
				HopEvent::Synced => {
					tracing::debug!(generation = self.generation, "Skipping hop sync marker.");

					continue;
				},
			};

			if let Err(err) = self.wait_for_indexes().await {
				tracing::error!(
					generation = self.generation,
					error = %err,
					"Index drain failed; skipping hop snapshot."
				);

				continue;
			}

			let activity = match self.collaborators.activity.latest_activity().await {
				Ok(activity) => activity,
				Err(err) => {
					tracing::error!(
						generation = self.generation,
						error = %err,
						"Activity snapshot failed; skipping hop snapshot."
					);

					continue;
				},
			};
			let Some(outcome) = self.apply(&hops, &activity) else {
				tracing::debug!(generation = self.generation, "Discarding stale hop snapshot.");

				break;
			};

			tracing::debug!(
				generation = self.generation,
				in_range = outcome.in_range,
				upserted = outcome.upserted,
				evicted = outcome.evicted,
				failed = outcome.failed,
				"Hop snapshot applied."
			);
		}

		tracing::debug!(generation = self.generation, "Hop stream ended.");
	}

	async fn wait_for_indexes(&self) -> color_eyre::Result<()> {
		for index in [BASE_INDEX, PROFILE_INDEX] {
			self.collaborators
				.profiles
				.wait_drained(index)
				.await
				.wrap_err_with(|| format!("Index {index} did not drain."))?;
		}

		Ok(())
	}

	/// Resolves and writes one snapshot. Returns `None` without touching the cache or the gate
	/// when a newer generation owns the cache.
	pub(crate) fn apply(
		&self,
		hops: &HopSnapshot,
		activity: &HashMap<Identity, ActivityRecord>,
	) -> Option<SnapshotOutcome> {
		let mut outcome = SnapshotOutcome::default();
		let reaches_others = hops.len() != 1 || !hops.contains_key(&self.local_id);
		let mut resolved = Vec::new();
		let mut out_of_range = Vec::new();

		for (id, distance) in hops {
			if !within_hops(*distance, self.max_hops) {
				if self.retention == CacheRetention::Evict {
					out_of_range.push(id);
				}

				continue;
			}

			outcome.in_range += 1;

			match self.collaborators.profiles.profile(id) {
				Ok(Some(AboutProfile { name: Some(name), image })) if !name.trim().is_empty() => {
					resolved.push(ProfileRecord {
						id: id.clone(),
						name: Some(name),
						image,
						latest: activity.get(id).map(ActivityRecord::latest).unwrap_or(0),
					});
				},
				Ok(_) => {},
				Err(err) => {
					outcome.failed += 1;

					tracing::warn!(
						identity = %id,
						error = %err,
						"Profile lookup failed; skipping identity."
					);
				},
			}
		}

		let mut state = self.cache.write().unwrap_or_else(|err| err.into_inner());

		if state.generation != self.generation {
			return None;
		}

		for id in out_of_range {
			if state.cache.remove(id).is_some() {
				outcome.evicted += 1;
			}
		}
		for record in resolved {
			state.cache.upsert(record);

			outcome.upserted += 1;
		}

		// The initial snapshot carries only the local feed. Any other snapshot names someone else,
		// in range or not.
		if reaches_others && self.gate.open() {
			outcome.opened = true;

			tracing::info!(
				generation = self.generation,
				entries = state.cache.len(),
				"Readiness gate opened."
			);
		}

		Some(outcome)
	}
}
