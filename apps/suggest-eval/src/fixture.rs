use std::{collections::HashMap, fs, path::Path};

use color_eyre::{Result, eyre::WrapErr};
use serde::Deserialize;

use suggest_service::{
	AboutProfile, ActivityRecord, HopSnapshot, Identity, memory::MemoryHost,
};

/// Recorded social graph state replayed into a [`MemoryHost`].
#[derive(Debug, Deserialize)]
pub struct Fixture {
	pub local_id: Identity,
	#[serde(default)]
	pub profiles: HashMap<Identity, AboutProfile>,
	#[serde(default)]
	pub activity: HashMap<Identity, ActivityRecord>,
	/// Hop stream events in delivery order.
	#[serde(default)]
	pub hops: Vec<FixtureHop>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FixtureHop {
	Marker(SyncMarker),
	Snapshot(HopSnapshot),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncMarker {
	pub sync: bool,
}

impl Fixture {
	pub fn load(path: &Path) -> Result<Self> {
		let raw = fs::read_to_string(path)
			.wrap_err_with(|| format!("Failed to read fixture at {path:?}."))?;

		serde_json::from_str(&raw).wrap_err_with(|| format!("Failed to parse fixture at {path:?}."))
	}

	/// Loads profile and activity indexes. Hop events are left for [`Fixture::replay`].
	pub fn seed(&self, host: &MemoryHost) {
		for (id, profile) in &self.profiles {
			host.set_profile(id.clone(), profile.clone());
		}
		for (id, record) in &self.activity {
			host.set_activity(id.clone(), *record);
		}
	}

	pub fn replay(&self, host: &MemoryHost) {
		for event in &self.hops {
			match event {
				FixtureHop::Marker(_) => host.publish_sync(),
				FixtureHop::Snapshot(snapshot) => host.publish(snapshot.clone()),
			}
		}

		tracing::debug!(events = self.hops.len(), "Fixture hop events replayed.");
	}
}
