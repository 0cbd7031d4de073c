use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Opaque, externally issued key of a network participant (a feed).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);
impl Identity {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Identity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for Identity {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for Identity {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for Identity {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Display profile of one identity as returned to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
	pub id: Identity,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	/// Epoch milliseconds of the latest known message, 0 when unknown.
	#[serde(default)]
	pub latest: i64,
}

/// Latest-message record of one feed. The log exposes the timestamp in two places and the two
/// are not guaranteed to agree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
	#[serde(default)]
	pub timestamp: Option<i64>,
	#[serde(default)]
	pub value_timestamp: Option<i64>,
}
impl ActivityRecord {
	pub fn new(timestamp: i64) -> Self {
		Self { timestamp: Some(timestamp), value_timestamp: Some(timestamp) }
	}

	/// Smallest of the available timestamps, or 0 when neither is present.
	pub fn latest(&self) -> i64 {
		match (self.timestamp, self.value_timestamp) {
			(Some(received), Some(claimed)) => received.min(claimed),
			(Some(ts), None) | (None, Some(ts)) => ts,
			(None, None) => 0,
		}
	}
}

/// Whether a hop distance lies inside `[0, max_hops]`. Negative distances mean blocked or
/// unreachable.
pub fn within_hops(distance: i64, max_hops: i64) -> bool {
	(0..=max_hops).contains(&distance)
}
