use serde::Deserialize;

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60 * 60 * 1_000;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	#[serde(default)]
	pub suggest: Suggest,
	#[serde(default)]
	pub friends: Friends,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Suggest {
	/// Subscribe to the hop stream as soon as the service is built.
	#[serde(default = "default_autostart")]
	pub autostart: bool,
	/// Interval between automatic restarts of the hop stream subscription.
	#[serde(default = "default_refresh_interval_ms")]
	pub refresh_interval_ms: u64,
	#[serde(default)]
	pub cache_retention: CacheRetention,
	#[serde(default)]
	pub ranking: RankingMode,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Friends {
	/// Largest social-graph distance admitted into the profile cache.
	#[serde(default = "default_hops")]
	pub hops: i64,
}

/// What happens to cached profiles once their identity leaves the hop range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheRetention {
	/// Last-known-good: entries are only added or overwritten and survive restarts.
	#[default]
	Retain,
	/// Out-of-range identities are evicted per snapshot and every restart clears the cache.
	Evict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
	/// Exact, prefix and substring tiers weighted against recency.
	#[default]
	Tiered,
	/// Bucketed edit distance: Levenshtein distance in fixed-width buckets, recency inside a
	/// bucket, distance last. Not a pairwise "differs by more than 2" rule.
	EditDistance,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			service: Service { log_level: default_log_level() },
			suggest: Suggest::default(),
			friends: Friends::default(),
		}
	}
}

impl Default for Suggest {
	fn default() -> Self {
		Self {
			autostart: default_autostart(),
			refresh_interval_ms: default_refresh_interval_ms(),
			cache_retention: CacheRetention::default(),
			ranking: RankingMode::default(),
		}
	}
}

impl Default for Friends {
	fn default() -> Self {
		Self { hops: default_hops() }
	}
}

pub(crate) fn default_log_level() -> String {
	"info".to_string()
}

fn default_autostart() -> bool {
	true
}

fn default_refresh_interval_ms() -> u64 {
	DEFAULT_REFRESH_INTERVAL_MS
}

fn default_hops() -> i64 {
	1
}
