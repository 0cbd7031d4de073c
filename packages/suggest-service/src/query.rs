use serde::Deserialize;

use crate::{
	Error, PROFILE_INDEX, Result,
	gate::GateState,
	lifecycle::{Inner, SuggestService},
};
use suggest_domain::{Identity, ProfileRecord, rank};

/// Options of a profile query. `text` wins over `default_ids`; with neither, the result is empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileQuery {
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub limit: Option<usize>,
	#[serde(default)]
	pub default_ids: Option<Vec<Identity>>,
}
impl ProfileQuery {
	pub fn text(text: impl Into<String>) -> Self {
		Self { text: Some(text.into()), ..Self::default() }
	}

	pub fn default_ids<I>(ids: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Identity>,
	{
		Self { default_ids: Some(ids.into_iter().map(Into::into).collect()), ..Self::default() }
	}

	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);

		self
	}
}

impl SuggestService {
	/// Suggests profiles for free text, or resolves an explicit identity list in input order.
	///
	/// Suspends until the current generation has processed a snapshot that reaches beyond the
	/// local feed.
	pub async fn profile(&self, query: ProfileQuery) -> Result<Vec<ProfileRecord>> {
		self.inner.wait_ready().await?;

		if let Some(text) = query.text.as_deref().filter(|text| !text.is_empty()) {
			return Ok(self.inner.match_text(text, query.limit));
		}
		if let Some(ids) = query.default_ids.as_deref() {
			return self.inner.default_lookup(ids).await;
		}

		Ok(Vec::new())
	}
}

impl Inner {
	async fn wait_ready(&self) -> Result<()> {
		loop {
			let gate = self.current_gate();

			match gate.wait().await {
				GateState::Open => return Ok(()),
				GateState::Closed => return Err(Error::Stopped),
				// Replaced by a newer generation; follow its gate instead.
				GateState::Superseded | GateState::Pending => continue,
			}
		}
	}

	fn match_text(&self, text: &str, limit: Option<usize>) -> Vec<ProfileRecord> {
		let state = self.read_cache();

		rank(text, state.cache.iter(), self.cfg.suggest.ranking, limit)
	}

	/// Direct lookup that bypasses ranking and the hop filter. Unresolvable identities are
	/// dropped; the rest keep their input order.
	async fn default_lookup(&self, ids: &[Identity]) -> Result<Vec<ProfileRecord>> {
		self.collaborators.profiles.wait_drained(PROFILE_INDEX).await.map_err(|err| {
			Error::IndexDrain { index: PROFILE_INDEX.to_string(), message: err.to_string() }
		})?;

		Ok(self.resolve_profiles(ids))
	}

	fn resolve_profiles(&self, ids: &[Identity]) -> Vec<ProfileRecord> {
		let state = self.read_cache();
		let mut out = Vec::with_capacity(ids.len());

		for id in ids {
			match self.collaborators.profiles.profile(id) {
				Ok(Some(about)) => out.push(ProfileRecord {
					id: id.clone(),
					name: about.name,
					image: about.image,
					latest: state.cache.get(id).map(|entry| entry.latest).unwrap_or(0),
				}),
				Ok(None) => {},
				Err(err) => {
					tracing::warn!(
						identity = %id,
						error = %err,
						"Profile lookup failed; dropping identity."
					);
				},
			}
		}

		out
	}
}
