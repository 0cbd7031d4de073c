use std::cmp::{Ordering, Reverse};

use crate::{edit_distance::levenshtein, normalize::normalize, profile::ProfileRecord};
use suggest_config::RankingMode;

/// Milliseconds of recency that one match tier outweighs, roughly 34 days.
pub const SCORE_TIER_WEIGHT: i64 = 3_000_000_000;
/// Width of a bucketed edit distance group. Distances in one bucket are ordered by recency, so
/// 0 and 2 tie while 2 and 3 do not.
const EDIT_DISTANCE_BUCKET: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
	None,
	Contains,
	Prefix,
	Exact,
}
impl MatchTier {
	/// Classifies an already normalized name against an already normalized query.
	pub fn classify(query: &str, name: &str) -> Self {
		if name == query {
			Self::Exact
		} else if name.starts_with(query) {
			Self::Prefix
		} else if name.contains(query) {
			Self::Contains
		} else {
			Self::None
		}
	}

	pub fn score(self) -> i64 {
		match self {
			Self::None => 0,
			Self::Contains => 1,
			Self::Prefix => 2,
			Self::Exact => 3,
		}
	}
}

struct MatchCandidate<'a> {
	profile: &'a ProfileRecord,
	tier: MatchTier,
	distance: usize,
}
impl MatchCandidate<'_> {
	fn tiered_key(&self) -> i64 {
		self.profile.latest.saturating_add(self.tier.score().saturating_mul(SCORE_TIER_WEIGHT))
	}
}

/// Ranks candidates against free text, best match first.
///
/// Candidates without a display name never match. A query that normalizes to nothing, or a
/// limit of zero, yields no results.
pub fn rank<'a, I>(
	query: &str,
	candidates: I,
	mode: RankingMode,
	limit: Option<usize>,
) -> Vec<ProfileRecord>
where
	I: IntoIterator<Item = &'a ProfileRecord>,
{
	let query = normalize(query);

	if query.is_empty() || limit == Some(0) {
		return Vec::new();
	}

	let mut matches: Vec<MatchCandidate<'a>> = candidates
		.into_iter()
		.filter_map(|profile| {
			let name = normalize(profile.name.as_deref()?);
			let tier = MatchTier::classify(&query, &name);
			let distance = match mode {
				RankingMode::Tiered => 0,
				RankingMode::EditDistance => levenshtein(&query, &name),
			};

			Some(MatchCandidate { profile, tier, distance })
		})
		.collect();

	match mode {
		RankingMode::Tiered => {
			matches.retain(|candidate| candidate.tier != MatchTier::None);
			matches.sort_by(compare_tiered);
		},
		RankingMode::EditDistance => matches.sort_by(compare_edit_distance),
	}

	if let Some(limit) = limit {
		matches.truncate(limit);
	}

	matches.into_iter().map(|candidate| candidate.profile.clone()).collect()
}

fn compare_tiered(a: &MatchCandidate<'_>, b: &MatchCandidate<'_>) -> Ordering {
	b.tiered_key().cmp(&a.tiered_key()).then_with(|| a.profile.id.cmp(&b.profile.id))
}

fn compare_edit_distance(a: &MatchCandidate<'_>, b: &MatchCandidate<'_>) -> Ordering {
	let key = |candidate: &MatchCandidate<'_>| {
		(
			candidate.distance / EDIT_DISTANCE_BUCKET,
			Reverse(candidate.profile.latest),
			candidate.distance,
		)
	};

	key(a).cmp(&key(b)).then_with(|| a.profile.id.cmp(&b.profile.id))
}

#[cfg(test)]
mod tests {
	use super::MatchTier;

	#[test]
	fn classifies_tiers() {
		assert_eq!(MatchTier::classify("labor", "labor"), MatchTier::Exact);
		assert_eq!(MatchTier::classify("labor", "labore qui"), MatchTier::Prefix);
		assert_eq!(MatchTier::classify("labor", "quis laboris"), MatchTier::Contains);
		assert_eq!(MatchTier::classify("labor", "consequat"), MatchTier::None);
	}

	#[test]
	fn tier_scores_are_ordered() {
		assert!(MatchTier::Exact > MatchTier::Prefix);
		assert_eq!(MatchTier::Exact.score(), 3);
		assert_eq!(MatchTier::None.score(), 0);
	}
}
