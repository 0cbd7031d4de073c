use suggest_config::RankingMode;
use suggest_domain::{Identity, ProfileRecord, SCORE_TIER_WEIGHT, rank};

const DAY_MS: i64 = 24 * 60 * 60 * 1_000;

fn profile(id: &str, name: &str, latest: i64) -> ProfileRecord {
	ProfileRecord {
		id: Identity::from(id),
		name: Some(name.to_string()),
		image: None,
		latest,
	}
}

fn ids(results: &[ProfileRecord]) -> Vec<&str> {
	results.iter().map(|profile| profile.id.as_str()).collect()
}

fn corpus() -> Vec<ProfileRecord> {
	vec![
		profile("a", "labore qui fugiat", 100),
		profile("b", "quis laboris", 900),
		profile("c", "consequat", 1_000),
		profile("d", "Labor", 10),
		profile("e", "elaborate plan", 500),
		profile("f", "laborum", 800),
	]
}

#[test]
fn tiers_dominate_recency() {
	let corpus = corpus();
	let results = rank("labor", &corpus, RankingMode::Tiered, None);

	assert_eq!(ids(&results), vec!["d", "f", "a", "b", "e"]);
}

#[test]
fn recency_orders_within_a_tier() {
	let corpus = vec![
		profile("old", "labor one", 1),
		profile("new", "labor two", 2),
		profile("mid", "labor three", 2),
	];
	let results = rank("labor", &corpus, RankingMode::Tiered, None);

	// Equal keys fall back to identity order.
	assert_eq!(ids(&results), vec!["mid", "new", "old"]);
}

#[test]
fn a_month_of_recency_does_not_beat_a_tier() {
	let now = 1_700_000_000_000;
	let corpus = vec![
		profile("recent", "xlabor", now),
		profile("stale", "labor x", now - 30 * DAY_MS),
	];
	let results = rank("labor", &corpus, RankingMode::Tiered, None);

	assert!(30 * DAY_MS < SCORE_TIER_WEIGHT);
	assert_eq!(ids(&results), vec!["stale", "recent"]);
}

#[test]
fn non_matching_candidates_are_excluded() {
	let corpus = corpus();
	let results = rank("labor", &corpus, RankingMode::Tiered, None);

	assert!(results.iter().all(|profile| profile.id.as_str() != "c"));
}

#[test]
fn query_case_and_diacritics_do_not_change_results() {
	let corpus = corpus();
	let lower = rank("labor", &corpus, RankingMode::Tiered, None);

	assert_eq!(rank("LABOR", &corpus, RankingMode::Tiered, None), lower);
	assert_eq!(rank("  Lábór ", &corpus, RankingMode::Tiered, None), lower);
}

#[test]
fn limit_truncates_and_zero_is_empty() {
	let corpus = corpus();

	assert_eq!(rank("labor", &corpus, RankingMode::Tiered, Some(2)).len(), 2);
	assert!(rank("labor", &corpus, RankingMode::Tiered, Some(0)).is_empty());
	assert_eq!(rank("labor", &corpus, RankingMode::Tiered, Some(50)).len(), 5);
}

#[test]
fn empty_query_yields_nothing() {
	let corpus = corpus();

	assert!(rank("", &corpus, RankingMode::Tiered, None).is_empty());
	assert!(rank("   ", &corpus, RankingMode::EditDistance, None).is_empty());
}

#[test]
fn nameless_candidates_never_match() {
	let corpus = vec![ProfileRecord {
		id: Identity::from("nameless"),
		name: None,
		image: None,
		latest: 0,
	}];

	assert!(rank("labor", &corpus, RankingMode::EditDistance, None).is_empty());
}

#[test]
fn edit_distance_orders_by_bucket_then_recency() {
	let corpus = vec![
		profile("far", "completely different", 5_000),
		profile("near_old", "labore", 1),
		profile("near_new", "laboris", 2),
		profile("exact", "labor", 0),
	];
	let results = rank("labor", &corpus, RankingMode::EditDistance, None);

	// Distances 0, 1 and 2 share a bucket, so recency decides among them.
	assert_eq!(ids(&results), vec!["near_new", "near_old", "exact", "far"]);
}

#[test]
fn edit_distance_buckets_have_fixed_boundaries() {
	let corpus = vec![profile("three", "laborers", 9_000), profile("two", "laborum", 1)];
	let results = rank("labor", &corpus, RankingMode::EditDistance, None);

	// Distances 2 and 3 sit in adjacent buckets, so the older, closer name still leads.
	assert_eq!(ids(&results), vec!["two", "three"]);
}

#[test]
fn edit_distance_keeps_non_matching_candidates() {
	let corpus = corpus();

	assert_eq!(rank("labor", &corpus, RankingMode::EditDistance, None).len(), corpus.len());
}
