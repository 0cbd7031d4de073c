use std::{path::PathBuf, time::Duration};

use suggest_config::Config;
use suggest_eval::fixture::{Fixture, FixtureHop};
use suggest_service::ProfileQuery;

const TIMEOUT: Duration = Duration::from_secs(5);

fn fixture() -> Fixture {
	let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/feeds.json");

	Fixture::load(&path).expect("Failed to load fixture.")
}

#[test]
fn fixture_distinguishes_sync_markers_from_snapshots() {
	let fixture = fixture();

	assert_eq!(fixture.hops.len(), 3);
	assert!(matches!(fixture.hops[0], FixtureHop::Snapshot(_)));
	assert!(matches!(fixture.hops[1], FixtureHop::Marker(_)));
	assert!(matches!(fixture.hops[2], FixtureHop::Snapshot(ref hops) if hops.len() == 4));
}

#[tokio::test]
async fn text_query_replays_fixture_into_ranked_results() {
	let results =
		suggest_eval::evaluate(Config::default(), &fixture(), ProfileQuery::text("labor"), TIMEOUT)
			.await
			.expect("Evaluation failed.");
	let ids: Vec<&str> = results.iter().map(|profile| profile.id.as_str()).collect();

	// A prefix match only outweighs about a month of recency; @id3 is years behind.
	assert_eq!(ids, vec!["@me.ed25519", "@id1.ed25519", "@id3.ed25519"]);
	assert_eq!(results[0].latest, 1_700_000_000_000);
	assert_eq!(results[0].image.as_deref(), Some("&avatar.sha256"));
}

#[tokio::test]
async fn default_ids_replay_in_input_order() {
	let results = suggest_eval::evaluate(
		Config::default(),
		&fixture(),
		ProfileQuery::default_ids(["@id1.ed25519", "@id2.ed25519"]),
		TIMEOUT,
	)
	.await
	.expect("Evaluation failed.");
	let names: Vec<_> = results.iter().map(|profile| profile.name.as_deref()).collect();

	assert_eq!(names, vec![Some("quis laboris"), Some("consequat")]);
}

#[tokio::test]
async fn unready_fixture_times_out() {
	let mut fixture = fixture();

	fixture.hops.truncate(2);

	let err = suggest_eval::evaluate(
		Config::default(),
		&fixture,
		ProfileQuery::text("labor"),
		Duration::from_millis(50),
	)
	.await
	.expect_err("Expected readiness timeout.");

	assert!(err.to_string().contains("was not ready"));
}
