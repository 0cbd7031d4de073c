pub mod fixture;

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use color_eyre::eyre;
use tracing_subscriber::EnvFilter;

use crate::fixture::Fixture;
use suggest_config::Config;
use suggest_service::{Identity, ProfileQuery, ProfileRecord, SuggestService, memory::MemoryHost};

#[derive(Debug, Parser)]
#[command(
	version = suggest_cli::VERSION,
	rename_all = "kebab",
	styles = suggest_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSON fixture with the local identity, profiles, activity and hop events.
	#[arg(long, short = 'f', value_name = "FILE")]
	pub fixture: PathBuf,
	#[arg(long, short = 't', conflicts_with = "default_ids")]
	pub text: Option<String>,
	#[arg(long, short = 'l')]
	pub limit: Option<usize>,
	/// Resolve these identities in order instead of matching text. Repeatable.
	#[arg(long = "default-id", value_name = "ID")]
	pub default_ids: Vec<String>,
	/// Give up when the index is not ready after this many milliseconds.
	#[arg(long, default_value_t = 10_000)]
	pub timeout_ms: u64,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = suggest_config::load(&args.config)?;

	init_tracing(&config)?;

	let fixture = Fixture::load(&args.fixture)?;
	let query = ProfileQuery {
		text: args.text,
		limit: args.limit,
		default_ids: (!args.default_ids.is_empty())
			.then(|| args.default_ids.into_iter().map(Identity::from).collect()),
	};
	let results = evaluate(config, &fixture, query, Duration::from_millis(args.timeout_ms)).await?;

	println!("{}", serde_json::to_string_pretty(&results)?);

	Ok(())
}

/// Replays `fixture` into a fresh service and answers one query.
pub async fn evaluate(
	config: Config,
	fixture: &Fixture,
	query: ProfileQuery,
	timeout: Duration,
) -> color_eyre::Result<Vec<ProfileRecord>> {
	let host = Arc::new(MemoryHost::new());

	fixture.seed(&host);

	let service = SuggestService::builder(config)
		.local_id(fixture.local_id.clone())
		.host(host.clone())
		.build()?;

	if !service.config().suggest.autostart {
		service.start();
	}

	fixture.replay(&host);

	let results = tokio::time::timeout(timeout, service.profile(query))
		.await
		.map_err(|_| eyre::eyre!("Suggestion index was not ready within {timeout:?}."))?;

	host.close();

	Ok(results?)
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
