use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = suggest_eval::Args::parse();

	suggest_eval::run(args).await
}
