use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = planfeed_api::Args::parse();

	planfeed_api::run(args).await
}
