use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = talent_api::Args::parse();
	talent_api::run(args).await
}
