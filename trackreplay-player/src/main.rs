use clap::Parser;
use trackreplay_player::commandline::Commandline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let commandline = Commandline::parse();
	commandline.run().await?;
	Ok(())
}
