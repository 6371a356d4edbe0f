use clap::Parser;

mod cli;
mod logging;

use cli::Cli;
use logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.clone());
    cli::run(cli).await
}
