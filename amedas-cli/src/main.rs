//! AMeDAS CLI - Command line tool for JMA AMeDAS observation rankings.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "amedas-cli",
    version,
    about = "JMA AMeDAS observation map and ranking toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: amedas_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    amedas_cmd::run(cli.command).await
}
