use clap::Parser;

use logpulse_ui_terminal::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logpulse_ui_terminal::run(Cli::parse()).await
}
