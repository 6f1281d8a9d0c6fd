use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use logpulse_adapter_summarizer::summarizer_from_config;
use logpulse_application::{AnalysisTrigger, Dashboard};
use logpulse_domain::{AnalysisState, DashboardConfig, Snapshot};
use logpulse_ports::PortSet;

use crate::cli::{Cli, OutputFormat};
use crate::format::{analysis_block, snapshot_json, snapshot_line};

/// Operator commands read from stdin, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Analyze,
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "a" | "analyze" => Some(Command::Analyze),
            "s" | "status" => Some(Command::Status),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Operator logs go to stderr so stdout stays a clean snapshot stream.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn ports_from_config(config: &DashboardConfig) -> Result<PortSet> {
    Ok(PortSet::with_summarizer(summarizer_from_config(&config.analysis)?))
}

pub async fn run(cli: Cli) -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = cli.resolve_config()?;
    let ports = ports_from_config(&config)?;
    let dashboard = Dashboard::new(config, ports);

    let output = cli.output;
    let mut last_analysis = AnalysisState::Idle;
    let subscription = dashboard.subscribe(move |snapshot: &Arc<Snapshot>| {
        print_snapshot(output, snapshot, &mut last_analysis);
    });

    dashboard.start()?;
    info!("commands: a/analyze, s/status, q/quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // stdin closed; keep streaming until interrupted.
                        if let Err(err) = tokio::signal::ctrl_c().await {
                            error!("failed to wait for ctrl-c: {err}");
                        }
                        break;
                    }
                    Err(err) => {
                        error!("failed to read stdin: {err}");
                        break;
                    }
                };
                match Command::parse(&line) {
                    Some(Command::Analyze) => {
                        if let AnalysisTrigger::AlreadyRunning = dashboard.request_analysis() {
                            println!("analysis already running");
                        }
                    }
                    Some(Command::Status) => println!("{}", snapshot_line(&dashboard.snapshot())),
                    Some(Command::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => warn!("unknown command: {}", line.trim()),
                }
            }
        }
    }

    dashboard.stop().await;
    dashboard.unsubscribe(subscription);
    Ok(())
}

fn print_snapshot(output: OutputFormat, snapshot: &Snapshot, last_analysis: &mut AnalysisState) {
    match output {
        OutputFormat::Json => match snapshot_json(snapshot) {
            Ok(line) => println!("{line}"),
            Err(err) => error!("{err:#}"),
        },
        OutputFormat::Text => {
            if snapshot.analysis != *last_analysis {
                if let Some(block) = analysis_block(&snapshot.analysis) {
                    println!("{block}");
                }
            } else {
                println!("{}", snapshot_line(snapshot));
            }
        }
    }
    if snapshot.analysis != *last_analysis {
        *last_analysis = snapshot.analysis.clone();
    }
}
