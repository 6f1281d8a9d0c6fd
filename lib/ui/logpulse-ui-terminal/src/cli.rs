use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::warn;

use logpulse_domain::DashboardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Headless live log dashboard.
#[derive(Debug, Parser)]
#[command(name = "dashboard", version, about)]
pub struct Cli {
    /// Path to the YAML config file.
    #[arg(long, env = "LOGPULSE_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Seed the simulation for a reproducible run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the tick period in milliseconds.
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Disable the external log analysis call.
    #[arg(long)]
    pub no_analysis: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

impl Cli {
    /// Load the config file and apply command line overrides.
    ///
    /// An explicit path must exist. The default location is optional and
    /// falls back to built-in defaults.
    pub fn resolve_config(&self) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load_from_path(path)?,
            None => load_default(&default_config_path())?,
        };

        if let Some(seed) = self.seed {
            config.emitter.seed = Some(seed);
        }
        if let Some(interval_ms) = self.interval_ms {
            config.emitter.interval_ms = interval_ms;
        }
        if self.no_analysis {
            config.analysis.enabled = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_default(path: &Path) -> Result<DashboardConfig> {
    if path.exists() {
        return DashboardConfig::load_from_path(path);
    }
    warn!("no config at {}, using built-in defaults", path.display());
    Ok(DashboardConfig::default())
}

fn default_config_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".logpulse").join("config.yaml"),
        Err(_) => PathBuf::from("logpulse-config.yaml"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_overrides_apply_on_top_of_file() {
        let file = config_file("emitter:\n  interval_ms: 250\nanalysis:\n  max_records: 10\n");
        let cli = Cli::parse_from([
            "dashboard",
            "--config",
            file.path().to_str().unwrap(),
            "--seed",
            "3",
            "--no-analysis",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.emitter.interval_ms, 250);
        assert_eq!(config.emitter.seed, Some(3));
        assert_eq!(config.analysis.max_records, 10);
        assert!(!config.analysis.enabled);
    }

    #[test]
    fn test_explicit_missing_config_is_an_error() {
        let cli = Cli::parse_from(["dashboard", "--config", "/nonexistent/logpulse.yaml"]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let file = config_file("");
        let cli = Cli::parse_from([
            "dashboard",
            "--config",
            file.path().to_str().unwrap(),
            "--interval-ms",
            "0",
        ]);
        assert!(cli.resolve_config().is_err());
    }

    #[test]
    fn test_output_flag() {
        let cli = Cli::parse_from(["dashboard", "--output", "json"]);
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
