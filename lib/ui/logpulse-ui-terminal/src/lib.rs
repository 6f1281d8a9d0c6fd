//! Headless terminal front end: config loading, snapshot printing and the
//! stdin command loop.

pub mod cli;
pub mod format;
pub mod run;

pub use cli::{Cli, OutputFormat};
pub use format::{analysis_block, infra_summary, record_line, snapshot_json, snapshot_line};
pub use run::{Command, init_tracing, ports_from_config, run};
