use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

use anyhow::{Context, Result, ensure};

use crate::cli::CliArgs;

/// Simple application configuration derived from CLI arguments and defaults.
#[derive(Debug)]
pub struct Config {
	pub catalog: PathBuf,
	pub updates: Option<PathBuf>,
	pub initial_query: String,
	pub initial_boundary: String,
	pub update_interval: Duration,
}

impl Config {
	/// Build configuration from CLI arguments with sensible defaults.
	pub fn from_cli(cli: &CliArgs) -> Result<Self> {
		let catalog = resolve_file(&cli.catalog, "catalog")?;
		let updates = cli
			.updates
			.as_ref()
			.map(|path| resolve_file(path, "updates feed"))
			.transpose()?;

		let initial_query = cli.initial_query.clone().unwrap_or_default();
		let initial_boundary = cli.initial_boundary.clone().unwrap_or_default();

		ensure!(
			cli.update_interval_ms > 0,
			"update-interval-ms must be greater than zero"
		);

		Ok(Self {
			catalog,
			updates,
			initial_query,
			initial_boundary,
			update_interval: Duration::from_millis(cli.update_interval_ms),
		})
	}
}

/// Resolve a path argument to an absolute, existing regular file.
fn resolve_file(path: &PathBuf, label: &str) -> Result<PathBuf> {
	let mut resolved = path.clone();
	if resolved.is_relative() {
		resolved = env::current_dir()
			.with_context(|| format!("failed to resolve current directory for {label}"))?
			.join(resolved);
	}

	let metadata = fs::metadata(&resolved)
		.with_context(|| format!("failed to inspect {label} {}", resolved.display()))?;
	ensure!(metadata.is_file(), "{label} must be a regular file");

	Ok(resolved)
}
