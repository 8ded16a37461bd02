//! Command-line entry point for the slidescope viewer.

mod cli;
mod config;
mod feed;

use anyhow::{Context, Result};
use cli::parse_cli;
use config::Config;
use feed::ReplaySource;
use slidescope_core::ImageUpdate;
use slidescope_core::search::CatalogBackend;
use slidescope_stream::{IterSource, Subscription};
use slidescope_tui::App;

fn main() -> Result<()> {
	env_logger::init();

	let cli = parse_cli();
	let config = Config::from_cli(&cli)?;

	let backend = CatalogBackend::load(&config.catalog)
		.with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;

	let updates = match &config.updates {
		Some(path) => {
			let source = ReplaySource::open(path, config.update_interval)?;
			Subscription::spawn(source)
		}
		// Without a feed the session simply never receives an update and the
		// overlay placeholder stays up.
		None => Subscription::spawn(IterSource::new(Vec::<ImageUpdate>::new())),
	};

	let mut app = App::new(
		backend,
		updates,
		config.initial_query,
		config.initial_boundary,
	);
	slidescope_tui::run(&mut app)
}
