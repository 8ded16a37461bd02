use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments accepted by the `slidescope` binary.
#[derive(Parser, Debug)]
#[command(
	name = "slidescope",
	version,
	about = "Locate a whole-slide image and watch a live point-of-interest overlay"
)]
pub(crate) struct CliArgs {
	#[arg(
		short = 'c',
		long,
		value_name = "FILE",
		env = "SLIDESCOPE_CATALOG",
		help = "JSON catalog of slide records to search"
	)]
	pub(crate) catalog: PathBuf,
	#[arg(
		short = 'u',
		long,
		value_name = "FILE",
		help = "JSON-lines feed of image updates to replay"
	)]
	pub(crate) updates: Option<PathBuf>,
	#[arg(
		short = 'q',
		long,
		value_name = "QUERY",
		help = "Provide an initial search query"
	)]
	pub(crate) initial_query: Option<String>,
	#[arg(
		short = 'b',
		long,
		value_name = "BOUNDARY",
		help = "Provide an initial boundary, e.g. \"[0,0,1024,768]\""
	)]
	pub(crate) initial_boundary: Option<String>,
	#[arg(
		long,
		value_name = "MILLIS",
		default_value_t = 1000,
		help = "Delay between replayed image updates"
	)]
	pub(crate) update_interval_ms: u64,
}

pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}
