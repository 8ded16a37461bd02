//! JSON-lines replay feed for image updates.
//!
//! The concrete stream collaborator for the binary: each line of the feed
//! file is one [`ImageUpdate`], replayed on the subscription thread at a
//! fixed interval so the overlay visibly tracks the feed. Lines that fail to
//! parse are logged and skipped rather than ending the feed.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use slidescope_core::ImageUpdate;
use slidescope_stream::UpdateSource;

/// Pull source replaying a JSON-lines file of updates.
pub struct ReplaySource {
	lines: Lines<BufReader<File>>,
	interval: Duration,
	delivered: u64,
}

impl ReplaySource {
	/// Open a feed file for replay.
	pub fn open(path: &Path, interval: Duration) -> Result<Self> {
		let file = File::open(path)
			.with_context(|| format!("failed to open updates feed {}", path.display()))?;
		Ok(Self {
			lines: BufReader::new(file).lines(),
			interval,
			delivered: 0,
		})
	}
}

impl UpdateSource for ReplaySource {
	type Item = ImageUpdate;

	fn next_item(&mut self) -> Option<ImageUpdate> {
		loop {
			let line = match self.lines.next()? {
				Ok(line) => line,
				Err(err) => {
					log::warn!("updates feed read error, stopping replay: {err}");
					return None;
				}
			};

			if line.trim().is_empty() {
				continue;
			}

			match serde_json::from_str::<ImageUpdate>(&line) {
				Ok(update) => {
					// Pace the replay; the first update goes out immediately.
					if self.delivered > 0 {
						std::thread::sleep(self.interval);
					}
					self.delivered += 1;
					return Some(update);
				}
				Err(err) => {
					log::warn!("skipping malformed update line: {err}");
				}
			}
		}
	}
}
