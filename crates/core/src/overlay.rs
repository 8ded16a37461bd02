//! Live-update reconciliation between the image stream and the boundary.
//!
//! A [`ViewerSession`] holds exactly two pieces of independently-mutated
//! state: the latest [`ImageUpdate`] off the stream and the current boundary
//! text. The [`OverlayDescriptor`] is never stored; it is recomputed on
//! demand from whichever values exist at that moment. The two timestreams
//! carry no correlation key, so the composition is deliberately
//! last-known-of-each: a boundary edit after an update arrived pairs the
//! fresh center with the stale image.

use serde::{Deserialize, Serialize};

use crate::boundary::{Boundary, CenterPoint};

/// Event payload delivered by the stream collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUpdate {
	/// Location of the rendered image tile.
	#[serde(default)]
	pub url: String,
	/// Slide identifier the update belongs to.
	#[serde(default)]
	pub path: String,
	/// Auxiliary vector data, passed through unchanged.
	#[serde(default)]
	pub vector: serde_json::Value,
}

/// View-model handed to the presentation collaborator.
///
/// Exists only while an update with a usable URL and a valid center point are
/// simultaneously available.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayDescriptor {
	/// Image to render under the overlay.
	pub image_url: String,
	/// Slide path paired with the point of interest drawn on the image.
	pub points: (String, CenterPoint),
	/// Auxiliary vector data forwarded for display.
	pub vector: serde_json::Value,
}

/// Single-session state for the live overlay.
#[derive(Debug, Default)]
pub struct ViewerSession {
	boundary_text: String,
	latest_update: Option<ImageUpdate>,
}

impl ViewerSession {
	/// Create a session with an initial boundary text.
	#[must_use]
	pub fn new(boundary_text: impl Into<String>) -> Self {
		Self {
			boundary_text: boundary_text.into(),
			latest_update: None,
		}
	}

	/// Replace the boundary text, typically on every keystroke.
	pub fn set_boundary_text(&mut self, text: impl Into<String>) {
		self.boundary_text = text.into();
	}

	/// Current boundary text, exactly as typed.
	#[must_use]
	pub fn boundary_text(&self) -> &str {
		&self.boundary_text
	}

	/// Replace the held update wholesale; each event fully supersedes the
	/// last, no field merging.
	pub fn apply_update(&mut self, update: ImageUpdate) {
		log::debug!("image update for {}", update.path);
		self.latest_update = Some(update);
	}

	/// Latest update received this session, if any.
	#[must_use]
	pub fn latest_update(&self) -> Option<&ImageUpdate> {
		self.latest_update.as_ref()
	}

	/// Center point of the current boundary, when it parses.
	#[must_use]
	pub fn center(&self) -> Option<CenterPoint> {
		Boundary::parse(&self.boundary_text)
			.ok()
			.map(|boundary| boundary.center())
	}

	/// Project the current overlay, or `None` when the presentation layer
	/// should show its placeholder.
	#[must_use]
	pub fn overlay(&self) -> Option<OverlayDescriptor> {
		let update = self.latest_update.as_ref()?;
		if update.url.is_empty() {
			return None;
		}
		let center = self.center()?;

		Some(OverlayDescriptor {
			image_url: update.url.clone(),
			points: (update.path.clone(), center),
			vector: update.vector.clone(),
		})
	}
}
