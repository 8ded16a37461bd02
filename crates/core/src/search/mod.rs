//! Search coordination between the UI and the search collaborator.
//!
//! The collaborator is function-shaped: it takes the query and the boundary
//! text verbatim and eventually produces a record. Everything else in this
//! module exists to keep the UI responsive while that call is in flight and
//! to make sure only the newest completion ever reaches the screen.

mod catalog;
mod coordinator;
pub mod runtime;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::CatalogBackend;
pub use coordinator::{SearchCoordinator, SearchPhase};

/// Record describing a whole-slide image, as returned by the search
/// collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsiRecord {
	/// Identifier of the slide within its store.
	pub path: String,
	/// Human-readable description, when the collaborator provides one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Pixel width of the full-resolution slide.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<u64>,
	/// Pixel height of the full-resolution slide.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub height: Option<u64>,
}

/// Failures surfaced by the search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The collaborator could not complete the request.
	#[error("search backend failed: {0}")]
	Backend(String),

	/// No record matched the query.
	#[error("no slide matched query '{0}'")]
	NoMatch(String),
}

/// Function-shaped seam for the external search collaborator.
///
/// The boundary text is passed through verbatim; it is never parsed before
/// sending, so a malformed boundary cannot block a search. Implementations
/// may block: they are always driven from the background worker in
/// [`runtime`].
pub trait SearchBackend {
	/// Resolve a query and boundary text to a slide record.
	fn search(&self, query: &str, boundary_text: &str) -> Result<WsiRecord, SearchError>;
}
