//! UI-side coordination for search requests and completions.
//!
//! The [`SearchCoordinator`] sequences outgoing requests with a monotonic
//! counter and only ever applies the completion matching the newest request,
//! so a slow old response can never overwrite a fast new one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use super::runtime::{SearchCommand, SearchResponse, spawn};
use super::{SearchBackend, WsiRecord};

/// Explicit request state, so "failed" is distinguishable from "not yet
/// searched" and from an empty in-flight slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
	/// No search has been issued this session.
	#[default]
	Idle,
	/// A request is in flight.
	Loading,
	/// The newest request completed and its record is current.
	Success,
	/// The newest request failed; the previously displayed record, if any,
	/// is retained untouched.
	Failed(String),
}

/// Thin wrapper around the search worker channels.
pub struct SearchCoordinator {
	tx: Sender<SearchCommand>,
	rx: Receiver<SearchResponse>,
	latest_request_id: Arc<AtomicU64>,
	next_request_id: u64,
	current_request_id: Option<u64>,
	phase: SearchPhase,
	record: Option<WsiRecord>,
}

impl SearchCoordinator {
	/// Spawn the background worker for the provided backend and wrap its
	/// channels.
	#[must_use]
	pub fn new<B>(backend: B) -> Self
	where
		B: SearchBackend + Send + 'static,
	{
		let (tx, rx, latest_request_id) = spawn(backend);
		Self {
			tx,
			rx,
			latest_request_id,
			next_request_id: 0,
			current_request_id: None,
			phase: SearchPhase::default(),
			record: None,
		}
	}

	/// Issue a sequenced search request without blocking.
	///
	/// The boundary text travels verbatim; any number of requests may be in
	/// flight, and only the completion for the newest one will be applied.
	pub fn issue_search(&mut self, query: &str, boundary_text: &str) {
		self.next_request_id = self.next_request_id.saturating_add(1);
		let id = self.next_request_id;
		self.current_request_id = Some(id);
		self.phase = SearchPhase::Loading;
		self.latest_request_id.store(id, AtomicOrdering::Release);
		let _ = self.tx.send(SearchCommand::Query {
			id,
			query: query.to_string(),
			boundary: boundary_text.to_string(),
		});
	}

	/// Drain any completions waiting on the receiver channel.
	pub fn pump_responses(&mut self) {
		loop {
			match self.rx.try_recv() {
				Ok(response) => self.handle_response(response),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => break,
			}
		}
	}

	fn handle_response(&mut self, response: SearchResponse) {
		if Some(response.seq) != self.current_request_id {
			log::debug!(
				"dropping stale search response {} (latest request is {:?})",
				response.seq,
				self.current_request_id
			);
			return;
		}

		match response.payload {
			Ok(record) => {
				self.record = Some(record);
				self.phase = SearchPhase::Success;
			}
			Err(err) => {
				// Best-effort UI: the previously displayed record stays put,
				// only the phase surfaces the failure.
				log::warn!("search request {} failed: {err}", response.seq);
				self.phase = SearchPhase::Failed(err.to_string());
			}
		}
	}

	/// Current request state.
	#[must_use]
	pub fn phase(&self) -> &SearchPhase {
		&self.phase
	}

	/// Record from the newest successful search, if any.
	#[must_use]
	pub fn record(&self) -> Option<&WsiRecord> {
		self.record.as_ref()
	}

	/// Whether a request has been issued and not yet completed.
	#[must_use]
	pub fn is_in_flight(&self) -> bool {
		self.phase == SearchPhase::Loading
	}

	/// Ask the background worker to exit.
	pub fn shutdown(&self) {
		let _ = self.tx.send(SearchCommand::Shutdown);
	}
}

impl Drop for SearchCoordinator {
	fn drop(&mut self) {
		self.shutdown();
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;
	use std::sync::{Arc, Mutex};
	use std::time::{Duration, Instant};

	use super::super::SearchError;
	use super::*;

	type Script = Arc<Mutex<HashMap<String, Result<WsiRecord, SearchError>>>>;

	/// Backend whose completions are released manually per query, letting
	/// tests interleave slow and fast requests deterministically. A search
	/// blocks until the test publishes an outcome for its query.
	struct ScriptedBackend {
		outcomes: Script,
	}

	struct ScriptHandle {
		outcomes: Script,
	}

	impl ScriptHandle {
		fn complete(&self, query: &str, outcome: Result<WsiRecord, SearchError>) {
			self.outcomes
				.lock()
				.unwrap()
				.insert(query.to_string(), outcome);
		}
	}

	fn scripted() -> (ScriptHandle, ScriptedBackend) {
		let outcomes: Script = Arc::default();
		(
			ScriptHandle {
				outcomes: Arc::clone(&outcomes),
			},
			ScriptedBackend { outcomes },
		)
	}

	impl SearchBackend for ScriptedBackend {
		fn search(&self, query: &str, _boundary_text: &str) -> Result<WsiRecord, SearchError> {
			let deadline = Instant::now() + Duration::from_secs(2);
			while Instant::now() < deadline {
				if let Some(outcome) = self.outcomes.lock().unwrap().remove(query) {
					return outcome;
				}
				std::thread::sleep(Duration::from_millis(5));
			}
			Err(SearchError::Backend("script exhausted".into()))
		}
	}

	fn record(path: &str) -> WsiRecord {
		WsiRecord {
			path: path.to_string(),
			description: None,
			width: None,
			height: None,
		}
	}

	fn pump_until<F: Fn(&SearchCoordinator) -> bool>(coordinator: &mut SearchCoordinator, done: F) {
		let deadline = Instant::now() + Duration::from_secs(2);
		while !done(coordinator) && Instant::now() < deadline {
			std::thread::sleep(Duration::from_millis(5));
			coordinator.pump_responses();
		}
	}

	#[test]
	fn successful_search_replaces_the_record_wholesale() {
		let (script, backend) = scripted();
		let mut coordinator = SearchCoordinator::new(backend);

		coordinator.issue_search("cd34", "[0,0,10,10]");
		assert_eq!(coordinator.phase(), &SearchPhase::Loading);

		script.complete("cd34", Ok(record("slides/a.svs")));
		pump_until(&mut coordinator, |c| !c.is_in_flight());

		assert_eq!(coordinator.phase(), &SearchPhase::Success);
		assert_eq!(coordinator.record().map(|r| r.path.as_str()), Some("slides/a.svs"));

		coordinator.issue_search("ki67", "[0,0,10,10]");
		script.complete("ki67", Ok(record("slides/b.svs")));
		pump_until(&mut coordinator, |c| !c.is_in_flight());

		assert_eq!(coordinator.record().map(|r| r.path.as_str()), Some("slides/b.svs"));
	}

	#[test]
	fn failed_search_keeps_previous_record_and_surfaces_phase() {
		let (script, backend) = scripted();
		let mut coordinator = SearchCoordinator::new(backend);

		coordinator.issue_search("cd34", "[0,0,10,10]");
		script.complete("cd34", Ok(record("slides/a.svs")));
		pump_until(&mut coordinator, |c| !c.is_in_flight());

		coordinator.issue_search("bogus", "[0,0,10,10]");
		script.complete("bogus", Err(SearchError::Backend("connection refused".into())));
		pump_until(&mut coordinator, |c| !c.is_in_flight());

		assert!(
			matches!(coordinator.phase(), SearchPhase::Failed(reason) if reason.contains("connection refused")),
			"failure should be surfaced, got {:?}",
			coordinator.phase()
		);
		assert_eq!(
			coordinator.record().map(|r| r.path.as_str()),
			Some("slides/a.svs"),
			"failed search must leave the displayed record unchanged"
		);
	}

	#[test]
	fn stale_completion_is_discarded_when_a_newer_request_exists() {
		let (script, backend) = scripted();
		let mut coordinator = SearchCoordinator::new(backend);

		// First request starts; before its completion is released, a second
		// request supersedes it.
		coordinator.issue_search("slow", "[0,0,10,10]");
		coordinator.issue_search("fast", "[0,0,10,10]");

		// Release the old completion first, then the new one. If the worker
		// already skipped the superseded request, only the new outcome is
		// consumed.
		script.complete("slow", Ok(record("slides/old.svs")));
		script.complete("fast", Ok(record("slides/new.svs")));
		pump_until(&mut coordinator, |c| !c.is_in_flight());

		assert_eq!(
			coordinator.record().map(|r| r.path.as_str()),
			Some("slides/new.svs"),
			"only the newest request's completion may win"
		);
		assert_eq!(coordinator.phase(), &SearchPhase::Success);
	}

	#[test]
	fn phase_starts_idle_with_no_record() {
		let (_script, backend) = scripted();
		let coordinator = SearchCoordinator::new(backend);
		assert_eq!(coordinator.phase(), &SearchPhase::Idle);
		assert!(coordinator.record().is_none());
	}
}
