//! Core state container for the terminal viewer.
//!
//! The [`App`] bundles the three independently-updated flows: boundary text
//! edited on every keystroke, search requests resolved by a background
//! worker, and image updates arriving over the stream subscription. Each
//! flow has exactly one writer; the overlay is re-derived from whatever
//! state exists when the frame is drawn.

mod render;

use ratatui::crossterm::event::{KeyCode, KeyEvent};
use slidescope_core::search::SearchBackend;
use slidescope_core::{ImageUpdate, SearchCoordinator, ViewerSession};
use slidescope_stream::Subscription;
use std::sync::mpsc::TryRecvError;
use throbber_widgets_tui::ThrobberState;

/// Which input field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
	Query,
	Boundary,
}

/// Aggregate state for the terminal viewer session.
pub struct App<'a> {
	pub(crate) session: ViewerSession,
	pub(crate) search: SearchCoordinator,
	pub(crate) updates: Subscription<ImageUpdate>,
	pub(crate) query_input: crate::QueryInput<'a>,
	pub(crate) boundary_input: crate::QueryInput<'a>,
	pub(crate) focus: Focus,
	pub(crate) throbber_state: ThrobberState,
}

impl<'a> App<'a> {
	/// Construct an [`App`] over the provided collaborators.
	pub fn new<B>(
		backend: B,
		updates: Subscription<ImageUpdate>,
		initial_query: String,
		initial_boundary: String,
	) -> Self
	where
		B: SearchBackend + Send + 'static,
	{
		let session = ViewerSession::new(initial_boundary.clone());
		let search = SearchCoordinator::new(backend);

		Self {
			session,
			search,
			updates,
			query_input: crate::QueryInput::new("Query", initial_query, "slide to search for"),
			boundary_input: crate::QueryInput::new(
				"Boundary",
				initial_boundary,
				"[left, top, right, bottom]",
			),
			focus: Focus::Query,
			throbber_state: ThrobberState::default(),
		}
	}

	/// Issue a search for whatever is typed right now; the boundary text
	/// travels verbatim even when it does not parse.
	pub(crate) fn submit_search(&mut self) {
		log::debug!("search submitted for '{}'", self.query_input.text());
		self.search
			.issue_search(self.query_input.text(), self.boundary_input.text());
	}

	/// Process a keyboard event. Returns `true` when the user exits.
	pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
		match key.code {
			KeyCode::Esc => return true,
			KeyCode::Enter => self.submit_search(),
			KeyCode::Tab | KeyCode::BackTab => {
				self.focus = match self.focus {
					Focus::Query => Focus::Boundary,
					Focus::Boundary => Focus::Query,
				};
			}
			_ => match self.focus {
				Focus::Query => {
					self.query_input.input(key);
				}
				Focus::Boundary => {
					if self.boundary_input.input(key) {
						self.session.set_boundary_text(self.boundary_input.text());
					}
				}
			},
		}
		false
	}

	/// Drain search completions waiting on the worker channel.
	pub(crate) fn pump_search_responses(&mut self) {
		self.search.pump_responses();
	}

	/// Drain image updates waiting on the stream subscription. Each delivery
	/// fully supersedes the previous one.
	pub(crate) fn pump_image_updates(&mut self) {
		loop {
			match self.updates.try_recv() {
				Ok(envelope) => self.session.apply_update(envelope.payload),
				Err(TryRecvError::Empty) => break,
				Err(TryRecvError::Disconnected) => break,
			}
		}
	}

	/// Issue the first search when the session starts with a query.
	pub(crate) fn hydrate_initial_search(&mut self) {
		if !self.query_input.text().is_empty() {
			self.submit_search();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use ratatui::crossterm::event::KeyModifiers;
	use serde_json::json;
	use slidescope_core::search::{CatalogBackend, SearchPhase, WsiRecord};
	use slidescope_core::CenterPoint;
	use slidescope_stream::IterSource;

	use super::*;

	fn key(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn catalog() -> CatalogBackend {
		CatalogBackend::from_records(vec![WsiRecord {
			path: "slides/liver_001.svs".into(),
			description: Some("Liver biopsy".into()),
			width: None,
			height: None,
		}])
	}

	fn no_updates() -> Subscription<ImageUpdate> {
		Subscription::spawn(IterSource::new(Vec::<ImageUpdate>::new()))
	}

	fn app_with_updates(updates: Vec<ImageUpdate>) -> App<'static> {
		App::new(
			catalog(),
			Subscription::spawn(IterSource::new(updates)),
			String::new(),
			"[0,0,10,10]".into(),
		)
	}

	fn pump_updates_until<F: Fn(&App<'_>) -> bool>(app: &mut App<'_>, done: F) {
		let deadline = Instant::now() + Duration::from_secs(1);
		while !done(app) && Instant::now() < deadline {
			std::thread::sleep(Duration::from_millis(5));
			app.pump_image_updates();
		}
	}

	#[test]
	fn boundary_keystrokes_flow_into_the_session() {
		let mut app = App::new(catalog(), no_updates(), String::new(), String::new());
		app.handle_key(key(KeyCode::Tab));
		assert_eq!(app.focus, Focus::Boundary);

		for ch in "[0,0,4,6]".chars() {
			app.handle_key(key(KeyCode::Char(ch)));
		}
		assert_eq!(app.session.boundary_text(), "[0,0,4,6]");
		assert_eq!(app.session.center(), Some(CenterPoint { x: 2.0, y: 3.0 }));
	}

	#[test]
	fn enter_submits_and_completion_lands_in_phase() {
		let mut app = App::new(catalog(), no_updates(), "liver".into(), String::new());
		app.handle_key(key(KeyCode::Enter));
		assert_eq!(app.search.phase(), &SearchPhase::Loading);

		let deadline = Instant::now() + Duration::from_secs(1);
		while app.search.is_in_flight() && Instant::now() < deadline {
			std::thread::sleep(Duration::from_millis(5));
			app.pump_search_responses();
		}
		assert_eq!(app.search.phase(), &SearchPhase::Success);
		assert_eq!(
			app.search.record().map(|r| r.path.as_str()),
			Some("slides/liver_001.svs")
		);
	}

	#[test]
	fn streamed_updates_produce_an_overlay() {
		let mut app = app_with_updates(vec![ImageUpdate {
			url: "http://tiles/1.png".into(),
			path: "p1".into(),
			vector: json!([1, 2]),
		}]);

		pump_updates_until(&mut app, |a| a.session.overlay().is_some());

		let overlay = app.session.overlay().expect("overlay after update");
		assert_eq!(overlay.image_url, "http://tiles/1.png");
		assert_eq!(
			overlay.points,
			("p1".into(), CenterPoint { x: 5.0, y: 5.0 })
		);
	}

	#[test]
	fn later_updates_supersede_earlier_ones() {
		let mut app = app_with_updates(vec![
			ImageUpdate {
				url: "img1".into(),
				path: "p1".into(),
				vector: json!([1, 2]),
			},
			ImageUpdate {
				url: "img2".into(),
				path: "p2".into(),
				vector: json!([9]),
			},
		]);

		pump_updates_until(&mut app, |a| {
			a.session.latest_update().is_some_and(|u| u.url == "img2")
		});

		let overlay = app.session.overlay().expect("overlay present");
		assert_eq!(overlay.image_url, "img2");
		assert_eq!(overlay.points.0, "p2");
		assert_eq!(overlay.vector, json!([9]));
	}

	#[test]
	fn esc_requests_exit() {
		let mut app = App::new(catalog(), no_updates(), String::new(), String::new());
		assert!(app.handle_key(key(KeyCode::Esc)));
	}
}
