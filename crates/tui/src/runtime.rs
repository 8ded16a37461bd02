//! Application runtime and event loop.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use crate::App;

/// Run the provided [`App`] to completion.
pub fn run(app: &mut App<'_>) -> Result<()> {
	let mut terminal = ratatui::init();
	terminal.clear()?;

	app.hydrate_initial_search();

	let (event_tx, event_rx) = mpsc::channel();
	let event_loop_running = Arc::new(AtomicBool::new(true));
	let event_loop_flag = Arc::clone(&event_loop_running);

	let event_thread = thread::spawn(move || -> Result<()> {
		while event_loop_flag.load(Ordering::Relaxed) {
			if event::poll(Duration::from_millis(50))? {
				let event = event::read()?;
				if event_tx.send(event).is_err() {
					break;
				}
			}
		}
		Ok(())
	});

	let mut pending_events = VecDeque::new();

	let result: Result<()> = 'event_loop: loop {
		loop {
			match event_rx.try_recv() {
				Ok(event) => pending_events.push_back(event),
				Err(mpsc::TryRecvError::Empty) => break,
				Err(mpsc::TryRecvError::Disconnected) => {
					break 'event_loop Err(anyhow!("input event channel disconnected"));
				}
			}
		}

		let mut exit_requested = false;
		while let Some(event) = pending_events.pop_front() {
			match event {
				Event::Key(key) if key.kind == KeyEventKind::Press => {
					if app.handle_key(key) {
						exit_requested = true;
						break;
					}
				}
				_ => {}
			}
		}

		if exit_requested {
			break Ok(());
		}

		app.pump_search_responses();
		app.pump_image_updates();
		app.throbber_state.calc_next();

		terminal.draw(|frame| app.draw(frame))?;

		thread::sleep(Duration::from_millis(16));
	};

	ratatui::restore();

	event_loop_running.store(false, Ordering::Relaxed);
	match event_thread.join() {
		Ok(join_result) => join_result?,
		Err(err) => std::panic::resume_unwind(err),
	}

	result
}
