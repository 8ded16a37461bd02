//! Background search worker thread and command infrastructure.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use slidescope_stream::{UpdateEnvelope, UpdateStream};

use super::{SearchBackend, SearchError, WsiRecord};

/// Completion delivered back to the UI thread, stamped with the request id.
pub type SearchResponse = UpdateEnvelope<Result<WsiRecord, SearchError>>;

/// Commands understood by the background search worker.
#[derive(Debug)]
pub enum SearchCommand {
	/// Run a search for the provided query and boundary text.
	Query {
		/// Identifier that allows the UI to correlate responses with the
		/// originating request.
		id: u64,
		/// User supplied query string.
		query: String,
		/// Boundary text forwarded to the collaborator verbatim.
		boundary: String,
	},
	/// Stop the background worker thread.
	Shutdown,
}

/// Launches the background search worker thread and returns communication
/// channels plus the shared latest-request counter.
pub fn spawn<B>(backend: B) -> (Sender<SearchCommand>, Receiver<SearchResponse>, Arc<AtomicU64>)
where
	B: SearchBackend + Send + 'static,
{
	let (command_tx, command_rx) = mpsc::channel();
	let (response_tx, response_rx) = mpsc::channel();
	let latest_request_id = Arc::new(AtomicU64::new(0));
	let thread_latest = Arc::clone(&latest_request_id);

	thread::spawn(move || worker_loop(&backend, command_rx, response_tx, thread_latest));

	(command_tx, response_rx, latest_request_id)
}

fn worker_loop<B: SearchBackend>(
	backend: &B,
	command_rx: Receiver<SearchCommand>,
	response_tx: Sender<SearchResponse>,
	latest_request_id: Arc<AtomicU64>,
) {
	while let Ok(command) = command_rx.recv() {
		if !handle_command(backend, &response_tx, &latest_request_id, command) {
			break;
		}
	}
}

fn handle_command<B: SearchBackend>(
	backend: &B,
	response_tx: &Sender<SearchResponse>,
	latest_request_id: &Arc<AtomicU64>,
	command: SearchCommand,
) -> bool {
	match command {
		SearchCommand::Query {
			id,
			query,
			boundary,
		} => {
			// Skip requests that were superseded while queued.
			if latest_request_id.load(Ordering::Acquire) > id {
				log::debug!("skipping superseded search request {id}");
				return true;
			}

			let outcome = backend.search(&query, &boundary);
			let stream = UpdateStream::new(response_tx, id);
			stream.send(outcome)
		}
		SearchCommand::Shutdown => false,
	}
}
