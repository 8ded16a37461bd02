//! Streaming primitives for delivering live payloads across threads without
//! blocking the consumer.
//!
//! The base types wrap an [`mpsc`] channel so background producers can hand
//! sequence-stamped payloads to a UI thread that drains them once per tick.
//! The sequence number is the correlation key: consumers that only care about
//! the newest delivery compare it against the highest number they have seen
//! and drop anything older.
//!
//! [`Subscription`] builds on top by owning the producer thread for a pull
//! source, covering the common case of a long-lived feed that is established
//! once per session and torn down when the session ends.
//!
//! ```
//! use slidescope_stream::{IterSource, Subscription};
//!
//! let sub = Subscription::spawn(IterSource::new(vec!["a", "b"]));
//! // Consumer side: drain with `try_recv` from the event loop tick.
//! let first = sub.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
//! assert_eq!(first.seq, 1);
//! assert_eq!(first.payload, "a");
//! ```
//!
//! [`mpsc`]: std::sync::mpsc

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Message emitted by a background producer and delivered to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateEnvelope<P> {
	/// Monotonically increasing delivery number within the stream.
	pub seq: u64,
	/// Payload delivered to the consumer.
	pub payload: P,
}

impl<P> UpdateEnvelope<P> {
	/// Transform the payload while preserving the sequence number.
	pub fn map_payload<N>(self, f: impl FnOnce(P) -> N) -> UpdateEnvelope<N> {
		UpdateEnvelope {
			seq: self.seq,
			payload: f(self.payload),
		}
	}
}

/// Handle for producing stream messages backed by an [`mpsc::Sender`].
///
/// Each handle carries a fixed sequence number, so a producer responding to a
/// particular request stamps every message with that request's id.
pub struct UpdateStream<'a, P> {
	tx: &'a Sender<UpdateEnvelope<P>>,
	seq: u64,
}

impl<'a, P: Send + 'static> UpdateStream<'a, P> {
	/// Create a new handle backed by the provided sender.
	#[must_use]
	pub fn new(tx: &'a Sender<UpdateEnvelope<P>>, seq: u64) -> Self {
		Self { tx, seq }
	}

	/// Sequence number stamped onto every payload sent through this handle.
	#[must_use]
	pub fn seq(&self) -> u64 {
		self.seq
	}

	/// Emit a payload to the consumer. Returns `false` once the consumer has
	/// hung up, letting producers stop early.
	pub fn send(&self, payload: P) -> bool {
		self.tx
			.send(UpdateEnvelope {
				seq: self.seq,
				payload,
			})
			.is_ok()
	}
}

impl<'a, P> Clone for UpdateStream<'a, P> {
	fn clone(&self) -> Self {
		Self {
			tx: self.tx,
			seq: self.seq,
		}
	}
}

/// Blocking pull source feeding a [`Subscription`].
///
/// Implementors own the transport entirely, including reconnection; the
/// consumer only ever observes a sequence of items ending with `None`.
pub trait UpdateSource {
	/// Item type delivered by the source.
	type Item: Send + 'static;

	/// Block until the next item is available, or return `None` when the
	/// source is exhausted or permanently disconnected.
	fn next_item(&mut self) -> Option<Self::Item>;
}

/// Adapter turning any iterator into an [`UpdateSource`].
pub struct IterSource<I> {
	inner: I,
}

impl<I> IterSource<I> {
	/// Wrap an iterable so it can back a [`Subscription`].
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self {
			inner: iter.into_iter(),
		}
	}
}

impl<I> UpdateSource for IterSource<I>
where
	I: Iterator,
	I::Item: Send + 'static,
{
	type Item = I::Item;

	fn next_item(&mut self) -> Option<Self::Item> {
		self.inner.next()
	}
}

/// Long-lived feed pumping a source into a channel on a background thread.
///
/// Deliveries are stamped with increasing sequence numbers starting at 1. The
/// subscription is the sole owner of delivery for its payload type; dropping
/// it signals the producer thread to stop after the item it is currently
/// pulling.
pub struct Subscription<T> {
	rx: Receiver<UpdateEnvelope<T>>,
	running: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Subscription<T> {
	/// Spawn the producer thread for the provided source.
	#[must_use]
	pub fn spawn<S>(mut source: S) -> Self
	where
		S: UpdateSource<Item = T> + Send + 'static,
	{
		let (tx, rx) = mpsc::channel();
		let running = Arc::new(AtomicBool::new(true));
		let flag = Arc::clone(&running);

		let handle = thread::spawn(move || {
			let mut seq: u64 = 0;
			while flag.load(Ordering::Relaxed) {
				let Some(item) = source.next_item() else {
					log::debug!("update source exhausted after {seq} deliveries");
					break;
				};
				seq += 1;
				let stream = UpdateStream::new(&tx, seq);
				if !stream.send(item) {
					break;
				}
			}
		});

		Self {
			rx,
			running,
			handle: Some(handle),
		}
	}

	/// Drain the next pending delivery without blocking.
	pub fn try_recv(&self) -> Result<UpdateEnvelope<T>, TryRecvError> {
		self.rx.try_recv()
	}

	/// Block for the next delivery up to the given duration.
	pub fn recv_timeout(&self, timeout: Duration) -> Result<UpdateEnvelope<T>, RecvTimeoutError> {
		self.rx.recv_timeout(timeout)
	}

	/// Whether the producer thread has finished on its own.
	#[must_use]
	pub fn is_finished(&self) -> bool {
		self.handle.as_ref().is_none_or(JoinHandle::is_finished)
	}
}

impl<T> Drop for Subscription<T> {
	fn drop(&mut self) {
		self.running.store(false, Ordering::Relaxed);
		// The producer may be blocked inside the source; the dropped receiver
		// makes its next send fail, so it is left to unwind on its own rather
		// than joined here.
		drop(self.handle.take());
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use super::*;

	#[test]
	fn envelopes_are_stamped_in_order() {
		let sub = Subscription::spawn(IterSource::new(vec![10u32, 20, 30]));

		let mut received = Vec::new();
		for _ in 0..3 {
			let envelope = sub
				.recv_timeout(Duration::from_secs(1))
				.expect("producer should deliver all items");
			received.push((envelope.seq, envelope.payload));
		}

		assert_eq!(received, vec![(1, 10), (2, 20), (3, 30)]);
	}

	#[test]
	fn exhausted_source_disconnects_channel() {
		let sub = Subscription::spawn(IterSource::new(Vec::<u8>::new()));

		let deadline = std::time::Instant::now() + Duration::from_secs(1);
		loop {
			match sub.try_recv() {
				Err(TryRecvError::Disconnected) => break,
				Err(TryRecvError::Empty) if std::time::Instant::now() < deadline => {
					std::thread::sleep(Duration::from_millis(5));
				}
				other => panic!("expected disconnect, got {other:?}"),
			}
		}
	}

	#[test]
	fn map_payload_preserves_sequence() {
		let envelope = UpdateEnvelope { seq: 7, payload: 2 };
		let mapped = envelope.map_payload(|n| n * 2);
		assert_eq!(mapped.seq, 7);
		assert_eq!(mapped.payload, 4);
	}

	#[test]
	fn stream_send_reports_hangup() {
		let (tx, rx) = mpsc::channel::<UpdateEnvelope<u8>>();
		let stream = UpdateStream::new(&tx, 1);
		assert!(stream.send(1), "send should succeed while receiver lives");
		drop(rx);
		assert!(!stream.send(2), "send should fail after receiver is dropped");
	}
}
