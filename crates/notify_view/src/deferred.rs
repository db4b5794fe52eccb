//! Timer-scheduled callbacks run on the view pump.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use xeno_notify_host::NotifyHandle;

/// Delay between a host open/close event and the configured listener.
pub const CALLBACK_DELAY: Duration = Duration::from_millis(10);

/// Listener invocation waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredCallback {
	Open { handle: NotifyHandle },
	Close { handle: NotifyHandle },
}

/// Queue entry carrying due time and sequence metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredTask {
	pub callback: DeferredCallback,
	pub due_at: Instant,
	pub seq: u64,
}

/// Tasks ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct DeferredQueue {
	seq_next: u64,
	tasks: BTreeMap<(Instant, u64), DeferredCallback>,
}

impl DeferredQueue {
	/// Schedules `callback` to run `delay` after `now` and returns its sequence number.
	pub fn schedule(&mut self, now: Instant, delay: Duration, callback: DeferredCallback) -> u64 {
		let seq = self.seq_next;
		self.seq_next = self.seq_next.wrapping_add(1);
		self.tasks.insert((now + delay, seq), callback);
		seq
	}

	/// Pops the earliest task whose due time is at or before `now`.
	pub fn pop_due(&mut self, now: Instant) -> Option<DeferredTask> {
		let entry = self.tasks.first_entry()?;
		let (due_at, seq) = *entry.key();
		if due_at > now {
			return None;
		}
		let callback = entry.remove();
		Some(DeferredTask { callback, due_at, seq })
	}

	/// Returns the due time of the earliest task.
	pub fn next_due(&self) -> Option<Instant> {
		self.tasks.keys().next().map(|(due_at, _)| *due_at)
	}

	pub fn len(&self) -> usize {
		self.tasks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tasks.is_empty()
	}
}
