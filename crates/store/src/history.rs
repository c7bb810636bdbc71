//! Linear snapshot history with a movable cursor.

use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded, linear undo/redo history over immutable state snapshots.
///
/// The cursor always points at the entry equal to the present state. Pushing
/// while the cursor is not at the tail discards the redo branch first; there
/// is no branching history. When the depth bound is exceeded the oldest
/// entry is evicted and the cursor decremented to stay consistent.
#[derive(Debug)]
pub struct History<S> {
	entries: VecDeque<Arc<S>>,
	cursor: usize,
	depth: usize,
}

impl<S> History<S> {
	/// Creates a history seeded with a single entry.
	///
	/// A depth of zero is clamped to one; the seed entry always fits.
	pub fn new(seed: Arc<S>, depth: usize) -> Self {
		let mut entries = VecDeque::new();
		entries.push_back(seed);
		Self {
			entries,
			cursor: 0,
			depth: depth.max(1),
		}
	}

	/// Appends a snapshot after the cursor, discarding any redo branch.
	pub fn push(&mut self, snapshot: Arc<S>) {
		self.entries.truncate(self.cursor + 1);
		self.entries.push_back(snapshot);
		self.cursor += 1;
		if self.entries.len() > self.depth {
			self.entries.pop_front();
			self.cursor -= 1;
		}
	}

	/// Moves the cursor back one entry and returns that snapshot.
	///
	/// Returns `None` at the history boundary.
	pub fn step_back(&mut self) -> Option<Arc<S>> {
		if self.cursor == 0 {
			return None;
		}
		self.cursor -= 1;
		Some(Arc::clone(&self.entries[self.cursor]))
	}

	/// Moves the cursor forward one entry and returns that snapshot.
	///
	/// Returns `None` at the history boundary.
	pub fn step_forward(&mut self) -> Option<Arc<S>> {
		if self.cursor + 1 >= self.entries.len() {
			return None;
		}
		self.cursor += 1;
		Some(Arc::clone(&self.entries[self.cursor]))
	}

	/// Returns whether the cursor can move back.
	pub fn can_step_back(&self) -> bool {
		self.cursor > 0
	}

	/// Returns whether the cursor can move forward.
	pub fn can_step_forward(&self) -> bool {
		self.cursor + 1 < self.entries.len()
	}

	/// Returns the number of stored snapshots.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Always false: the seed entry is never evicted.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Discards all entries and reseeds a single-entry history.
	pub fn reseed(&mut self, seed: Arc<S>) {
		self.entries.clear();
		self.entries.push_back(seed);
		self.cursor = 0;
	}
}
