//! The observable store engine.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde_json::Value;
use slab::Slab;

use crate::action::{Action, REDO_ACTION, RESERVED_PREFIX, RESET_ACTION, UNDO_ACTION};
use crate::history::History;

/// Default bound on the number of history snapshots.
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Handle to a registered observer, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

type ReducerFn<S> = Box<dyn Fn(&Arc<S>, Option<&Value>) -> Arc<S> + Send>;
type MiddlewareFn<S> = Arc<dyn Fn(&Action, &Arc<S>, &mut dyn FnMut()) + Send + Sync>;
type ObserverFn<S> = Box<dyn FnMut(&Arc<S>, &Arc<S>, &Action) + Send>;

/// How a dispatch travelled through the middleware chain and reducer table.
enum ChainOutcome {
	/// Reducer produced a new state; history pushed, observers notified.
	Applied,
	/// Reducer returned the incoming reference; nothing recorded.
	Unchanged,
	/// No reducer registered for the action kind.
	NoReducer,
	/// A middleware did not call `proceed`.
	Halted { index: usize },
}

/// Single-owner observable state container.
///
/// Holds one `Arc<S>` state value, a registry of named reducers, an ordered
/// middleware chain and a bounded linear [`History`]. All operations are
/// synchronous; observers run inline during [`Store::dispatch`],
/// [`Store::undo`], [`Store::redo`] and [`Store::reset`].
///
/// There is no ambient global instance. Construct a store and pass it
/// explicitly to whatever owns the session.
pub struct Store<S> {
	state: Arc<S>,
	initial: Arc<S>,
	reducers: HashMap<String, ReducerFn<S>>,
	middleware: Vec<MiddlewareFn<S>>,
	observers: Slab<ObserverFn<S>>,
	history: History<S>,
}

impl<S> Store<S> {
	/// Creates a store with the default history depth.
	///
	/// Construction seeds the history with the initial value, so
	/// [`Store::history_len`] is 1 and [`Store::can_undo`] is false
	/// immediately afterwards.
	pub fn new(initial: S) -> Self {
		Self::with_history_depth(initial, DEFAULT_HISTORY_DEPTH)
	}

	/// Creates a store with an explicit history depth bound.
	pub fn with_history_depth(initial: S, depth: usize) -> Self {
		let initial = Arc::new(initial);
		Self {
			state: Arc::clone(&initial),
			history: History::new(Arc::clone(&initial), depth),
			initial,
			reducers: HashMap::new(),
			middleware: Vec::new(),
			observers: Slab::new(),
		}
	}

	/// Returns the current state.
	///
	/// Callers must treat the value as read-only; transitions only happen
	/// through [`Store::dispatch`].
	pub fn state(&self) -> &Arc<S> {
		&self.state
	}

	/// Applies a pure projection to the current state. No caching.
	pub fn select<R>(&self, selector: impl FnOnce(&S) -> R) -> R {
		selector(&self.state)
	}

	/// Registers an observer, returning a handle for unsubscription.
	///
	/// Observers receive `(new_state, prev_state, action)` synchronously
	/// after every committed change. Registering the same closure twice
	/// yields two independent notifications.
	pub fn subscribe(
		&mut self,
		observer: impl FnMut(&Arc<S>, &Arc<S>, &Action) + Send + 'static,
	) -> ObserverId {
		ObserverId(self.observers.insert(Box::new(observer)))
	}

	/// Removes an observer. Idempotent: returns false if already removed.
	pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
		self.observers.try_remove(id.0).is_some()
	}

	/// Appends a middleware to the chain.
	///
	/// Registration order is execution order, outermost first. A middleware
	/// that does not invoke `proceed` halts the chain: the reducer is never
	/// applied and no history entry is pushed. Halts are surfaced at debug
	/// level with the halting index.
	pub fn use_middleware(
		&mut self,
		middleware: impl Fn(&Action, &Arc<S>, &mut dyn FnMut()) + Send + Sync + 'static,
	) {
		self.middleware.push(Arc::new(middleware));
	}

	/// Registers a reducer for an action kind, replacing any existing one.
	///
	/// Kinds under [`RESERVED_PREFIX`] and the empty kind are refused with
	/// a warning; the engine owns those markers.
	pub fn add_reducer(
		&mut self,
		kind: impl Into<String>,
		reducer: impl Fn(&Arc<S>, Option<&Value>) -> Arc<S> + Send + 'static,
	) {
		let kind = kind.into();
		if kind.is_empty() || kind.starts_with(RESERVED_PREFIX) {
			tracing::warn!(action = %kind, "store.add_reducer.refused");
			return;
		}
		self.reducers.insert(kind, Box::new(reducer));
	}

	/// Dispatches an action through the middleware chain into its reducer.
	///
	/// If the reducer produces a new state reference, a history snapshot is
	/// pushed and observers are notified with the pre-dispatch state as
	/// `prev`. A reducer returning the incoming reference records nothing.
	/// Dispatching an unregistered kind is a logged no-op.
	pub fn dispatch(&mut self, action: Action) {
		let chain = self.middleware.clone();
		match self.run_chain(&chain, 0, &action) {
			ChainOutcome::Applied => {}
			ChainOutcome::Unchanged => {
				tracing::trace!(action = %action.kind, "store.dispatch.unchanged");
			}
			ChainOutcome::NoReducer => {
				tracing::debug!(action = %action.kind, "store.dispatch.no_reducer");
			}
			ChainOutcome::Halted { index } => {
				tracing::debug!(action = %action.kind, index, "store.dispatch.vetoed");
			}
		}
	}

	/// Restores the construction-time initial value and reseeds history.
	///
	/// Observers are notified with the [`RESET_ACTION`] marker.
	pub fn reset(&mut self) {
		let prev = std::mem::replace(&mut self.state, Arc::clone(&self.initial));
		self.history.reseed(Arc::clone(&self.initial));
		self.notify(&prev, &Action::new(RESET_ACTION));
	}

	/// Steps the history cursor back one entry.
	///
	/// Returns false at the boundary. On success the current state is
	/// replaced with the snapshot at the new cursor and observers are
	/// notified with the [`UNDO_ACTION`] marker.
	pub fn undo(&mut self) -> bool {
		let Some(snapshot) = self.history.step_back() else {
			return false;
		};
		let prev = std::mem::replace(&mut self.state, snapshot);
		self.notify(&prev, &Action::new(UNDO_ACTION));
		true
	}

	/// Steps the history cursor forward one entry.
	///
	/// Returns false at the boundary. Observers are notified with the
	/// [`REDO_ACTION`] marker.
	pub fn redo(&mut self) -> bool {
		let Some(snapshot) = self.history.step_forward() else {
			return false;
		};
		let prev = std::mem::replace(&mut self.state, snapshot);
		self.notify(&prev, &Action::new(REDO_ACTION));
		true
	}

	/// Returns whether undo is available. O(1).
	pub fn can_undo(&self) -> bool {
		self.history.can_step_back()
	}

	/// Returns whether redo is available. O(1).
	pub fn can_redo(&self) -> bool {
		self.history.can_step_forward()
	}

	/// Returns the number of history snapshots. O(1).
	pub fn history_len(&self) -> usize {
		self.history.len()
	}

	/// Runs middleware from `index` onward; at chain end applies the reducer.
	///
	/// Each hop sees the state at its own invocation time. `proceed` is
	/// idempotent within a hop: only the first call advances the chain.
	fn run_chain(&mut self, chain: &[MiddlewareFn<S>], index: usize, action: &Action) -> ChainOutcome {
		let Some(middleware) = chain.get(index) else {
			return self.apply_reducer(action);
		};
		let state = Arc::clone(&self.state);
		let mut outcome = ChainOutcome::Halted { index };
		let mut proceeded = false;
		let mut proceed = || {
			if !proceeded {
				proceeded = true;
				outcome = self.run_chain(chain, index + 1, action);
			}
		};
		middleware.as_ref()(action, &state, &mut proceed);
		outcome
	}

	fn apply_reducer(&mut self, action: &Action) -> ChainOutcome {
		let prev = Arc::clone(&self.state);
		let next = match self.reducers.get(&action.kind) {
			Some(reduce) => reduce(&prev, action.payload.as_ref()),
			None => return ChainOutcome::NoReducer,
		};
		if Arc::ptr_eq(&prev, &next) {
			return ChainOutcome::Unchanged;
		}
		self.state = Arc::clone(&next);
		self.history.push(next);
		self.notify(&prev, action);
		ChainOutcome::Applied
	}

	/// Delivers a notification to every observer in registration order.
	///
	/// Each call is isolated with `catch_unwind`; a panicking observer is
	/// logged and does not block delivery to the rest.
	fn notify(&mut self, prev: &Arc<S>, action: &Action) {
		let state = Arc::clone(&self.state);
		for (id, observer) in self.observers.iter_mut() {
			let delivered = panic::catch_unwind(AssertUnwindSafe(|| observer(&state, prev, action)));
			if delivered.is_err() {
				tracing::warn!(observer = id, action = %action.kind, "store.observer.panicked");
			}
		}
	}
}
