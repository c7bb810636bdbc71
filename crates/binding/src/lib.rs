//! Subscription bridge between a [`Store`] and a reactive view layer.
//!
//! A [`ViewBinding`] owns its store, subscribes once at bind time, and
//! mirrors a derived projection of the state into a refresh callback. The
//! callback fires only when the projection actually changes, so views keyed
//! to a narrow slice of state are not re-rendered by unrelated transitions.
//!
//! Undo/redo availability is mirrored into plain flags, refreshed after
//! every imperative call and once eagerly at bind time, so a view can read
//! them without touching the store.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use parking_lot::Mutex;
use quill_store::{Action, ObserverId, Store};

struct BindingShared<P> {
	projection: P,
	on_refresh: Box<dyn FnMut(&P) + Send>,
}

/// A store bound to one view.
///
/// The binding takes exclusive ownership of the store; every mutation goes
/// through the binding's imperative surface, which keeps the mirrored
/// undo/redo flags honest. [`ViewBinding::unbind`] detaches the observer
/// and hands the store back.
pub struct ViewBinding<S, P>
where
	P: PartialEq + Clone + Send + 'static,
{
	store: Store<S>,
	observer: ObserverId,
	shared: Arc<Mutex<BindingShared<P>>>,
	can_undo: bool,
	can_redo: bool,
}

impl<S, P> ViewBinding<S, P>
where
	S: Send + Sync + 'static,
	P: PartialEq + Clone + Send + 'static,
{
	/// Binds a store to a view.
	///
	/// `selector` derives the rendered projection (use the identity closure
	/// to mirror the whole state). `on_refresh` runs once immediately with
	/// the initial projection, then again on every notification whose
	/// recomputed projection differs from the last rendered one.
	pub fn bind(
		mut store: Store<S>,
		selector: impl Fn(&S) -> P + Send + Sync + 'static,
		on_refresh: impl FnMut(&P) + Send + 'static,
	) -> Self {
		let initial = selector(store.state());
		let shared = Arc::new(Mutex::new(BindingShared {
			projection: initial,
			on_refresh: Box::new(on_refresh),
		}));
		{
			let mut inner = shared.lock();
			let BindingShared { projection, on_refresh } = &mut *inner;
			on_refresh(projection);
		}

		let observer_shared = Arc::clone(&shared);
		let observer = store.subscribe(move |state: &Arc<S>, _prev: &Arc<S>, _action: &Action| {
			let next = selector(state);
			let mut inner = observer_shared.lock();
			let BindingShared { projection, on_refresh } = &mut *inner;
			if *projection != next {
				*projection = next;
				on_refresh(projection);
			}
		});

		let can_undo = store.can_undo();
		let can_redo = store.can_redo();
		Self {
			store,
			observer,
			shared,
			can_undo,
			can_redo,
		}
	}

	/// Dispatches an action and refreshes the mirrored flags.
	pub fn dispatch(&mut self, action: Action) {
		self.store.dispatch(action);
		self.sync_flags();
	}

	/// Undoes one step. Returns false at the history boundary.
	pub fn undo(&mut self) -> bool {
		let stepped = self.store.undo();
		self.sync_flags();
		stepped
	}

	/// Redoes one step. Returns false at the history boundary.
	pub fn redo(&mut self) -> bool {
		let stepped = self.store.redo();
		self.sync_flags();
		stepped
	}

	/// Resets the store to its construction-time state.
	pub fn reset(&mut self) {
		self.store.reset();
		self.sync_flags();
	}

	/// Mirrored undo availability.
	pub fn can_undo(&self) -> bool {
		self.can_undo
	}

	/// Mirrored redo availability.
	pub fn can_redo(&self) -> bool {
		self.can_redo
	}

	/// Returns the last rendered projection.
	pub fn projection(&self) -> P {
		self.shared.lock().projection.clone()
	}

	/// Borrows the underlying store.
	pub fn store(&self) -> &Store<S> {
		&self.store
	}

	/// Mutably borrows the underlying store.
	///
	/// Intended for configuration (reducers, middleware). History moves made
	/// directly through this borrow bypass the mirrored flag sync; go through
	/// the binding's imperative surface for those.
	pub fn store_mut(&mut self) -> &mut Store<S> {
		&mut self.store
	}

	/// Detaches the view observer and returns the store.
	pub fn unbind(mut self) -> Store<S> {
		self.store.unsubscribe(self.observer);
		self.store
	}

	fn sync_flags(&mut self) {
		self.can_undo = self.store.can_undo();
		self.can_redo = self.store.can_redo();
	}
}
