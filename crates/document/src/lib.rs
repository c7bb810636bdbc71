//! Editor document state over the observable store.
//!
//! A [`DocumentStore`] is a [`quill_store::Store`] preconfigured with the
//! document shape (content, cursor, selection, dirty flag) and a closed set
//! of reducers implementing text-splice semantics. The action set is a
//! tagged enum, [`DocAction`]; it converts into the engine's string-keyed
//! [`quill_store::Action`] at the dispatch boundary.
//!
//! All splice operations work on character offsets into the content. Out of
//! range offsets are clamped, and reversed ranges are reordered, before any
//! slicing happens.

#[cfg(test)]
mod tests;

mod actions;
mod state;

use std::sync::Arc;

use quill_store::{ObserverId, Store};

pub use actions::{DocAction, kinds};
pub use state::{DocumentState, Selection};

use actions::{InsertPayload, RangePayload, ReplacePayload};
use state::{char_count, splice};

/// A [`Store`] specialized for editor-document state.
///
/// Owns the underlying engine and registers the document reducers at
/// construction. Typed dispatch goes through [`DocumentStore::dispatch`];
/// the engine remains reachable for subscriptions and generic middleware.
pub struct DocumentStore {
	store: Store<DocumentState>,
}

impl DocumentStore {
	/// Creates a document store with the default history depth.
	pub fn new(initial: DocumentState) -> Self {
		Self::with_history_depth(initial, quill_store::DEFAULT_HISTORY_DEPTH)
	}

	/// Creates a document store with an explicit history depth bound.
	pub fn with_history_depth(initial: DocumentState, depth: usize) -> Self {
		let mut store = Store::with_history_depth(initial, depth);
		register_reducers(&mut store);
		Self { store }
	}

	/// Returns the current document state.
	pub fn state(&self) -> &DocumentState {
		self.store.state()
	}

	/// Dispatches a typed document action.
	pub fn dispatch(&mut self, action: DocAction) {
		self.store.dispatch(action.into());
	}

	/// Registers an observer on the underlying engine.
	pub fn subscribe(
		&mut self,
		observer: impl FnMut(&Arc<DocumentState>, &Arc<DocumentState>, &quill_store::Action) + Send + 'static,
	) -> ObserverId {
		self.store.subscribe(observer)
	}

	/// Removes an observer. Idempotent.
	pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
		self.store.unsubscribe(id)
	}

	/// Steps document history back one entry.
	pub fn undo(&mut self) -> bool {
		self.store.undo()
	}

	/// Steps document history forward one entry.
	pub fn redo(&mut self) -> bool {
		self.store.redo()
	}

	/// Returns whether undo is available.
	pub fn can_undo(&self) -> bool {
		self.store.can_undo()
	}

	/// Returns whether redo is available.
	pub fn can_redo(&self) -> bool {
		self.store.can_redo()
	}

	/// Returns the number of history snapshots.
	pub fn history_len(&self) -> usize {
		self.store.history_len()
	}

	/// Restores the construction-time document and clears history.
	pub fn reset(&mut self) {
		self.store.reset();
	}

	/// Borrows the underlying engine.
	pub fn engine(&self) -> &Store<DocumentState> {
		&self.store
	}

	/// Mutably borrows the underlying engine.
	///
	/// Raw dispatches bypass the typed action set; malformed payloads are
	/// logged no-ops.
	pub fn engine_mut(&mut self) -> &mut Store<DocumentState> {
		&mut self.store
	}
}

/// Logs a malformed payload and leaves the state untouched.
fn malformed(state: &Arc<DocumentState>, kind: &str) -> Arc<DocumentState> {
	tracing::warn!(action = kind, "document.reducer.malformed_payload");
	Arc::clone(state)
}

fn with_content(state: &DocumentState, content: String) -> DocumentState {
	let mut next = state.clone();
	next.is_dirty = content != next.last_saved_content;
	next.content = content;
	next
}

fn register_reducers(store: &mut Store<DocumentState>) {
	store.add_reducer(kinds::SET_CONTENT, |state, payload| {
		let Some(text) = payload.and_then(|p| p.as_str()) else {
			return malformed(state, kinds::SET_CONTENT);
		};
		if text == state.content {
			return Arc::clone(state);
		}
		Arc::new(with_content(state, text.to_string()))
	});

	store.add_reducer(kinds::SET_CURSOR, |state, payload| {
		let Some(offset) = payload.and_then(|p| p.as_u64()) else {
			return malformed(state, kinds::SET_CURSOR);
		};
		let cursor = (offset as usize).min(char_count(&state.content));
		if cursor == state.cursor {
			return Arc::clone(state);
		}
		let mut next = DocumentState::clone(state);
		next.cursor = cursor;
		Arc::new(next)
	});

	store.add_reducer(kinds::SET_SELECTION, |state, payload| {
		let Some(range) = payload.and_then(|p| RangePayload::decode(p)) else {
			return malformed(state, kinds::SET_SELECTION);
		};
		let selection = Selection::ordered(range.from, range.to).clamped(&state.content);
		if selection == state.selection {
			return Arc::clone(state);
		}
		let mut next = DocumentState::clone(state);
		next.selection = selection;
		Arc::new(next)
	});

	store.add_reducer(kinds::SET_FILE_PATH, |state, payload| {
		let path = match payload {
			None | Some(serde_json::Value::Null) => None,
			Some(value) => match value.as_str() {
				Some(path) => Some(std::path::PathBuf::from(path)),
				None => return malformed(state, kinds::SET_FILE_PATH),
			},
		};
		if path == state.file_path {
			return Arc::clone(state);
		}
		let mut next = DocumentState::clone(state);
		next.file_path = path;
		Arc::new(next)
	});

	store.add_reducer(kinds::SET_LANGUAGE, |state, payload| {
		let Some(language) = payload.and_then(|p| p.as_str()) else {
			return malformed(state, kinds::SET_LANGUAGE);
		};
		if language == state.language {
			return Arc::clone(state);
		}
		let mut next = DocumentState::clone(state);
		next.language = language.to_string();
		Arc::new(next)
	});

	store.add_reducer(kinds::MARK_SAVED, |state, _payload| {
		if !state.is_dirty && state.last_saved_content == state.content {
			return Arc::clone(state);
		}
		let mut next = DocumentState::clone(state);
		next.last_saved_content = next.content.clone();
		next.is_dirty = false;
		Arc::new(next)
	});

	store.add_reducer(kinds::INSERT_TEXT, |state, payload| {
		let Some(insert) = payload.and_then(|p| InsertPayload::decode(p)) else {
			return malformed(state, kinds::INSERT_TEXT);
		};
		if insert.text.is_empty() {
			return Arc::clone(state);
		}
		let at = insert.at.min(char_count(&state.content));
		let content = splice(&state.content, at, at, &insert.text);
		let mut next = with_content(state, content);
		next.cursor = at + char_count(&insert.text);
		Arc::new(next)
	});

	store.add_reducer(kinds::DELETE_RANGE, |state, payload| {
		let Some(range) = payload.and_then(|p| RangePayload::decode(p)) else {
			return malformed(state, kinds::DELETE_RANGE);
		};
		let Selection { from, to } = Selection::ordered(range.from, range.to).clamped(&state.content);
		if from == to {
			return Arc::clone(state);
		}
		let content = splice(&state.content, from, to, "");
		let mut next = with_content(state, content);
		next.cursor = from;
		next.selection = Selection::caret(from);
		Arc::new(next)
	});

	store.add_reducer(kinds::REPLACE_RANGE, |state, payload| {
		let Some(replace) = payload.and_then(|p| ReplacePayload::decode(p)) else {
			return malformed(state, kinds::REPLACE_RANGE);
		};
		let Selection { from, to } = Selection::ordered(replace.from, replace.to).clamped(&state.content);
		if from == to && replace.text.is_empty() {
			return Arc::clone(state);
		}
		let content = splice(&state.content, from, to, &replace.text);
		let end = from + char_count(&replace.text);
		let mut next = with_content(state, content);
		next.cursor = end;
		next.selection = Selection::caret(end);
		Arc::new(next)
	});
}
