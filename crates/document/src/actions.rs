//! The closed document action set and its engine encoding.

use std::path::PathBuf;

use quill_store::Action;
use serde::Deserialize;
use serde_json::{Value, json};

/// Engine action kinds for the document reducers.
pub mod kinds {
	/// Replaces the whole content.
	pub const SET_CONTENT: &str = "document/set-content";
	/// Moves the cursor.
	pub const SET_CURSOR: &str = "document/set-cursor";
	/// Sets the selection range.
	pub const SET_SELECTION: &str = "document/set-selection";
	/// Sets or clears the backing file path.
	pub const SET_FILE_PATH: &str = "document/set-file-path";
	/// Sets the language identifier.
	pub const SET_LANGUAGE: &str = "document/set-language";
	/// Rebaselines the saved content and clears the dirty flag.
	pub const MARK_SAVED: &str = "document/mark-saved";
	/// Inserts text at a character offset.
	pub const INSERT_TEXT: &str = "document/insert-text";
	/// Deletes a character range.
	pub const DELETE_RANGE: &str = "document/delete-range";
	/// Replaces a character range with new text.
	pub const REPLACE_RANGE: &str = "document/replace-range";
}

/// A document state transition.
///
/// The closed counterpart of the engine's dynamic action table: every
/// variant maps to exactly one registered reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum DocAction {
	/// Replace the whole content, recomputing the dirty flag.
	SetContent(String),
	/// Move the cursor to a character offset.
	SetCursor(usize),
	/// Select a character range.
	SetSelection {
		/// Start offset.
		from: usize,
		/// End offset.
		to: usize,
	},
	/// Set or clear the backing file path.
	SetFilePath(Option<PathBuf>),
	/// Change the language identifier.
	SetLanguage(String),
	/// Rebaseline the saved content and clear the dirty flag.
	MarkSaved,
	/// Insert text at a character offset, advancing the cursor.
	InsertText {
		/// Insertion offset.
		at: usize,
		/// Text to insert.
		text: String,
	},
	/// Delete a character range, collapsing the selection to its start.
	DeleteRange {
		/// Start offset.
		from: usize,
		/// End offset.
		to: usize,
	},
	/// Replace a character range, moving the cursor past the new text.
	ReplaceRange {
		/// Start offset.
		from: usize,
		/// End offset.
		to: usize,
		/// Replacement text.
		text: String,
	},
}

impl DocAction {
	/// Returns whether this action can change the document content.
	///
	/// Content edits feed the suggestion pipeline; pure view changes
	/// (cursor, selection, metadata) do not.
	pub fn is_content_edit(&self) -> bool {
		matches!(
			self,
			DocAction::SetContent(_)
				| DocAction::InsertText { .. }
				| DocAction::DeleteRange { .. }
				| DocAction::ReplaceRange { .. }
		)
	}
}

impl From<DocAction> for Action {
	fn from(action: DocAction) -> Self {
		match action {
			DocAction::SetContent(content) => Action::with_payload(kinds::SET_CONTENT, Value::String(content)),
			DocAction::SetCursor(offset) => Action::with_payload(kinds::SET_CURSOR, json!(offset)),
			DocAction::SetSelection { from, to } => {
				Action::with_payload(kinds::SET_SELECTION, json!({ "from": from, "to": to }))
			}
			DocAction::SetFilePath(path) => Action::with_payload(
				kinds::SET_FILE_PATH,
				match path {
					Some(path) => Value::String(path.to_string_lossy().into_owned()),
					None => Value::Null,
				},
			),
			DocAction::SetLanguage(language) => {
				Action::with_payload(kinds::SET_LANGUAGE, Value::String(language))
			}
			DocAction::MarkSaved => Action::new(kinds::MARK_SAVED),
			DocAction::InsertText { at, text } => {
				Action::with_payload(kinds::INSERT_TEXT, json!({ "at": at, "text": text }))
			}
			DocAction::DeleteRange { from, to } => {
				Action::with_payload(kinds::DELETE_RANGE, json!({ "from": from, "to": to }))
			}
			DocAction::ReplaceRange { from, to, text } => Action::with_payload(
				kinds::REPLACE_RANGE,
				json!({ "from": from, "to": to, "text": text }),
			),
		}
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct RangePayload {
	pub from: usize,
	pub to: usize,
}

impl RangePayload {
	pub(crate) fn decode(value: &Value) -> Option<Self> {
		serde_json::from_value(value.clone()).ok()
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct InsertPayload {
	pub at: usize,
	pub text: String,
}

impl InsertPayload {
	pub(crate) fn decode(value: &Value) -> Option<Self> {
		serde_json::from_value(value.clone()).ok()
	}
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplacePayload {
	pub from: usize,
	pub to: usize,
	pub text: String,
}

impl ReplacePayload {
	pub(crate) fn decode(value: &Value) -> Option<Self> {
		serde_json::from_value(value.clone()).ok()
	}
}
