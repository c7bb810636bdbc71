//! Document state shape and character-offset splice helpers.

use std::path::PathBuf;

/// A selection between two character offsets.
///
/// `from <= to` always holds for selections produced by the reducers;
/// [`Selection::ordered`] normalizes caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
	/// Start offset, inclusive.
	pub from: usize,
	/// End offset, exclusive.
	pub to: usize,
}

impl Selection {
	/// A collapsed selection at a single offset.
	pub fn caret(at: usize) -> Self {
		Self { from: at, to: at }
	}

	/// Builds a selection with the endpoints in order.
	pub fn ordered(from: usize, to: usize) -> Self {
		if from <= to {
			Self { from, to }
		} else {
			Self { from: to, to: from }
		}
	}

	/// Clamps both endpoints to the character length of `content`.
	pub fn clamped(self, content: &str) -> Self {
		let len = char_count(content);
		Self {
			from: self.from.min(len),
			to: self.to.min(len),
		}
	}

	/// Returns whether the selection is collapsed.
	pub fn is_empty(&self) -> bool {
		self.from == self.to
	}
}

/// Editor document state: content plus view metadata.
///
/// `is_dirty` is derived: it is true exactly when `content` differs from
/// `last_saved_content`. The reducers keep it consistent on every content
/// mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
	/// Document text.
	pub content: String,
	/// Cursor position as a character offset.
	pub cursor: usize,
	/// Current selection.
	pub selection: Selection,
	/// Backing file path, if any.
	pub file_path: Option<PathBuf>,
	/// Language identifier (e.g. "javascript", "rust").
	pub language: String,
	/// Whether the content differs from the last saved baseline.
	pub is_dirty: bool,
	/// Content at the last save point.
	pub last_saved_content: String,
}

impl DocumentState {
	/// Creates a clean document with the given content and language.
	pub fn new(content: impl Into<String>, language: impl Into<String>) -> Self {
		let content = content.into();
		Self {
			last_saved_content: content.clone(),
			content,
			cursor: 0,
			selection: Selection::caret(0),
			file_path: None,
			language: language.into(),
			is_dirty: false,
		}
	}

	/// Creates a clean document backed by a file path.
	pub fn from_file(
		path: impl Into<PathBuf>,
		content: impl Into<String>,
		language: impl Into<String>,
	) -> Self {
		let mut document = Self::new(content, language);
		document.file_path = Some(path.into());
		document
	}
}

impl Default for DocumentState {
	fn default() -> Self {
		Self::new("", "javascript")
	}
}

/// Counts characters in `text`.
pub(crate) fn char_count(text: &str) -> usize {
	text.chars().count()
}

/// Maps a character offset to a byte index, saturating at the end.
fn byte_index(text: &str, char_offset: usize) -> usize {
	text.char_indices()
		.nth(char_offset)
		.map(|(index, _)| index)
		.unwrap_or(text.len())
}

/// Replaces the character range `from..to` with `insert`.
///
/// Offsets must already be ordered and clamped.
pub(crate) fn splice(content: &str, from: usize, to: usize, insert: &str) -> String {
	let start = byte_index(content, from);
	let end = byte_index(content, to);
	let mut out = String::with_capacity(content.len() - (end - start) + insert.len());
	out.push_str(&content[..start]);
	out.push_str(insert);
	out.push_str(&content[end..]);
	out
}
