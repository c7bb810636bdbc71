use pretty_assertions::assert_eq;
use quill_store::Action;
use serde_json::json;

use super::*;

fn store_with(content: &str) -> DocumentStore {
	DocumentStore::new(DocumentState::new(content, "javascript"))
}

#[test]
fn file_backed_document_starts_clean() {
	let state = DocumentState::from_file("src/main.js", "let a = 1;", "javascript");
	assert_eq!(state.file_path.as_deref(), Some(std::path::Path::new("src/main.js")));
	assert!(!state.is_dirty);
	assert_eq!(state.last_saved_content, "let a = 1;");
}

#[test]
fn set_content_tracks_dirty_flag() {
	let mut store = store_with("let a = 1;");
	assert!(!store.state().is_dirty);

	store.dispatch(DocAction::SetContent("let a = 2;".into()));
	assert!(store.state().is_dirty);

	store.dispatch(DocAction::SetContent("let a = 1;".into()));
	assert!(!store.state().is_dirty);
}

#[test]
fn set_content_with_identical_text_is_a_noop() {
	let mut store = store_with("same");
	store.dispatch(DocAction::SetContent("same".into()));
	assert_eq!(store.history_len(), 1);
	assert!(!store.can_undo());
}

#[test]
fn insert_advances_cursor_by_char_count() {
	let mut store = store_with("héllo");
	store.dispatch(DocAction::InsertText {
		at: 2,
		text: "xy".into(),
	});
	assert_eq!(store.state().content, "héxyllo");
	assert_eq!(store.state().cursor, 4);
	assert!(store.state().is_dirty);
}

#[test]
fn insert_offset_is_clamped_to_content_end() {
	let mut store = store_with("ab");
	store.dispatch(DocAction::InsertText {
		at: 100,
		text: "!".into(),
	});
	assert_eq!(store.state().content, "ab!");
	assert_eq!(store.state().cursor, 3);
}

#[test]
fn delete_collapses_selection_to_deletion_point() {
	let mut store = store_with("abcdef");
	store.dispatch(DocAction::SetSelection { from: 1, to: 4 });
	store.dispatch(DocAction::DeleteRange { from: 1, to: 4 });
	assert_eq!(store.state().content, "aef");
	assert_eq!(store.state().cursor, 1);
	assert_eq!(store.state().selection, Selection::caret(1));
}

#[test]
fn delete_accepts_reversed_and_oversized_ranges() {
	let mut store = store_with("abcdef");
	store.dispatch(DocAction::DeleteRange { from: 100, to: 4 });
	assert_eq!(store.state().content, "abcd");
}

#[test]
fn replace_moves_cursor_to_end_of_inserted_text() {
	let mut store = store_with("hello world");
	store.dispatch(DocAction::ReplaceRange {
		from: 6,
		to: 11,
		text: "quill".into(),
	});
	assert_eq!(store.state().content, "hello quill");
	assert_eq!(store.state().cursor, 11);
	assert_eq!(store.state().selection, Selection::caret(11));
}

#[test]
fn mark_saved_rebaselines_dirty_tracking() {
	let mut store = store_with("v1");
	store.dispatch(DocAction::SetContent("v2".into()));
	assert!(store.state().is_dirty);

	store.dispatch(DocAction::MarkSaved);
	assert!(!store.state().is_dirty);
	assert_eq!(store.state().last_saved_content, "v2");

	store.dispatch(DocAction::SetContent("v1".into()));
	assert!(store.state().is_dirty);
}

#[test]
fn cursor_and_selection_are_clamped() {
	let mut store = store_with("abc");
	store.dispatch(DocAction::SetCursor(50));
	assert_eq!(store.state().cursor, 3);

	store.dispatch(DocAction::SetSelection { from: 9, to: 2 });
	assert_eq!(store.state().selection, Selection { from: 2, to: 3 });
}

#[test]
fn undo_restores_previous_content() {
	let mut store = store_with("");
	store.dispatch(DocAction::SetContent("one".into()));
	store.dispatch(DocAction::SetContent("two".into()));

	assert!(store.undo());
	assert_eq!(store.state().content, "one");
	assert!(store.redo());
	assert_eq!(store.state().content, "two");
}

#[test]
fn view_changes_share_history_with_edits() {
	let mut store = store_with("abc");
	store.dispatch(DocAction::SetCursor(2));
	store.dispatch(DocAction::SetContent("abcd".into()));

	assert!(store.undo());
	assert_eq!(store.state().content, "abc");
	assert_eq!(store.state().cursor, 2);
	assert!(store.undo());
	assert_eq!(store.state().cursor, 0);
}

#[test]
fn malformed_raw_payload_is_a_noop() {
	let mut store = store_with("abc");
	store
		.engine_mut()
		.dispatch(Action::with_payload(kinds::INSERT_TEXT, json!({ "at": "nope" })));
	assert_eq!(store.state().content, "abc");
	assert_eq!(store.history_len(), 1);
}

#[test]
fn is_content_edit_matches_splice_actions() {
	assert!(DocAction::SetContent(String::new()).is_content_edit());
	assert!(
		DocAction::InsertText {
			at: 0,
			text: "x".into()
		}
		.is_content_edit()
	);
	assert!(DocAction::DeleteRange { from: 0, to: 1 }.is_content_edit());
	assert!(!DocAction::SetCursor(0).is_content_edit());
	assert!(!DocAction::MarkSaved.is_content_edit());
}
