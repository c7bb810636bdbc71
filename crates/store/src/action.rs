//! Actions: named state-transition requests.

use serde_json::Value;

/// Prefix for action kinds reserved by the engine.
///
/// User reducers cannot be registered under this prefix, so internal
/// markers never collide with application action kinds.
pub const RESERVED_PREFIX: &str = "@quill/";

/// Marker kind delivered to observers by [`crate::Store::reset`].
pub const RESET_ACTION: &str = "@quill/reset";

/// Marker kind delivered to observers by [`crate::Store::undo`].
pub const UNDO_ACTION: &str = "@quill/undo";

/// Marker kind delivered to observers by [`crate::Store::redo`].
pub const REDO_ACTION: &str = "@quill/redo";

/// A named request to transition state, optionally carrying a payload.
///
/// The payload is untyped JSON; each reducer resolves it to a concrete
/// shape. Closed action sets should wrap construction in their own tagged
/// enum and convert into `Action` at the dispatch boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
	/// Action kind, a non-empty identifier keyed to one reducer.
	pub kind: String,
	/// Optional payload, resolved inside the reducer.
	pub payload: Option<Value>,
}

impl Action {
	/// Creates an action with no payload.
	pub fn new(kind: impl Into<String>) -> Self {
		Self {
			kind: kind.into(),
			payload: None,
		}
	}

	/// Creates an action carrying a payload.
	pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
		Self {
			kind: kind.into(),
			payload: Some(payload),
		}
	}

	/// Returns true if this action kind is reserved by the engine.
	pub fn is_reserved(&self) -> bool {
		self.kind.starts_with(RESERVED_PREFIX)
	}
}
