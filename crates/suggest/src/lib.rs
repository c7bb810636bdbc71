//! AI suggestion coordinator: debounce, staleness, rate limits, ghost text.
//!
//! The [`SuggestionCoordinator`] sits between the editor's edit stream and a
//! [`CompletionProvider`]. It owns the transient suggestion overlay state
//! and the error backoff state, and enforces the request discipline:
//!
//! * automatic triggers are debounced and suppressed while an error is live
//! * at most one provider call per minimum-spacing window, manual included
//! * every issued call captures a monotonic epoch; completions that lost the
//!   race are discarded without touching visible state
//!
//! Requests are never cancelled at the network level. A pending debounce
//! timer is cancellable; an in-flight call simply has its result dropped if
//! a newer call superseded it.
//!
//! The coordinator spawns tasks and must be used inside a tokio runtime.


mod coordinator;
mod fence;
mod provider;
mod types;

pub use coordinator::SuggestionCoordinator;
pub use fence::strip_code_fences;
pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use types::{ErrorKind, ErrorState, SuggestConfig, SuggestSnapshot, Suggestion, SuggestionContext};
