//! Observable state store with reducer dispatch and bounded undo history.
//!
//! This crate provides the generic state engine behind the editor shell:
//! * [`Store`]: single-owner state container with string-keyed reducers
//! * [`Action`]: a named transition request with an optional JSON payload
//! * [`History`]: linear snapshot history with a movable cursor
//!
//! # Design
//!
//! State is held as `Arc<S>` and replaced, never mutated. A reducer that
//! returns a clone of the incoming `Arc` signals a no-op: no history entry
//! is pushed and observers are not notified. The engine's change test is
//! reference equality (`Arc::ptr_eq`), so "no-op" actions cannot flood the
//! history.
//!
//! The store is synchronous and exclusively owned. Dispatch, undo, redo and
//! reset all deliver observer notifications inline, in registration order,
//! before returning. On a multi-threaded host, serialize access through a
//! single owner; the store itself takes `&mut self` everywhere it mutates.

#![warn(missing_docs)]

mod action;
mod history;
mod store;

pub use action::{Action, REDO_ACTION, RESERVED_PREFIX, RESET_ACTION, UNDO_ACTION};
pub use history::History;
pub use store::{DEFAULT_HISTORY_DEPTH, ObserverId, Store};
