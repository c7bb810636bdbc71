use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use quill_store::{Action, Store};
use serde_json::{Value, json};

use super::*;

#[derive(Debug, Clone, PartialEq)]
struct AppState {
	count: i64,
	label: String,
}

fn app_store() -> Store<AppState> {
	let mut store = Store::new(AppState {
		count: 0,
		label: "idle".into(),
	});
	store.add_reducer("count", |state: &Arc<AppState>, payload: Option<&Value>| {
		let mut next = AppState::clone(state);
		next.count = payload.and_then(Value::as_i64).unwrap_or(0);
		Arc::new(next)
	});
	store.add_reducer("label", |state: &Arc<AppState>, payload: Option<&Value>| {
		let mut next = AppState::clone(state);
		next.label = payload.and_then(Value::as_str).unwrap_or_default().to_string();
		Arc::new(next)
	});
	store
}

fn renders() -> (Arc<Mutex<Vec<i64>>>, impl FnMut(&i64) + Send + 'static) {
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	(seen, move |count: &i64| sink.lock().unwrap().push(*count))
}

#[test]
fn bind_renders_eagerly_once() {
	let (seen, on_refresh) = renders();
	let binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);
	assert_eq!(*seen.lock().unwrap(), vec![0]);
	assert!(!binding.can_undo());
	assert!(!binding.can_redo());
}

#[test]
fn refresh_fires_only_when_projection_changes() {
	let (seen, on_refresh) = renders();
	let mut binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);

	binding.dispatch(Action::with_payload("count", json!(5)));
	// Unrelated slice: projection unchanged, no render.
	binding.dispatch(Action::with_payload("label", json!("busy")));
	binding.dispatch(Action::with_payload("count", json!(7)));

	assert_eq!(*seen.lock().unwrap(), vec![0, 5, 7]);
	assert_eq!(binding.projection(), 7);
	assert_eq!(binding.store().state().label, "busy");
}

#[test]
fn flags_track_history_position() {
	let (_seen, on_refresh) = renders();
	let mut binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);

	binding.dispatch(Action::with_payload("count", json!(1)));
	assert!(binding.can_undo());
	assert!(!binding.can_redo());

	assert!(binding.undo());
	assert!(!binding.can_undo());
	assert!(binding.can_redo());
	assert_eq!(binding.projection(), 0);

	assert!(binding.redo());
	assert_eq!(binding.projection(), 1);
	assert!(!binding.can_redo());
}

#[test]
fn undo_rerenders_previous_projection() {
	let (seen, on_refresh) = renders();
	let mut binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);
	binding.dispatch(Action::with_payload("count", json!(3)));
	binding.undo();
	assert_eq!(*seen.lock().unwrap(), vec![0, 3, 0]);
}

#[test]
fn reset_refreshes_flags_and_projection() {
	let (seen, on_refresh) = renders();
	let mut binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);
	binding.dispatch(Action::with_payload("count", json!(9)));
	binding.reset();
	assert!(!binding.can_undo());
	assert_eq!(binding.projection(), 0);
	assert_eq!(*seen.lock().unwrap(), vec![0, 9, 0]);
}

#[test]
fn store_mut_allows_late_reducer_registration() {
	let (seen, on_refresh) = renders();
	let mut binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);
	binding
		.store_mut()
		.add_reducer("double", |state: &Arc<AppState>, _payload: Option<&Value>| {
			let mut next = AppState::clone(state);
			next.count *= 2;
			Arc::new(next)
		});

	binding.dispatch(Action::with_payload("count", json!(3)));
	binding.dispatch(Action::new("double"));
	assert_eq!(*seen.lock().unwrap(), vec![0, 3, 6]);
	assert!(binding.can_undo());
}

#[test]
fn unbind_detaches_the_observer() {
	let (seen, on_refresh) = renders();
	let binding = ViewBinding::bind(app_store(), |state| state.count, on_refresh);
	let mut store = binding.unbind();
	store.dispatch(Action::with_payload("count", json!(4)));
	assert_eq!(*seen.lock().unwrap(), vec![0]);
	assert_eq!(store.state().count, 4);
}
