//! Integration tests for the observable store engine.
//!
//! Covers the dispatch/reducer contract, history bounds and branch
//! truncation, observer isolation and the middleware chain.

use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use quill_store::{Action, RESET_ACTION, Store, UNDO_ACTION};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
struct Counter {
	count: i64,
}

fn counter_store() -> Store<Counter> {
	let mut store = Store::new(Counter { count: 0 });
	store.add_reducer("increment", |state: &Arc<Counter>, payload: Option<&Value>| {
		let step = payload.and_then(Value::as_i64).unwrap_or(1);
		Arc::new(Counter {
			count: state.count + step,
		})
	});
	store.add_reducer("set", |state: &Arc<Counter>, payload: Option<&Value>| {
		match payload.and_then(Value::as_i64) {
			Some(count) => Arc::new(Counter { count }),
			None => Arc::clone(state),
		}
	});
	store
}

#[test]
fn construction_seeds_single_entry_history() {
	let store = counter_store();
	assert!(!store.can_undo());
	assert!(!store.can_redo());
	assert_eq!(store.history_len(), 1);
	assert_eq!(store.state().count, 0);
}

#[test]
fn dispatch_routes_payload_to_reducer() {
	let mut store = counter_store();
	store.dispatch(Action::with_payload("increment", json!(5)));
	assert_eq!(store.state().count, 5);

	store.dispatch(Action::new("increment"));
	assert_eq!(store.state().count, 6);
}

#[test]
fn unregistered_kind_is_a_noop() {
	let mut store = counter_store();
	store.dispatch(Action::new("no-such-action"));
	assert_eq!(store.state().count, 0);
	assert_eq!(store.history_len(), 1);
	assert!(!store.can_undo());
}

#[test]
fn same_reference_result_records_nothing() {
	let mut store = counter_store();
	// "set" without a payload returns the incoming Arc.
	store.dispatch(Action::new("set"));
	assert_eq!(store.history_len(), 1);
	assert!(!store.can_undo());
}

#[test]
fn new_dispatch_discards_redo_branch() {
	let mut store = counter_store();
	for value in [1, 2, 3] {
		store.dispatch(Action::with_payload("set", json!(value)));
	}
	assert!(store.undo());
	assert!(store.undo());
	assert_eq!(store.state().count, 1);

	store.dispatch(Action::with_payload("set", json!(99)));
	assert_eq!(store.state().count, 99);
	assert!(!store.can_redo());
	assert!(!store.redo());
}

#[test]
fn history_depth_evicts_oldest() {
	let mut store = Store::with_history_depth(Counter { count: 0 }, 3);
	store.add_reducer("set", |_state: &Arc<Counter>, payload: Option<&Value>| {
		Arc::new(Counter {
			count: payload.and_then(Value::as_i64).unwrap_or(0),
		})
	});
	for value in 1..=5 {
		store.dispatch(Action::with_payload("set", json!(value)));
	}
	assert_eq!(store.history_len(), 3);
	assert!(store.undo());
	assert!(store.undo());
	assert!(!store.undo());
	assert_eq!(store.state().count, 3);
}

#[test]
fn undo_redo_round_trip() {
	let mut store = counter_store();
	for _ in 0..4 {
		store.dispatch(Action::new("increment"));
	}
	let final_count = store.state().count;

	let mut undone = 0;
	while store.undo() {
		undone += 1;
	}
	assert_eq!(undone, 4);
	assert_eq!(store.state().count, 0);

	while store.redo() {}
	assert_eq!(store.state().count, final_count);
}

#[test]
fn observer_panic_does_not_block_later_observers() {
	let mut store = counter_store();
	store.subscribe(|_new: &Arc<Counter>, _prev: &Arc<Counter>, _action: &Action| {
		panic!("observer failure");
	});
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	store.subscribe(move |new: &Arc<Counter>, prev: &Arc<Counter>, action: &Action| {
		sink.lock().unwrap().push((new.count, prev.count, action.kind.clone()));
	});

	store.dispatch(Action::with_payload("increment", json!(2)));
	assert_eq!(*seen.lock().unwrap(), vec![(2, 0, "increment".to_string())]);
}

#[test]
fn observers_receive_undo_and_reset_markers() {
	let mut store = counter_store();
	let kinds = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&kinds);
	store.subscribe(move |_new: &Arc<Counter>, _prev: &Arc<Counter>, action: &Action| {
		sink.lock().unwrap().push(action.kind.clone());
	});

	store.dispatch(Action::new("increment"));
	store.undo();
	store.reset();
	assert_eq!(
		*kinds.lock().unwrap(),
		vec!["increment".to_string(), UNDO_ACTION.to_string(), RESET_ACTION.to_string()]
	);
}

#[test]
fn duplicate_subscription_notifies_twice() {
	let mut store = counter_store();
	let hits = Arc::new(Mutex::new(0u32));
	for _ in 0..2 {
		let sink = Arc::clone(&hits);
		store.subscribe(move |_new: &Arc<Counter>, _prev: &Arc<Counter>, _action: &Action| {
			*sink.lock().unwrap() += 1;
		});
	}
	store.dispatch(Action::new("increment"));
	assert_eq!(*hits.lock().unwrap(), 2);
}

#[test]
fn unsubscribe_is_idempotent() {
	let mut store = counter_store();
	let hits = Arc::new(Mutex::new(0u32));
	let sink = Arc::clone(&hits);
	let id = store.subscribe(move |_new: &Arc<Counter>, _prev: &Arc<Counter>, _action: &Action| {
		*sink.lock().unwrap() += 1;
	});
	assert!(store.unsubscribe(id));
	assert!(!store.unsubscribe(id));
	store.dispatch(Action::new("increment"));
	assert_eq!(*hits.lock().unwrap(), 0);
}

#[test]
fn reset_restores_initial_and_clears_history() {
	let mut store = counter_store();
	for _ in 0..3 {
		store.dispatch(Action::new("increment"));
	}
	store.reset();
	assert_eq!(store.state().count, 0);
	assert_eq!(store.history_len(), 1);
	assert!(!store.can_undo());
	assert!(!store.can_redo());
}

#[test]
fn middleware_runs_outermost_first_and_sees_current_state() {
	let mut store = counter_store();
	let order = Arc::new(Mutex::new(Vec::new()));
	for tag in ["outer", "inner"] {
		let sink = Arc::clone(&order);
		store.use_middleware(move |_action: &Action, state: &Arc<Counter>, proceed: &mut dyn FnMut()| {
			sink.lock().unwrap().push((tag, state.count));
			proceed();
		});
	}
	store.dispatch(Action::with_payload("increment", json!(7)));
	assert_eq!(store.state().count, 7);
	assert_eq!(*order.lock().unwrap(), vec![("outer", 0), ("inner", 0)]);
}

#[test]
fn middleware_can_veto_by_not_proceeding() {
	let mut store = counter_store();
	store.use_middleware(|action: &Action, _state: &Arc<Counter>, proceed: &mut dyn FnMut()| {
		if action.kind != "increment" {
			proceed();
		}
	});
	store.dispatch(Action::with_payload("increment", json!(5)));
	assert_eq!(store.state().count, 0);
	assert_eq!(store.history_len(), 1);

	store.dispatch(Action::with_payload("set", json!(3)));
	assert_eq!(store.state().count, 3);
}

#[test]
fn repeated_proceed_calls_apply_once() {
	let mut store = counter_store();
	store.use_middleware(|_action: &Action, _state: &Arc<Counter>, proceed: &mut dyn FnMut()| {
		proceed();
		proceed();
	});
	store.dispatch(Action::new("increment"));
	assert_eq!(store.state().count, 1);
	assert_eq!(store.history_len(), 2);
}

#[test]
fn reserved_prefix_reducers_are_refused() {
	let mut store = counter_store();
	store.add_reducer("@quill/reset", |state: &Arc<Counter>, _payload: Option<&Value>| {
		Arc::new(Counter {
			count: state.count + 100,
		})
	});
	store.dispatch(Action::new("@quill/reset"));
	assert_eq!(store.state().count, 0);
}

#[test]
fn select_projects_current_state() {
	let mut store = counter_store();
	store.dispatch(Action::with_payload("set", json!(12)));
	assert_eq!(store.select(|s| s.count * 2), 24);
}
