//! The suggestion coordinator state machine.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

use crate::fence::strip_code_fences;
use crate::provider::{CompletionProvider, CompletionRequest};
use crate::types::{ErrorState, SuggestConfig, SuggestSnapshot, Suggestion, SuggestionContext};

/// Visible coordinator state behind the mutex.
///
/// The epoch has single-writer discipline: it is bumped exactly once per
/// issued call, under this lock, and compared exactly once per completion.
struct CoordState {
	epoch: u64,
	error_seq: u64,
	suggestion: Option<Suggestion>,
	error: Option<ErrorState>,
	thinking: bool,
	last_call_at: Option<Instant>,
}

struct Inner {
	state: Mutex<CoordState>,
	snapshot_tx: watch::Sender<SuggestSnapshot>,
}

impl Inner {
	/// Publishes the current overlay snapshot. Caller holds the state lock.
	fn publish(&self, state: &CoordState) {
		self.snapshot_tx.send_replace(SuggestSnapshot {
			suggestion: state.suggestion.clone(),
			error: state.error.clone(),
			thinking: state.thinking,
		});
	}

	/// Sets a fresh error and spawns its expiry timer.
	///
	/// The sequence number ties the timer to this particular error; a newer
	/// error orphans the old timer, which then clears nothing.
	fn set_error(self: &Arc<Self>, state: &mut CoordState, error: ErrorState) {
		state.error_seq += 1;
		let seq = state.error_seq;
		let retry_after = error.retry_after;
		state.error = Some(error);

		let inner = Arc::clone(self);
		tokio::spawn(async move {
			sleep(retry_after).await;
			let mut state = inner.state.lock();
			if state.error_seq == seq && state.error.take().is_some() {
				tracing::debug!(seq, "suggest.error.expired");
				inner.publish(&state);
			}
		});
	}

	/// Issues one provider call, subject to the global spacing window.
	async fn issue(
		self: Arc<Self>,
		provider: Arc<dyn CompletionProvider>,
		config: SuggestConfig,
		context: SuggestionContext,
	) {
		let epoch = {
			let mut state = self.state.lock();
			let now = Instant::now();
			if let Some(last) = state.last_call_at {
				if now.duration_since(last) < config.min_spacing {
					tracing::debug!("suggest.call.dropped_min_spacing");
					return;
				}
			}
			state.last_call_at = Some(now);
			state.epoch += 1;
			state.thinking = true;
			self.publish(&state);
			state.epoch
		};

		let result = provider
			.complete(CompletionRequest {
				prefix: context.prefix.clone(),
				suffix: context.suffix.clone(),
				language: context.language.clone(),
			})
			.await;

		let mut state = self.state.lock();
		if state.epoch != epoch {
			tracing::debug!(epoch, current = state.epoch, "suggest.completion.stale");
			return;
		}
		state.thinking = false;
		match result {
			Ok(text) => {
				let text = strip_code_fences(&text);
				if text.is_empty() {
					tracing::debug!(epoch, "suggest.completion.empty");
					state.suggestion = None;
				} else {
					state.suggestion = Some(Suggestion {
						text,
						position: context.position,
					});
				}
			}
			Err(error) => {
				tracing::debug!(epoch, error = %error, "suggest.completion.failed");
				state.suggestion = None;
				let classified = ErrorState::classify(&error.message, &config);
				self.set_error(&mut state, classified);
			}
		}
		self.publish(&state);
	}
}

/// Coordinates debounced, rate-limited completion requests.
///
/// Owns the transient [`Suggestion`] overlay and the self-expiring
/// [`ErrorState`]. Automatic triggers come in through
/// [`SuggestionCoordinator::notify_edit`]; manual ones through
/// [`SuggestionCoordinator::trigger_now`]. Results are applied only when
/// their captured epoch is still current.
pub struct SuggestionCoordinator {
	provider: Option<Arc<dyn CompletionProvider>>,
	config: SuggestConfig,
	inner: Arc<Inner>,
	debounce: Option<CancellationToken>,
}

impl SuggestionCoordinator {
	/// Creates a coordinator with no provider configured.
	///
	/// Without a provider both trigger paths are no-ops; this is the
	/// "no API credential" state.
	pub fn new(config: SuggestConfig) -> Self {
		let (snapshot_tx, _) = watch::channel(SuggestSnapshot::default());
		Self {
			provider: None,
			config,
			inner: Arc::new(Inner {
				state: Mutex::new(CoordState {
					epoch: 0,
					error_seq: 0,
					suggestion: None,
					error: None,
					thinking: false,
					last_call_at: None,
				}),
				snapshot_tx,
			}),
			debounce: None,
		}
	}

	/// Creates a coordinator with a provider already configured.
	pub fn with_provider(config: SuggestConfig, provider: Arc<dyn CompletionProvider>) -> Self {
		let mut coordinator = Self::new(config);
		coordinator.provider = Some(provider);
		coordinator
	}

	/// Installs or removes the completion provider.
	pub fn set_provider(&mut self, provider: Option<Arc<dyn CompletionProvider>>) {
		self.provider = provider;
	}

	/// Returns whether a provider is configured.
	pub fn has_provider(&self) -> bool {
		self.provider.is_some()
	}

	/// Handles a content-changing edit.
	///
	/// Clears any live suggestion, then restarts the debounce timer if the
	/// automatic-trigger gates pass: a provider is configured, the
	/// surrounding context is long enough and no error is live.
	pub fn notify_edit(&mut self, context: SuggestionContext) {
		self.clear_overlay();

		let Some(provider) = self.provider.clone() else {
			return;
		};
		if context.context_len() < self.config.min_context {
			tracing::trace!(len = context.context_len(), "suggest.edit.below_min_context");
			return;
		}
		if self.inner.state.lock().error.is_some() {
			tracing::debug!("suggest.edit.suppressed_by_error");
			return;
		}

		self.cancel_debounce();
		let cancel = CancellationToken::new();
		self.debounce = Some(cancel.clone());

		let inner = Arc::clone(&self.inner);
		let config = self.config.clone();
		tokio::spawn(async move {
			tokio::select! {
				_ = cancel.cancelled() => {}
				_ = sleep(config.debounce) => {
					inner.issue(provider, config, context).await;
				}
			}
		});
	}

	/// Fires a request immediately, bypassing debounce, the context-length
	/// gate and error suppression.
	///
	/// Still requires a configured provider and is still subject to the
	/// global minimum spacing between actual calls.
	pub fn trigger_now(&mut self, context: SuggestionContext) {
		let Some(provider) = self.provider.clone() else {
			tracing::debug!("suggest.trigger.no_provider");
			return;
		};
		self.cancel_debounce();
		let inner = Arc::clone(&self.inner);
		let config = self.config.clone();
		tokio::spawn(async move {
			inner.issue(provider, config, context).await;
		});
	}

	/// Accepts the live suggestion, clearing and returning it.
	///
	/// Splicing the text into the document is the caller's side effect.
	pub fn accept(&mut self) -> Option<Suggestion> {
		let taken = self.take_suggestion();
		if taken.is_some() {
			tracing::debug!("suggest.accepted");
		}
		taken
	}

	/// Rejects the live suggestion, clearing and returning it.
	pub fn reject(&mut self) -> Option<Suggestion> {
		let taken = self.take_suggestion();
		if taken.is_some() {
			tracing::debug!("suggest.rejected");
		}
		taken
	}

	/// Clears the overlay and cancels any pending debounce timer.
	pub fn clear(&mut self) {
		self.cancel_debounce();
		self.clear_overlay();
	}

	/// Returns the live suggestion, if any.
	pub fn suggestion(&self) -> Option<Suggestion> {
		self.inner.state.lock().suggestion.clone()
	}

	/// Returns the live error, if any.
	pub fn error_state(&self) -> Option<ErrorState> {
		self.inner.state.lock().error.clone()
	}

	/// Returns whether a provider call is in flight.
	pub fn is_thinking(&self) -> bool {
		self.inner.state.lock().thinking
	}

	/// Subscribes to overlay snapshots, published on every visible change.
	pub fn subscribe(&self) -> watch::Receiver<SuggestSnapshot> {
		self.inner.snapshot_tx.subscribe()
	}

	fn cancel_debounce(&mut self) {
		if let Some(cancel) = self.debounce.take() {
			cancel.cancel();
		}
	}

	/// Clears the suggestion and thinking indicator.
	///
	/// The epoch is untouched: an in-flight call may still apply its result
	/// when it completes. Staleness is decided only by newer issued calls.
	fn clear_overlay(&mut self) {
		let mut state = self.inner.state.lock();
		if state.suggestion.is_some() || state.thinking {
			state.suggestion = None;
			state.thinking = false;
			self.inner.publish(&state);
		}
	}

	fn take_suggestion(&mut self) -> Option<Suggestion> {
		let mut state = self.inner.state.lock();
		let taken = state.suggestion.take();
		if taken.is_some() {
			self.inner.publish(&state);
		}
		taken
	}
}
