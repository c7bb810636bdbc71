//! Coordinator data types.

use std::time::Duration;

/// A transient inline completion proposal.
///
/// At most one lives at a time; it is superseded by new content, an
/// accept/reject, or a newer request completing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
	/// Proposed text, already fence-stripped.
	pub text: String,
	/// Character offset the text would be inserted at.
	pub position: usize,
}

/// Classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Rate limiting; long backoff.
	Quota,
	/// Any other provider failure; short backoff.
	Network,
	/// Failure with no usable message.
	Unknown,
}

/// A self-expiring provider failure surfaced to the UI.
///
/// While live, automatic triggers are suppressed. An independent timer
/// clears it after [`ErrorState::retry_after`]; setting a new error resets
/// that timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorState {
	/// Human-readable failure text.
	pub message: String,
	/// Failure classification.
	pub kind: ErrorKind,
	/// How long the error stays live.
	pub retry_after: Duration,
}

impl ErrorState {
	/// Classifies a provider failure message.
	///
	/// Rate-limit indicators in the text select the quota backoff; an empty
	/// message is unclassifiable; everything else is a network failure.
	pub fn classify(message: &str, config: &SuggestConfig) -> Self {
		let lower = message.to_lowercase();
		if message.is_empty() {
			Self {
				message: message.to_string(),
				kind: ErrorKind::Unknown,
				retry_after: config.network_retry_after,
			}
		} else if lower.contains("429") || lower.contains("rate limit") || lower.contains("quota") {
			Self {
				message: message.to_string(),
				kind: ErrorKind::Quota,
				retry_after: config.quota_retry_after,
			}
		} else {
			Self {
				message: message.to_string(),
				kind: ErrorKind::Network,
				retry_after: config.network_retry_after,
			}
		}
	}
}

/// Editing context captured at trigger time.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionContext {
	/// Text before the cursor.
	pub prefix: String,
	/// Text after the cursor.
	pub suffix: String,
	/// Language identifier hint.
	pub language: String,
	/// Character offset a resulting suggestion anchors to.
	pub position: usize,
}

impl SuggestionContext {
	/// Total character length of the surrounding context.
	pub(crate) fn context_len(&self) -> usize {
		self.prefix.chars().count() + self.suffix.chars().count()
	}
}

/// Coordinator tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestConfig {
	/// Quiet period before an automatic trigger issues a call.
	pub debounce: Duration,
	/// Global minimum spacing between any two actual provider calls.
	pub min_spacing: Duration,
	/// Minimum surrounding-context length for automatic triggers.
	pub min_context: usize,
	/// Error lifetime for network failures.
	pub network_retry_after: Duration,
	/// Error lifetime for quota failures.
	pub quota_retry_after: Duration,
}

impl Default for SuggestConfig {
	fn default() -> Self {
		Self {
			debounce: Duration::from_millis(1200),
			min_spacing: Duration::from_millis(1000),
			min_context: 5,
			network_retry_after: Duration::from_secs(5),
			quota_retry_after: Duration::from_secs(30),
		}
	}
}

/// Everything a UI layer needs to render the overlay, published on change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SuggestSnapshot {
	/// Live suggestion, if any.
	pub suggestion: Option<Suggestion>,
	/// Live error, if any.
	pub error: Option<ErrorState>,
	/// Whether a provider call is in flight.
	pub thinking: bool,
}
