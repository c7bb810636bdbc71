//! Completion provider seam.

use async_trait::async_trait;
use thiserror::Error;

/// Context shipped to the completion provider.
///
/// The prompt a provider builds from this is its own business; the
/// coordinator only guarantees text before and after the cursor plus a
/// language hint.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
	/// Text before the cursor.
	pub prefix: String,
	/// Text after the cursor.
	pub suffix: String,
	/// Language identifier hint.
	pub language: String,
}

/// Failure from a completion provider.
///
/// Carries only a message; the coordinator classifies rate-limit failures
/// from its content.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ProviderError {
	/// Provider-reported failure text.
	pub message: String,
}

impl ProviderError {
	/// Creates a provider error from a message.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// An asynchronous completion backend.
///
/// Implementations wrap whatever transport reaches the actual model. The
/// returned text may be fenced markup; the coordinator strips wrapping
/// code fences before display.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
	/// Produces a completion for the given context.
	///
	/// An empty string is a valid "no suggestion" answer, not an error.
	async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;
}
