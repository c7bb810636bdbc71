//! The channel adapter and its inbound pump.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{Envelope, ExecOutcome, InboundMessage, OutboundMessage, PeerId};

/// Channel tuning knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelConfig {
	/// Execution timeout shipped to the peer, in milliseconds.
	pub peer_timeout_ms: u64,
	/// Optional caller-side limit on waiting for a response.
	///
	/// The peer protocol has no receive-timeout of its own; with `None`
	/// (the default) a request whose response never arrives waits forever.
	/// When set, an overdue request resolves `None` and its responder slot
	/// is abandoned in the FIFO, still consuming the eventual response.
	pub response_timeout: Option<Duration>,
}

impl Default for ChannelConfig {
	fn default() -> Self {
		Self {
			peer_timeout_ms: 5000,
			response_timeout: None,
		}
	}
}

struct Shared {
	peer: PeerId,
	ready: Mutex<bool>,
	pending: Mutex<VecDeque<oneshot::Sender<ExecOutcome>>>,
}

/// Message-passing bridge to the isolated execution peer.
///
/// Unusable until the peer's one-time `READY` signal arrives: requests sent
/// before that are silently dropped. Responses carry no id and are matched
/// to requests in FIFO order.
pub struct SandboxChannel {
	shared: Arc<Shared>,
	outbound: mpsc::UnboundedSender<OutboundMessage>,
	config: ChannelConfig,
}

impl SandboxChannel {
	/// Binds a channel to `peer` and spawns the inbound pump.
	///
	/// `outbound` carries requests to the peer; `inbound` delivers envelopes
	/// from every source, of which only `peer`'s are handled.
	pub fn new(
		peer: PeerId,
		outbound: mpsc::UnboundedSender<OutboundMessage>,
		inbound: mpsc::UnboundedReceiver<Envelope>,
		config: ChannelConfig,
	) -> Self {
		let shared = Arc::new(Shared {
			peer,
			ready: Mutex::new(false),
			pending: Mutex::new(VecDeque::new()),
		});
		tokio::spawn(pump(Arc::clone(&shared), inbound));
		Self {
			shared,
			outbound,
			config,
		}
	}

	/// Returns whether the peer has signalled readiness.
	pub fn is_ready(&self) -> bool {
		*self.shared.ready.lock()
	}

	/// Runs code in the sandbox.
	///
	/// Resolves to the peer's terminal response, or `None` when the channel
	/// is not ready, the peer is gone, or the configured response timeout
	/// elapses first.
	pub async fn execute(&self, code: impl Into<String>) -> Option<ExecOutcome> {
		self.request(OutboundMessage::Execute {
			code: code.into(),
			timeout: self.config.peer_timeout_ms,
		})
		.await
	}

	/// Renders HTML in the sandbox, following the same response contract as
	/// [`SandboxChannel::execute`].
	pub async fn render_html(&self, html: impl Into<String>) -> Option<ExecOutcome> {
		self.request(OutboundMessage::RenderHtml { html: html.into() }).await
	}

	async fn request(&self, message: OutboundMessage) -> Option<ExecOutcome> {
		if !self.is_ready() {
			tracing::debug!(peer = self.shared.peer.0, "sandbox.request.dropped_unready");
			return None;
		}

		let (tx, rx) = oneshot::channel();
		self.shared.pending.lock().push_back(tx);
		if self.outbound.send(message).is_err() {
			tracing::warn!(peer = self.shared.peer.0, "sandbox.request.peer_gone");
			self.shared.pending.lock().pop_back();
			return None;
		}

		match self.config.response_timeout {
			None => rx.await.ok(),
			Some(limit) => match tokio::time::timeout(limit, rx).await {
				Ok(outcome) => outcome.ok(),
				Err(_) => {
					tracing::warn!(
						peer = self.shared.peer.0,
						timeout_ms = limit.as_millis() as u64,
						"sandbox.request.response_timeout"
					);
					None
				}
			},
		}
	}
}

/// Drains inbound envelopes for the channel's lifetime.
async fn pump(shared: Arc<Shared>, mut inbound: mpsc::UnboundedReceiver<Envelope>) {
	while let Some(envelope) = inbound.recv().await {
		if envelope.source != shared.peer {
			tracing::debug!(
				source = envelope.source.0,
				peer = shared.peer.0,
				"sandbox.message.ignored_source"
			);
			continue;
		}
		match envelope.message {
			InboundMessage::Ready => {
				*shared.ready.lock() = true;
				tracing::debug!(peer = shared.peer.0, "sandbox.peer.ready");
			}
			InboundMessage::Success { payload } => {
				resolve(&shared, ExecOutcome::Success(payload));
			}
			InboundMessage::Error { payload } => {
				resolve(&shared, ExecOutcome::Error(payload));
			}
			InboundMessage::Log { payload } => {
				tracing::info!(peer = shared.peer.0, "sandbox.peer.log: {payload}");
			}
		}
	}
}

/// Resolves the oldest pending request with a terminal outcome.
///
/// A dead responder (caller timed out and abandoned the slot) still consumes
/// the response, keeping later requests aligned with later responses.
fn resolve(shared: &Shared, outcome: ExecOutcome) {
	match shared.pending.lock().pop_front() {
		Some(responder) => {
			if responder.send(outcome).is_err() {
				tracing::debug!(peer = shared.peer.0, "sandbox.response.abandoned_slot");
			}
		}
		None => {
			tracing::warn!(peer = shared.peer.0, "sandbox.response.unmatched");
		}
	}
}
