//! Wire messages exchanged with the execution peer.
//!
//! The peer speaks a JSON-shaped protocol tagged by `type`. Requests carry
//! no correlation id; the peer answers them in order, one terminal response
//! per request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies one logical peer channel.
///
/// Inbound envelopes from any other source are ignored by the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub u64);

/// Messages sent to the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
	/// Run code in the sandbox. `timeout` is enforced by the peer, in
	/// milliseconds.
	#[serde(rename = "EXECUTE")]
	Execute {
		/// Source code to run.
		code: String,
		/// Peer-side execution timeout in milliseconds.
		timeout: u64,
	},
	/// Render an HTML document in the sandbox.
	#[serde(rename = "RENDER_HTML")]
	RenderHtml {
		/// Document markup.
		html: String,
	},
}

/// Messages received from the peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
	/// One-time readiness signal; the channel drops requests before it.
	#[serde(rename = "READY")]
	Ready,
	/// Terminal success for the oldest pending request.
	#[serde(rename = "success")]
	Success {
		/// Arbitrary result value.
		payload: Value,
	},
	/// Terminal failure for the oldest pending request.
	#[serde(rename = "error")]
	Error {
		/// Failure text.
		payload: String,
	},
	/// Fire-and-forget diagnostic output; resolves nothing.
	#[serde(rename = "log")]
	Log {
		/// Log line.
		payload: String,
	},
}

/// An inbound message tagged with its source channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
	/// The channel the message arrived on.
	pub source: PeerId,
	/// The message itself.
	pub message: InboundMessage,
}

/// Terminal outcome of an execute or render request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
	/// The peer reported success with a result value.
	Success(Value),
	/// The peer reported a failure message.
	Error(String),
}
