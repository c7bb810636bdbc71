//! Execution channel adapter: a message-passing bridge to the sandbox peer.
//!
//! The peer is an isolated execution environment consumed as a black box.
//! This crate owns only the asynchronous protocol in front of it:
//!
//! * a one-time readiness handshake, before which requests are dropped
//! * FIFO correlation of terminal responses to in-order requests
//! * source filtering, so only the bound peer's messages are handled
//! * a fire-and-forget `log` side channel surfaced to the diagnostic sink
//!
//! The protocol has no receive-timeout; [`ChannelConfig::response_timeout`]
//! adds an optional caller-side one.

#![warn(missing_docs)]


mod channel;
mod protocol;

pub use channel::{ChannelConfig, SandboxChannel};
pub use protocol::{Envelope, ExecOutcome, InboundMessage, OutboundMessage, PeerId};
