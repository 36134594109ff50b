//! Streaming channel protocol.
//!
//! Inbound events arrive as JSON envelopes tagged by `type`; the only
//! outbound message is the generation request.

use serde::{Deserialize, Serialize};

use crate::deck::Deck;

/// Events emitted by the generation agent over the streaming channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelEvent {
    /// Incremental progress step for the in-flight request.
    Thinking { step: String },

    /// Full replacement deck. Always wholesale; there is no incremental
    /// slide patching in the protocol.
    Slides { slides: Deck },

    /// Generation failed; the message is user-presentable.
    Error { message: String },

    /// Terminal no-content signal closing out the request.
    Complete,
}

impl ChannelEvent {
    /// True for events that end the in-flight request
    /// (`slides`, `error`, `complete`).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ChannelEvent::Slides { .. } | ChannelEvent::Error { .. } | ChannelEvent::Complete
        )
    }
}

/// The single outbound request shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}
