//! Shared SlideSmith types: the slide document model, the streaming channel
//! protocol, and transcript entries.

pub mod deck;
pub mod events;
pub mod transcript;

pub use deck::{BigLabel, Deck, Slide};
pub use events::{ChannelEvent, GenerateRequest};
pub use transcript::{ActionIcon, TranscriptEntry};
