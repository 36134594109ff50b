//! Transcript reducer.
//!
//! Folds inbound channel events and user actions into the ordered
//! transcript and the current deck. The reducer is the only writer of
//! transcript entries; whether a `thinking` step merges into an existing
//! action entry is tracked as explicit state (`open_action`) rather than
//! inferred from the shape of the transcript tail.

use slidesmith_types::{ActionIcon, ChannelEvent, Deck, TranscriptEntry};

/// Title given to the in-progress action card.
const WORKING_TITLE: &str = "Agent Working";

/// Result of applying one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The request is still in flight.
    Pending,
    /// The event closed out the in-flight request.
    Terminal,
}

/// Transcript and deck state for one session.
#[derive(Debug, Default, Clone)]
pub struct Reducer {
    transcript: Vec<TranscriptEntry>,
    deck: Deck,
    /// True while an action entry is open for the current request. Cleared
    /// on every terminal event.
    open_action: bool,
}

impl Reducer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Appends the user's prompt. Called by the session on submit.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry::user(text));
    }

    /// Applies one inbound event in arrival order.
    pub fn apply(&mut self, event: ChannelEvent) -> Applied {
        match event {
            ChannelEvent::Thinking { step } => {
                self.push_step(step);
                Applied::Pending
            }
            ChannelEvent::Slides { slides } => {
                self.deck = slides;
                self.strip_trailing_actions();
                self.transcript.push(TranscriptEntry::agent(format!(
                    "Created a {}-slide presentation!",
                    self.deck.len()
                )));
                self.open_action = false;
                Applied::Terminal
            }
            ChannelEvent::Error { message } => {
                // Deck from a prior successful generation is preserved.
                self.strip_trailing_actions();
                self.transcript
                    .push(TranscriptEntry::agent(format!("Error: {message}")));
                self.open_action = false;
                Applied::Terminal
            }
            ChannelEvent::Complete => {
                self.open_action = false;
                Applied::Terminal
            }
        }
    }

    fn push_step(&mut self, step: String) {
        if self.open_action {
            if let Some(TranscriptEntry::Action { steps, .. }) = self.transcript.last_mut() {
                steps.push(step);
                return;
            }
        }
        self.transcript.push(TranscriptEntry::Action {
            title: WORKING_TITLE.to_string(),
            icon: ActionIcon::Search,
            steps: vec![step],
        });
        self.open_action = true;
    }

    fn strip_trailing_actions(&mut self) {
        while self.transcript.last().is_some_and(TranscriptEntry::is_action) {
            self.transcript.pop();
        }
    }
}
