//! Transcript entry types.
//!
//! The transcript is the ordered conversational feed shown alongside the
//! deck. Entries are created and mutated exclusively by the reducer in
//! `slidesmith-core`; these types only define the shapes.

use serde::{Deserialize, Serialize};

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TranscriptEntry {
    /// A prompt the user sent.
    User { text: String },

    /// A plain agent message (completion summary or surfaced error).
    Agent { text: String },

    /// An in-progress agent task with its incremental step log.
    Action {
        title: String,
        icon: ActionIcon,
        steps: Vec<String>,
    },
}

impl TranscriptEntry {
    pub fn user(text: impl Into<String>) -> Self {
        TranscriptEntry::User { text: text.into() }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        TranscriptEntry::Agent { text: text.into() }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, TranscriptEntry::Action { .. })
    }
}

/// Icon identifier for an action entry, rendered by the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActionIcon {
    #[default]
    Search,
    Draft,
    Data,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn action_entry_serializes_with_icon_id() {
        let entry = TranscriptEntry::Action {
            title: "Agent Working".into(),
            icon: ActionIcon::Search,
            steps: vec!["step1".into()],
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "type": "action",
                "title": "Agent Working",
                "icon": "search",
                "steps": ["step1"],
            })
        );
    }
}
