use serde::{Deserialize, Deserializer, Serialize};

use crate::fragment::Fragment;
use crate::thread_id::ThreadId;

pub const UNKNOWN_AUTHOR: &str = "Unknown";
pub const UNKNOWN_FILE: &str = "Unknown file";

/// Top-level shape of `messages.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatExport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<RawMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message_state: MessageState,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_date: String,
    #[serde(default)]
    pub creator: Option<Creator>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactions: Vec<Reaction>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attached_files: Vec<AttachedFile>,
}

impl RawMessage {
    pub fn author(&self) -> &str {
        self.creator
            .as_ref()
            .and_then(|creator| creator.name.as_deref())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn is_deleted(&self) -> bool {
        self.message_state == MessageState::Deleted
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageState {
    #[default]
    Normal,
    Deleted,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub emoji: Option<Emoji>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reactor_emails: Vec<String>,
}

impl Reaction {
    pub fn glyph(&self) -> &str {
        self.emoji
            .as_ref()
            .and_then(|emoji| emoji.unicode.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Emoji {
    #[serde(default)]
    pub unicode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AttachedFile {
    #[serde(default)]
    pub export_name: Option<String>,
}

impl AttachedFile {
    pub fn export_name(&self) -> &str {
        self.export_name.as_deref().unwrap_or(UNKNOWN_FILE)
    }
}

/// One normalized message, ready for thread assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub thread: ThreadId,
    pub deleted: bool,
    pub fragment: Fragment,
    pub attachments: usize,
    pub embedded: usize,
    pub warnings: Vec<String>,
}

impl Record {
    pub fn id(&self) -> &str {
        &self.thread.id
    }

    pub fn parent(&self) -> Option<&str> {
        self.thread.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.thread.is_root()
    }

    pub fn html(&self) -> String {
        crate::render::render_fragment(&self.fragment)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    pub messages: usize,
    pub roots: usize,
    pub replies: usize,
    pub deleted: usize,
    pub orphans: usize,
    pub attachments: usize,
    pub embedded: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub html: String,
    pub summary: ConvertSummary,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::{ChatExport, MessageState, UNKNOWN_AUTHOR, UNKNOWN_FILE};

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let export: ChatExport = serde_json::from_str(
            r#"{"messages":[{"message_id":"space/a/a","creator":{},"attached_files":[{}]}]}"#,
        )
        .expect("parse");
        let message = &export.messages[0];
        assert_eq!(message.author(), UNKNOWN_AUTHOR);
        assert_eq!(message.text, "");
        assert_eq!(message.message_state, MessageState::Normal);
        assert_eq!(message.attached_files[0].export_name(), UNKNOWN_FILE);
    }

    #[test]
    fn null_fields_are_treated_as_absent() {
        let export: ChatExport = serde_json::from_str(
            r#"{"messages":[{"message_id":"space/a/a","text":null,"reactions":null,"message_state":null}]}"#,
        )
        .expect("parse");
        let message = &export.messages[0];
        assert_eq!(message.text, "");
        assert!(message.reactions.is_empty());
        assert!(!message.is_deleted());
    }

    #[test]
    fn unknown_message_state_is_tolerated() {
        let export: ChatExport = serde_json::from_str(
            r#"{"messages":[{"message_id":"s/a/a","message_state":"EDITED"},{"message_id":"s/b/b","message_state":"DELETED"}]}"#,
        )
        .expect("parse");
        assert_eq!(export.messages[0].message_state, MessageState::Other);
        assert!(export.messages[1].is_deleted());
    }

    #[test]
    fn missing_messages_key_is_an_empty_export() {
        let export: ChatExport = serde_json::from_str("{}").expect("parse");
        assert!(export.messages.is_empty());
    }

    #[test]
    fn reaction_glyph_defaults_to_empty() {
        let export: ChatExport = serde_json::from_str(
            r#"{"messages":[{"reactions":[{"reactor_emails":["a@example.com"]},{"emoji":{"unicode":"👍"}}]}]}"#,
        )
        .expect("parse");
        let reactions = &export.messages[0].reactions;
        assert_eq!(reactions[0].glyph(), "");
        assert_eq!(reactions[1].glyph(), "👍");
        assert!(reactions[1].reactor_emails.is_empty());
    }
}
