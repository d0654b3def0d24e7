//! Conversation-related types.

use std::fmt::{self, Display};

use persona_chat_model::ModelMessage;
use serde::{Deserialize, Serialize};

/// Who authored a [`Message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model, never shown to the user.
    System,
    /// The person chatting.
    User,
    /// The model.
    Assistant,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single entry of the transcript.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub role: Role,
    /// The text of the message.
    pub content: String,
}

impl Message {
    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Message> for ModelMessage {
    fn from(msg: &Message) -> Self {
        let content = msg.content.clone();
        match msg.role {
            Role::System => ModelMessage::System(content),
            Role::User => ModelMessage::User(content),
            Role::Assistant => ModelMessage::Assistant(content),
        }
    }
}

/// Represents a conversation: the ordered transcript of messages.
///
/// Messages are kept in arrival order. Outside of this crate the
/// transcript is read-only, it only grows through the controller.
#[derive(Clone, Default, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation that starts with the persona instruction,
    /// or an empty one if there is no persona.
    pub(crate) fn seeded(persona: Option<&str>) -> Self {
        Self {
            messages: persona.map(Message::system).into_iter().collect(),
        }
    }

    /// Returns all messages, including system messages.
    #[inline]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the messages meant to be displayed, which excludes system
    /// messages.
    #[inline]
    pub fn visible_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|msg| msg.role != Role::System)
    }

    /// Returns the number of messages, including system messages.
    #[inline]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if there are no messages at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[inline]
    pub(crate) fn push(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub(crate) fn to_model_messages(&self) -> Vec<ModelMessage> {
        self.messages.iter().map(ModelMessage::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded() {
        assert!(Conversation::seeded(None).is_empty());

        let conversation = Conversation::seeded(Some("Be Maddy."));
        assert_eq!(conversation.messages(), &[Message::system("Be Maddy.")]);
        assert_eq!(conversation.visible_messages().count(), 0);
    }

    #[test]
    fn test_model_messages_keep_order() {
        let mut conversation = Conversation::seeded(Some("Be Maddy."));
        conversation.push(Message::user("hello"));
        conversation.push(Message::assistant("hi there"));
        conversation.push(Message::user("hello"));
        assert_eq!(
            conversation.to_model_messages(),
            vec![
                ModelMessage::System("Be Maddy.".to_owned()),
                ModelMessage::User("hello".to_owned()),
                ModelMessage::Assistant("hi there".to_owned()),
                ModelMessage::User("hello".to_owned()),
            ]
        );
        let visible: Vec<_> = conversation.visible_messages().collect();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0], &Message::user("hello"));
    }

    #[test]
    fn test_serialize() {
        let mut conversation = Conversation::default();
        conversation.push(Message::user("hello"));
        conversation.push(Message::assistant("hi there"));
        assert_eq!(
            serde_json::to_string(&conversation).unwrap(),
            r#"[{"role":"user","content":"hello"},{"role":"assistant","content":"hi there"}]"#
        );
    }
}
