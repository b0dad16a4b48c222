use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// True when the message travels between `a` and `b`, in either direction.
    pub fn between(&self, a: &str, b: &str) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub participants: [String; 2],
    pub last_message: Option<Message>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn includes(&self, user_id: &str) -> bool {
        self.participants.iter().any(|id| id == user_id)
    }

    /// Whether this conversation is the one for the unordered pair {a, b}.
    pub fn connects(&self, a: &str, b: &str) -> bool {
        let [first, second] = &self.participants;
        (first == a && second == b) || (first == b && second == a)
    }

    /// The participant that is not `user_id`. `None` for a self-conversation
    /// or when `user_id` is not a participant at all.
    pub fn other_participant(&self, user_id: &str) -> Option<&str> {
        if !self.includes(user_id) {
            return None;
        }
        self.participants
            .iter()
            .find(|id| *id != user_id)
            .map(String::as_str)
    }
}
