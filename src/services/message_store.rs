//! Direct messages and the conversations derived from them.
//!
//! There is at most one conversation per unordered pair of users. It is
//! created lazily by the first message between the pair and tracks the most
//! recent message sent between them.

use chrono::Utc;
use crate::models::{Conversation, Message, Severity, User};
use super::notifier::Notifier;
use super::table::{Repository, Table};
use super::users::UserDirectory;

pub struct MessageStore<M = Table<Message>, C = Table<Conversation>> {
    messages: M,
    conversations: C,
    users: UserDirectory,
}

impl MessageStore<Table<Message>, Table<Conversation>> {
    pub fn new(messages: Vec<Message>, conversations: Vec<Conversation>, users: UserDirectory) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            conversations: conversations.into_iter().collect(),
            users,
        }
    }
}

impl<M, C> MessageStore<M, C>
where
    M: Repository<Message>,
    C: Repository<Conversation>,
{
    pub fn messages(&self) -> &[Message] {
        self.messages.rows()
    }

    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.get(conversation_id)
    }

    /// Conversations `user_id` takes part in, in the order they were created.
    pub fn conversations_for_user(&self, user_id: &str) -> Vec<&Conversation> {
        self.conversations
            .rows()
            .iter()
            .filter(|c| c.includes(user_id))
            .collect()
    }

    pub fn conversation_between(&self, a: &str, b: &str) -> Option<&Conversation> {
        self.conversations.rows().iter().find(|c| c.connects(a, b))
    }

    /// Every message exchanged between the two participants, oldest first.
    /// Messages with equal timestamps keep the order they were sent in.
    pub fn messages_for_conversation(&self, conversation_id: &str) -> Vec<&Message> {
        let Some(conversation) = self.conversations.get(conversation_id) else {
            return Vec::new();
        };
        let [a, b] = &conversation.participants;

        let mut thread: Vec<&Message> = self
            .messages
            .rows()
            .iter()
            .filter(|m| m.between(a, b))
            .collect();
        thread.sort_by_key(|m| m.created_at);
        thread
    }

    /// Stores a new unread message and points the pair's conversation at it,
    /// creating the conversation if this is the pair's first message.
    ///
    /// Content is taken as is; rejecting blank messages is up to the caller.
    pub fn send_message(
        &mut self,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
        notifier: &mut dyn Notifier,
    ) -> Message {
        let now = Utc::now();
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            read: false,
            created_at: now,
        };
        self.messages.insert(message.clone());

        let conversation_id = self.find_or_create_conversation(sender_id, receiver_id);
        if let Some(conversation) = self.conversations.get_mut(&conversation_id) {
            conversation.last_message = Some(message.clone());
            conversation.updated_at = now;
        }

        tracing::info!(
            "Message {} from {} to {} in conversation {}",
            message.id,
            sender_id,
            receiver_id,
            conversation_id
        );
        notifier.notify("Message sent", "Your message has been sent", Severity::Normal);
        message
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<User> {
        self.users.get(user_id)
    }

    /// Marks as read everything the other participant sent to `user_id`.
    /// Returns how many messages changed.
    pub fn mark_messages_as_read(&mut self, conversation_id: &str, user_id: &str) -> usize {
        let Some(other) = self
            .conversations
            .get(conversation_id)
            .and_then(|c| c.other_participant(user_id))
            .map(str::to_string)
        else {
            return 0;
        };

        let incoming = |m: &Message| m.sender_id == other && m.receiver_id == user_id;
        let mut flipped = 0;
        for message in self.messages.rows_mut().iter_mut() {
            if incoming(&*message) && !message.read {
                message.read = true;
                flipped += 1;
            }
        }

        if let Some(last) = self
            .conversations
            .get_mut(conversation_id)
            .and_then(|c| c.last_message.as_mut())
        {
            if incoming(&*last) {
                last.read = true;
            }
        }

        if flipped > 0 {
            tracing::debug!("Marked {} messages read for {} in {}", flipped, user_id, conversation_id);
        }
        flipped
    }

    /// Messages in the conversation addressed to `user_id` and not yet read.
    pub fn unread_count(&self, conversation_id: &str, user_id: &str) -> usize {
        self.messages_for_conversation(conversation_id)
            .into_iter()
            .filter(|m| m.receiver_id == user_id && !m.read)
            .count()
    }

    fn find_or_create_conversation(&mut self, a: &str, b: &str) -> String {
        if let Some(existing) = self.conversation_between(a, b) {
            return existing.id.clone();
        }

        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            participants: [a.to_string(), b.to_string()],
            last_message: None,
            updated_at: Utc::now(),
        };
        let id = conversation.id.clone();
        tracing::info!("Started conversation {} between {} and {}", id, a, b);
        self.conversations.insert(conversation);
        id
    }
}
