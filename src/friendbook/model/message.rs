use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            sent_at,
        }
    }

    pub fn key(&self) -> ConversationKey {
        ConversationKey::new(&self.sender, &self.recipient)
    }

    /// The participant that is not `username`.
    pub fn counterpart(&self, username: &str) -> &str {
        if self.sender == username {
            &self.recipient
        } else {
            &self.sender
        }
    }
}

/// Order-independent identifier of the pair of users taking part in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationKey(String, String);

impl ConversationKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    pub fn participants(&self) -> (&str, &str) {
        (&self.0, &self.1)
    }

    pub fn involves(&self, username: &str) -> bool {
        self.0 == username || self.1 == username
    }
}

/// All direct messages, grouped per pair of participants. Each thread is
/// append-only and kept in the order messages were sent.
#[derive(Debug, Clone, Default)]
pub struct Conversations {
    threads: BTreeMap<ConversationKey, Vec<Message>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.threads.entry(message.key()).or_default().push(message);
    }

    pub fn between(&self, a: &str, b: &str) -> &[Message] {
        self.threads
            .get(&ConversationKey::new(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn threads(&self) -> impl Iterator<Item = (&ConversationKey, &[Message])> {
        self.threads.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Conversations `username` takes part in, with the latest message of each.
    pub fn threads_of<'a>(
        &'a self,
        username: &str,
    ) -> impl Iterator<Item = (&'a ConversationKey, &'a Message)> + 'a {
        let username = username.to_string();
        self.threads
            .iter()
            .filter(move |(key, _)| key.involves(&username))
            .filter_map(|(key, msgs)| msgs.last().map(|last| (key, last)))
    }

    /// Every message of every thread, thread by thread.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.threads.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.threads.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

impl FromIterator<Message> for Conversations {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        let mut conversations = Conversations::new();
        for message in iter {
            conversations.append(message);
        }
        conversations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_order() {
        assert_eq!(
            ConversationKey::new("bob", "alice"),
            ConversationKey::new("alice", "bob")
        );
        // Underscores in usernames must not collide.
        assert_ne!(
            ConversationKey::new("a_b", "c"),
            ConversationKey::new("a", "b_c")
        );
    }

    #[test]
    fn threads_keep_insertion_order() {
        let now = Utc::now();
        let mut conv = Conversations::new();
        conv.append(Message::new("alice", "bob", "first", now));
        conv.append(Message::new("bob", "alice", "second", now));
        conv.append(Message::new("alice", "carol", "other", now));
        conv.append(Message::new("alice", "bob", "third", now));

        let thread: Vec<_> = conv
            .between("bob", "alice")
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(thread, ["first", "second", "third"]);
        assert_eq!(conv.len(), 4);
        assert!(conv.between("bob", "carol").is_empty());
    }

    #[test]
    fn threads_of_returns_last_message() {
        let now = Utc::now();
        let conv: Conversations = vec![
            Message::new("alice", "bob", "hi", now),
            Message::new("bob", "alice", "hey", now),
            Message::new("carol", "dave", "unrelated", now),
        ]
        .into_iter()
        .collect();

        let threads: Vec<_> = conv.threads_of("alice").collect();
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].1.content, "hey");
        assert_eq!(threads[0].1.counterpart("alice"), "bob");
    }

    #[test]
    fn threads_outlive_the_username_they_were_asked_for() {
        let conv: Conversations = vec![Message::new("alice", "bob", "hi", Utc::now())]
            .into_iter()
            .collect();

        let threads: Vec<_> = {
            let name = String::from("bob");
            conv.threads_of(&name).collect()
        };
        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].1.content, "hi");
    }
}
