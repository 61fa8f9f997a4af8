//! Core entities. They hold data and keep their own small invariants; they never
//! reach into the rest of the system.

mod comment;
mod message;
mod post;
mod user;

pub use comment::Comment;
pub use message::{ConversationKey, Conversations, Message};
pub use post::{Post, Privacy};
pub use user::User;

use serde::{Deserialize, Serialize};

/// An undirected friendship edge, stored with the smaller username first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Friendship {
    pub a: String,
    pub b: String,
}

impl Friendship {
    pub fn new(x: &str, y: &str) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            a: a.to_string(),
            b: b.to_string(),
        }
    }
}
