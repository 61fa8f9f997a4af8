//! # Storage Layer
//!
//! This module defines the storage abstraction for friendbook. The [`DataStore`] trait
//! lets the rest of the crate persist the social graph without knowing where it goes.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage, one delimited text file per table
//! - [`memory::InMemoryStore`]: In-memory storage for testing, nothing persists
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── users.txt       # username|email|password|gender|public|bot|friends|requests|restricted|blocked
//! ├── friends.txt     # userA|userB  (A < B, one line per friendship)
//! ├── posts.txt       # id|author|content|timestamp|privacy|likes|tagged
//! ├── comments.txt    # post_id|comment_id|parent_id|author|content|timestamp|likes
//! ├── messages.txt    # from|to|content|timestamp
//! └── config.json     # FriendbookConfig
//! ```
//!
//! See [`crate::codec`] for the escaping rules shared by every file.
//!
//! Every save rewrites the whole table. The store never holds state between calls
//! that the caller did not hand it.

use crate::error::Result;
use crate::model::{Conversations, Friendship, Post, User};

pub mod fs;
pub mod memory;
pub mod records;

/// Everything a store holds, loaded in one go.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub friendships: Vec<Friendship>,
    pub posts: Vec<Post>,
    pub conversations: Conversations,
}

/// Abstract interface for social graph storage.
pub trait DataStore {
    fn load_users(&self) -> Result<Vec<User>>;

    fn load_friendships(&self) -> Result<Vec<Friendship>>;

    /// Posts with their comments, likes and tags attached.
    fn load_posts(&self) -> Result<Vec<Post>>;

    fn load_conversations(&self) -> Result<Conversations>;

    fn save_users(&mut self, users: &[User]) -> Result<()>;

    fn save_friendships(&mut self, friendships: &[Friendship]) -> Result<()>;

    fn save_posts(&mut self, posts: &[Post]) -> Result<()>;

    fn save_conversations(&mut self, conversations: &Conversations) -> Result<()>;

    fn load(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            users: self.load_users()?,
            friendships: self.load_friendships()?,
            posts: self.load_posts()?,
            conversations: self.load_conversations()?,
        })
    }
}
