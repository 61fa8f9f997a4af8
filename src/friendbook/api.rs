//! # API Facade
//!
//! [`Friendbook`] is the single entry point for every friendbook operation, whatever the
//! UI. It owns the session (who is logged in), the in-memory [`Network`] and the store.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Guards the session**: operations on behalf of a user fail with
//!   [`FriendbookError::NotLoggedIn`] while nobody is logged in, and change nothing
//! - **Dispatches** to the command functions in `commands/*.rs`
//! - **Decides when to persist**: relationship changes (registration, passwords,
//!   requests, friendships, restrictions, blocks) rewrite the user and friendship tables
//!   right away; posts and messages are written on [`Friendbook::save`], on
//!   [`Friendbook::logout`] and when the facade is dropped
//!
//! ## Persistence Failures
//!
//! A write that happens as a side effect of a mutation never fails that mutation: the
//! error is logged and the in-memory change stands. Explicit flushes (`save`, `logout`)
//! return the error.
//!
//! ## Generic Over DataStore
//!
//! `Friendbook<S: DataStore>` is generic over the storage backend:
//! - Production: `Friendbook<FileStore>`
//! - Testing: `Friendbook<InMemoryStore>`

use crate::commands::{self, auth, feed, friends, messages, posts, search, seed};
use crate::config::FriendbookConfig;
use crate::error::{FriendbookError, Result};
use crate::ids::{CommentId, PostId};
use crate::model::{Message, Post, Privacy, User};
use crate::network::Network;
use crate::store::fs::FileStore;
use crate::store::DataStore;
use chrono::Utc;
use std::path::Path;

#[derive(Debug, Clone, Copy)]
enum Table {
    Users,
    Friendships,
    Posts,
    Conversations,
}

const GRAPH: [Table; 2] = [Table::Users, Table::Friendships];
const ALL: [Table; 4] = [
    Table::Users,
    Table::Friendships,
    Table::Posts,
    Table::Conversations,
];

/// The main API facade for friendbook operations.
pub struct Friendbook<S: DataStore> {
    store: S,
    config: FriendbookConfig,
    network: Network,
    current: Option<String>,
    dirty: bool,
}

impl Friendbook<FileStore> {
    /// Opens the data directory `dir`, reading `config.json` from it.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let config = FriendbookConfig::load(dir)?;
        Self::open(FileStore::new(dir), config)
    }
}

impl<S: DataStore> Friendbook<S> {
    /// Loads everything `store` holds. An empty store is seeded according to `config`.
    pub fn open(store: S, config: FriendbookConfig) -> Result<Self> {
        let snapshot = store.load()?;
        let network = Network::from_snapshot(snapshot, config.notification_capacity);
        tracing::info!(
            "loaded {} users and {} posts",
            network.users().len(),
            network.posts().len()
        );

        let mut api = Self {
            store,
            config,
            network,
            current: None,
            dirty: false,
        };

        if api.network.users().is_empty() {
            let now = Utc::now();
            let mut seeded = 0;
            if api.config.seed_bots {
                seeded += seed::bots(&mut api.network, now)?;
            }
            if api.config.seed_demo_users {
                seeded += seed::demo_users(&mut api.network, now)?;
            }
            if seeded > 0 {
                api.persist(&ALL);
            }
        }
        Ok(api)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &FriendbookConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    // --- Session ---

    /// Starts a session. Any previous session ends first. Notifications queued for the
    /// user are dropped. A person (not a bot) who logs in files friend requests with
    /// the default bots.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        self.current = None;
        let username = auth::authenticate(&self.network, email, password)?;
        self.network.notifications_mut().clear_user(&username);

        let sent = friends::bot_friend_requests(
            &mut self.network,
            &username,
            self.config.bot_friend_request_limit,
        )?;
        if sent > 0 {
            self.persist(&GRAPH);
        }

        tracing::info!("{} logged in", username);
        self.current = Some(username.clone());
        self.network.require_user(&username)
    }

    /// Ends the session, writing every table first. The session ends even when the
    /// write fails; the error is returned.
    pub fn logout(&mut self) -> Result<()> {
        let username = self.current.take().ok_or(FriendbookError::NotLoggedIn)?;
        let saved = self.save();
        self.network.notifications_mut().clear_user(&username);
        tracing::info!("{} logged out", username);
        saved
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_deref().and_then(|name| self.network.user(name))
    }

    fn actor(&self) -> Result<String> {
        self.current.clone().ok_or(FriendbookError::NotLoggedIn)
    }

    // --- Accounts ---

    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        gender: &str,
    ) -> Result<()> {
        auth::register(&mut self.network, username, email, password, gender)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    pub fn reset_password(
        &mut self,
        email: &str,
        security_answer: &str,
        new_password: &str,
    ) -> Result<()> {
        auth::reset_password(&mut self.network, email, security_answer, new_password)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    pub fn change_password(&mut self, old: &str, new: &str) -> Result<()> {
        let actor = self.actor()?;
        auth::change_password(&mut self.network, &actor, old, new)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    // --- Posts ---

    /// Posts as the current user with the configured default privacy.
    pub fn create_post(&mut self, content: &str) -> Result<PostId> {
        self.create_post_with_privacy(content, self.config.default_privacy)
    }

    pub fn create_post_with_privacy(&mut self, content: &str, privacy: Privacy) -> Result<PostId> {
        let actor = self.actor()?;
        let result = posts::create(&mut self.network, &actor, content, privacy, Utc::now());
        self.touch(result)
    }

    /// Posts on behalf of `author` without a session. Meant for seeding content.
    pub fn create_post_as(
        &mut self,
        author: &str,
        content: &str,
        privacy: Privacy,
    ) -> Result<PostId> {
        let result = posts::create(&mut self.network, author, content, privacy, Utc::now());
        self.touch(result)
    }

    pub fn like_post(&mut self, id: PostId) -> Result<bool> {
        let actor = self.actor()?;
        let result = posts::like(&mut self.network, &actor, id);
        self.touch(result)
    }

    pub fn unlike_post(&mut self, id: PostId) -> Result<bool> {
        let actor = self.actor()?;
        let result = posts::unlike(&mut self.network, &actor, id);
        self.touch(result)
    }

    pub fn comment_on_post(&mut self, id: PostId, content: &str) -> Result<CommentId> {
        let actor = self.actor()?;
        let result = posts::comment(&mut self.network, &actor, id, content, Utc::now());
        self.touch(result)
    }

    pub fn reply_to_comment(
        &mut self,
        post: PostId,
        comment: CommentId,
        content: &str,
    ) -> Result<CommentId> {
        let actor = self.actor()?;
        let result = posts::reply(
            &mut self.network,
            &actor,
            post,
            comment,
            content,
            Utc::now(),
        );
        self.touch(result)
    }

    pub fn like_comment(&mut self, post: PostId, comment: CommentId) -> Result<bool> {
        let actor = self.actor()?;
        let result = posts::like_comment(&mut self.network, &actor, post, comment);
        self.touch(result)
    }

    pub fn unlike_comment(&mut self, post: PostId, comment: CommentId) -> Result<bool> {
        let actor = self.actor()?;
        let result = posts::unlike_comment(&mut self.network, &actor, post, comment);
        self.touch(result)
    }

    pub fn share_post(&mut self, id: PostId) -> Result<PostId> {
        let actor = self.actor()?;
        let privacy = self.config.default_privacy;
        let result = posts::share(&mut self.network, &actor, id, privacy, Utc::now());
        self.touch(result)
    }

    pub fn delete_post(&mut self, id: PostId) -> Result<Post> {
        let actor = self.actor()?;
        let result = posts::delete(&mut self.network, &actor, id);
        self.touch(result)
    }

    pub fn tag_user(&mut self, id: PostId, username: &str) -> Result<bool> {
        let actor = self.actor()?;
        let result = posts::tag(&mut self.network, &actor, id, username);
        self.touch(result)
    }

    pub fn set_post_privacy(&mut self, id: PostId, privacy: Privacy) -> Result<()> {
        let actor = self.actor()?;
        let result = posts::set_privacy(&mut self.network, &actor, id, privacy);
        self.touch(result)
    }

    // --- Queries ---

    pub fn users(&self) -> &[User] {
        self.network.users()
    }

    pub fn user(&self, username: &str) -> Option<&User> {
        self.network.user(username)
    }

    /// Every post, ordered by id, without any visibility filtering.
    pub fn posts(&self) -> &[Post] {
        self.network.posts()
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.network.post(id)
    }

    /// Post `id`, provided the current user may see it.
    pub fn view_post(&self, id: PostId) -> Result<&Post> {
        feed::view(&self.network, &self.actor()?, id)
    }

    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        self.network.are_friends(a, b)
    }

    pub fn feed(&self) -> Result<Vec<&Post>> {
        feed::feed(&self.network, &self.actor()?)
    }

    /// Posts by `username` that the current user may see.
    pub fn timeline(&self, username: &str) -> Result<Vec<&Post>> {
        feed::timeline(&self.network, &self.actor()?, username)
    }

    /// Posts the current user shares with `other`, see [`User::common_visible_posts`].
    pub fn common_posts(&self, other: &str) -> Result<Vec<&Post>> {
        feed::common_posts(&self.network, &self.actor()?, other)
    }

    pub fn mutual_friends(&self, other: &str) -> Result<Vec<&User>> {
        feed::mutual_friends(&self.network, &self.actor()?, other)
    }

    pub fn search_posts(&self, query: &str) -> Result<Vec<&Post>> {
        search::posts(&self.network, &self.actor()?, query)
    }

    pub fn search_users(&self, query: &str) -> Vec<&User> {
        search::users(&self.network, query)
    }

    pub fn notifications(&self) -> Result<Vec<String>> {
        Ok(self.network.notifications().for_user(&self.actor()?))
    }

    // --- Friends ---

    pub fn send_friend_request(&mut self, to: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::send_request(&mut self.network, &actor, to)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    pub fn accept_friend_request(&mut self, from: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::accept_request(&mut self.network, &actor, from)?;
        self.persist(&GRAPH);
        Ok(())
    }

    pub fn reject_friend_request(&mut self, from: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::reject_request(&mut self.network, &actor, from)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    pub fn remove_friend(&mut self, username: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::remove_friend(&mut self.network, &actor, username)?;
        self.persist(&GRAPH);
        Ok(())
    }

    pub fn restrict_friend(&mut self, username: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::restrict(&mut self.network, &actor, username)?;
        self.persist(&[Table::Users]);
        Ok(())
    }

    pub fn unrestrict_friend(&mut self, username: &str) -> Result<bool> {
        let actor = self.actor()?;
        let lifted = friends::unrestrict(&mut self.network, &actor, username)?;
        self.persist(&[Table::Users]);
        Ok(lifted)
    }

    pub fn block_user(&mut self, username: &str) -> Result<()> {
        let actor = self.actor()?;
        friends::block(&mut self.network, &actor, username)?;
        self.persist(&GRAPH);
        Ok(())
    }

    pub fn unblock_user(&mut self, username: &str) -> Result<bool> {
        let actor = self.actor()?;
        let lifted = friends::unblock(&mut self.network, &actor, username)?;
        self.persist(&[Table::Users]);
        Ok(lifted)
    }

    pub fn pending_friend_requests(&self) -> Result<Vec<String>> {
        friends::pending_requests(&self.network, &self.actor()?)
    }

    pub fn friends(&self) -> Result<Vec<&User>> {
        friends::friends(&self.network, &self.actor()?)
    }

    // --- Messages ---

    pub fn send_message(&mut self, to: &str, content: &str) -> Result<()> {
        let actor = self.actor()?;
        let result = messages::send(&mut self.network, &actor, to, content, Utc::now());
        self.touch(result)
    }

    pub fn messages_with(&self, other: &str) -> Result<&[Message]> {
        messages::with(&self.network, &self.actor()?, other)
    }

    pub fn conversations(&self) -> Result<Vec<(String, &Message)>> {
        Ok(messages::conversations(&self.network, &self.actor()?))
    }

    // --- Persistence ---

    /// Writes every table.
    pub fn save(&mut self) -> Result<()> {
        for table in ALL {
            self.write(table)?;
        }
        self.dirty = false;
        Ok(())
    }

    fn write(&mut self, table: Table) -> Result<()> {
        match table {
            Table::Users => self.store.save_users(self.network.users()),
            Table::Friendships => self.store.save_friendships(&self.network.friendships()),
            Table::Posts => self.store.save_posts(self.network.posts()),
            Table::Conversations => self.store.save_conversations(self.network.conversations()),
        }
    }

    /// Writes `tables` now, logging failures instead of returning them.
    fn persist(&mut self, tables: &[Table]) {
        for table in tables {
            if let Err(e) = self.write(*table) {
                tracing::error!("failed to save {:?}: {}", table, e);
            }
        }
    }

    /// Marks unsaved post or message changes when `result` is a success.
    fn touch<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_ok() {
            self.dirty = true;
        }
        result
    }
}

impl<S: DataStore> Drop for Friendbook<S> {
    fn drop(&mut self) {
        if !self.dirty {
            return;
        }
        if let Err(e) = self.save() {
            tracing::error!("failed to save on shutdown: {}", e);
        }
    }
}

pub use commands::seed::{BOT_PASSWORD, GREETER_BOT, REQUEST_BOTS};
