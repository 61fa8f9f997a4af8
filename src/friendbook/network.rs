//! # Network State
//!
//! [`Network`] owns every entity of a running system: the user arena, the post arena,
//! all conversations, the per-user notification queues and the id allocator.
//!
//! Users are stored in a `Vec` and never removed, so a slot index stays valid for the
//! lifetime of the network. Two maps index the arena by username and by email; they
//! are what enforces both uniqueness constraints.
//!
//! Posts are kept sorted by [`PostId`]. New ids always exceed every id already held, so
//! appending preserves the order and lookups can binary search.
//!
//! The command layer mutates a `Network`; it never touches storage. Persisting is the
//! API layer's job, see [`Network::friendships`] for the derived friendship table.

use crate::error::{FriendbookError, Result};
use crate::ids::{CommentId, IdAllocator, PostId};
use crate::model::{Conversations, Friendship, Post, Privacy, User};
use crate::notifications::Notifications;
use crate::store::Snapshot;
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct Network {
    users: Vec<User>,
    by_username: HashMap<String, usize>,
    by_email: HashMap<String, usize>,
    posts: Vec<Post>,
    conversations: Conversations,
    notifications: Notifications,
    ids: IdAllocator,
}

impl Network {
    pub fn new(notification_capacity: usize) -> Self {
        Self {
            notifications: Notifications::with_capacity(notification_capacity),
            ..Self::default()
        }
    }

    /// Rebuilds a network from stored tables, repairing what it can.
    ///
    /// - duplicate usernames or emails keep the first record
    /// - friendships from the edge table and from the users' own lists are merged and
    ///   made symmetric; edges to unknown users or across a block are dropped
    /// - posts, comments and messages by unknown users are dropped
    /// - the id allocator moves past every post and comment id seen
    pub fn from_snapshot(snapshot: Snapshot, notification_capacity: usize) -> Self {
        let mut network = Network::new(notification_capacity);

        for user in snapshot.users {
            let name = user.username().to_string();
            if let Err(e) = network.insert_user(user) {
                tracing::warn!("skipping stored user '{}': {}", name, e);
            }
        }

        let mut edges: BTreeSet<Friendship> = snapshot.friendships.into_iter().collect();
        for user in &network.users {
            for friend in user.friends() {
                edges.insert(Friendship::new(user.username(), friend));
            }
        }
        for edge in edges {
            if !network.link_friends(&edge.a, &edge.b) {
                tracing::warn!("dropping friendship {}-{}", edge.a, edge.b);
                network.unlink_friends(&edge.a, &edge.b);
            }
        }

        for mut post in snapshot.posts {
            if network.user(post.author()).is_none() {
                tracing::warn!("skipping post {} by unknown user '{}'", post.id(), post.author());
                continue;
            }
            let strays: Vec<CommentId> = post
                .comment_rows()
                .into_iter()
                .filter(|(_, c)| !network.by_username.contains_key(c.author()))
                .map(|(_, c)| c.id())
                .collect();
            for id in strays {
                post.remove_comment(id);
            }
            if network.post(post.id()).is_some() {
                tracing::warn!("skipping duplicate post {}", post.id());
                continue;
            }
            network.adopt_post(post);
        }

        network.conversations = snapshot
            .conversations
            .messages()
            .filter(|m| {
                network.by_username.contains_key(&m.sender)
                    && network.by_username.contains_key(&m.recipient)
            })
            .cloned()
            .collect();

        network
    }

    // --- Users ---

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, username: &str) -> Option<&User> {
        self.by_username.get(username).map(|&slot| &self.users[slot])
    }

    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        let slot = *self.by_username.get(username)?;
        self.users.get_mut(slot)
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.by_email.get(email).map(|&slot| &self.users[slot])
    }

    pub fn require_user(&self, username: &str) -> Result<&User> {
        self.user(username)
            .ok_or_else(|| FriendbookError::UserNotFound(username.to_string()))
    }

    pub fn require_user_mut(&mut self, username: &str) -> Result<&mut User> {
        self.user_mut(username)
            .ok_or_else(|| FriendbookError::UserNotFound(username.to_string()))
    }

    /// Both users, mutably. `None` if either is unknown or they are the same user.
    pub fn user_pair_mut(&mut self, a: &str, b: &str) -> Option<(&mut User, &mut User)> {
        let ia = *self.by_username.get(a)?;
        let ib = *self.by_username.get(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (left, right) = self.users.split_at_mut(ib);
            Some((&mut left[ia], &mut right[0]))
        } else {
            let (left, right) = self.users.split_at_mut(ia);
            Some((&mut right[0], &mut left[ib]))
        }
    }

    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.by_username.contains_key(user.username()) {
            return Err(FriendbookError::UsernameTaken(user.username().to_string()));
        }
        if self.by_email.contains_key(user.email()) {
            return Err(FriendbookError::EmailTaken(user.email().to_string()));
        }
        let slot = self.users.len();
        self.by_username.insert(user.username().to_string(), slot);
        self.by_email.insert(user.email().to_string(), slot);
        self.users.push(user);
        Ok(())
    }

    // --- Friendships ---

    /// Both users list each other as friends.
    pub fn are_friends(&self, a: &str, b: &str) -> bool {
        match (self.user(a), self.user(b)) {
            (Some(ua), Some(ub)) => ua.is_friend(b) && ub.is_friend(a),
            _ => false,
        }
    }

    /// `from` has asked `to` and `to` has not answered yet.
    pub fn has_pending_request(&self, from: &str, to: &str) -> bool {
        self.user(to).is_some_and(|u| u.has_friend_request(from))
    }

    /// Either user blocks the other.
    pub fn is_blocked_between(&self, a: &str, b: &str) -> bool {
        self.user(a).is_some_and(|u| u.is_blocked(b))
            || self.user(b).is_some_and(|u| u.is_blocked(a))
    }

    /// Makes the two users friends of each other. Refused for unknown users, for a
    /// user and themselves, and across a block.
    pub fn link_friends(&mut self, a: &str, b: &str) -> bool {
        if self.is_blocked_between(a, b) {
            return false;
        }
        let Some((ua, ub)) = self.user_pair_mut(a, b) else {
            return false;
        };
        ua.add_friend(b);
        ub.add_friend(a);
        true
    }

    /// Removes the friendship in both directions. Returns whether either side had it.
    pub fn unlink_friends(&mut self, a: &str, b: &str) -> bool {
        let mut removed = false;
        if let Some(ua) = self.user_mut(a) {
            removed |= ua.remove_friend(b);
        }
        if let Some(ub) = self.user_mut(b) {
            removed |= ub.remove_friend(a);
        }
        removed
    }

    /// The undirected edge table, one entry per mutual friendship, sorted.
    pub fn friendships(&self) -> Vec<Friendship> {
        let mut edges = Vec::new();
        for user in &self.users {
            for friend in user.friends() {
                if user.username() < friend.as_str() && self.are_friends(user.username(), friend) {
                    edges.push(Friendship::new(user.username(), friend));
                }
            }
        }
        edges.sort();
        edges
    }

    // --- Posts ---

    /// Every post, ordered by id.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.post_slot(id).map(|idx| &self.posts[idx])
    }

    pub fn post_mut(&mut self, id: PostId) -> Option<&mut Post> {
        let idx = self.post_slot(id)?;
        self.posts.get_mut(idx)
    }

    pub fn require_post(&self, id: PostId) -> Result<&Post> {
        self.post(id).ok_or(FriendbookError::PostNotFound(id))
    }

    pub fn require_post_mut(&mut self, id: PostId) -> Result<&mut Post> {
        self.post_mut(id).ok_or(FriendbookError::PostNotFound(id))
    }

    fn post_slot(&self, id: PostId) -> Option<usize> {
        self.posts.binary_search_by_key(&id, |p| p.id()).ok()
    }

    /// Creates a post with a fresh id and hands it to its author.
    pub fn publish(
        &mut self,
        author: &str,
        content: &str,
        privacy: Privacy,
        created_at: DateTime<Utc>,
    ) -> Result<PostId> {
        self.require_user(author)?;
        let id = self.ids.next_post_id();
        self.adopt_post(Post::new(id, author, content, created_at, privacy));
        Ok(id)
    }

    /// Inserts a post that already carries its id. The caller guarantees the author
    /// exists and the id is unused.
    fn adopt_post(&mut self, post: Post) {
        self.ids.observe_post(post.id());
        for (_, comment) in post.comment_rows() {
            self.ids.observe_comment(comment.id());
        }
        if let Some(author) = self.user_mut(post.author()) {
            author.add_post(post.id());
        }
        match self.posts.binary_search_by_key(&post.id(), |p| p.id()) {
            Ok(idx) => self.posts[idx] = post,
            Err(idx) => self.posts.insert(idx, post),
        }
    }

    /// Deletes a post along with its comments.
    pub fn remove_post(&mut self, id: PostId) -> Option<Post> {
        let idx = self.post_slot(id)?;
        let post = self.posts.remove(idx);
        if let Some(author) = self.user_mut(post.author()) {
            author.remove_post(id);
        }
        Some(post)
    }

    pub fn next_comment_id(&mut self) -> CommentId {
        self.ids.next_comment_id()
    }

    /// Resolves `post`'s author and asks the post whether `viewer` may see it.
    pub fn can_view(&self, viewer: &User, post: &Post) -> bool {
        match self.user(post.author()) {
            Some(author) => post.can_user_view(viewer, author),
            None => false,
        }
    }

    // --- Messages & notifications ---

    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    pub fn conversations_mut(&mut self) -> &mut Conversations {
        &mut self.conversations
    }

    pub fn notify(&mut self, username: &str, message: impl Into<String>) {
        self.notifications.push(username, message);
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::DataStore;

    fn user(name: &str) -> User {
        User::new(name, format!("{}@x.com", name), "pw", "")
    }

    #[test]
    fn both_keys_are_unique() {
        let mut net = Network::default();
        net.insert_user(user("alice")).unwrap();

        let err = net
            .insert_user(User::new("alice", "other@x.com", "pw", ""))
            .unwrap_err();
        assert!(matches!(err, FriendbookError::UsernameTaken(_)));

        let err = net
            .insert_user(User::new("alicia", "alice@x.com", "pw", ""))
            .unwrap_err();
        assert!(matches!(err, FriendbookError::EmailTaken(_)));
        assert_eq!(net.users().len(), 1);
    }

    #[test]
    fn pair_access_in_either_order() {
        let mut net = Network::default();
        net.insert_user(user("a")).unwrap();
        net.insert_user(user("b")).unwrap();

        let (b, a) = net.user_pair_mut("b", "a").unwrap();
        assert_eq!(b.username(), "b");
        assert_eq!(a.username(), "a");
        assert!(net.user_pair_mut("a", "a").is_none());
        assert!(net.user_pair_mut("a", "zed").is_none());
    }

    #[test]
    fn link_is_symmetric_and_refused_across_block() {
        let mut net = Network::default();
        for name in ["a", "b", "c"] {
            net.insert_user(user(name)).unwrap();
        }
        assert!(net.link_friends("a", "b"));
        assert!(net.are_friends("b", "a"));

        net.user_mut("c").unwrap().block_user("a");
        assert!(!net.link_friends("a", "c"));
        assert!(!net.are_friends("a", "c"));

        assert_eq!(net.friendships(), vec![Friendship::new("a", "b")]);
    }

    #[test]
    fn post_ids_keep_growing_after_delete() {
        let mut net = Network::default();
        net.insert_user(user("a")).unwrap();
        let first = net.publish("a", "one", Privacy::Public, Utc::now()).unwrap();
        let second = net.publish("a", "two", Privacy::Public, Utc::now()).unwrap();
        net.remove_post(first).unwrap();
        let third = net.publish("a", "three", Privacy::Public, Utc::now()).unwrap();

        assert!(third > second);
        assert_eq!(net.user("a").unwrap().posts(), [second, third]);
        assert!(net.post(first).is_none());
        assert_eq!(net.post(third).unwrap().content(), "three");
    }

    #[test]
    fn publish_requires_known_author() {
        let mut net = Network::default();
        let err = net.publish("ghost", "boo", Privacy::Public, Utc::now()).unwrap_err();
        assert!(matches!(err, FriendbookError::UserNotFound(_)));
    }

    #[test]
    fn snapshot_repairs_friendships_and_strays() {
        let store = StoreFixture::new()
            .with_user("alice")
            .with_user("bob")
            .with_friends("alice", "bob")
            .with_friends("alice", "ghost")
            .with_post("alice", "hi", Privacy::Public)
            .with_post("ghost", "boo", Privacy::Public)
            .build();

        let net = Network::from_snapshot(store.load().unwrap(), 10);
        assert!(net.are_friends("alice", "bob"));
        assert!(!net.user("alice").unwrap().is_friend("ghost"));
        assert_eq!(net.posts().len(), 1);
        assert_eq!(net.user("alice").unwrap().posts(), [PostId(0)]);
    }

    #[test]
    fn ids_resume_after_snapshot() {
        let store = StoreFixture::new()
            .with_user("alice")
            .with_post("alice", "one", Privacy::Public)
            .with_post("alice", "two", Privacy::Public)
            .build();

        let mut net = Network::from_snapshot(store.load().unwrap(), 10);
        let id = net.publish("alice", "three", Privacy::Public, Utc::now()).unwrap();
        assert_eq!(id, PostId(2));
    }
}
