use crate::codec::{decode_flag, encode_flag, join_list, join_record, split_list, split_record};
use crate::error::{FriendbookError, Result};
use crate::ids::PostId;
use crate::model::Post;
use serde::Serialize;

/// A registered account.
///
/// All relations point at other users by username. The relation lists behave as
/// ordered sets and keep these invariants:
/// - `restricted ⊆ friends`
/// - `friends ∩ blocked = ∅`
/// - nobody is their own friend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    username: String,
    email: String,
    #[serde(skip)]
    password: String,
    gender: String,
    is_bot: bool,
    is_public: bool,
    friends: Vec<String>,
    friend_requests: Vec<String>,
    restricted: Vec<String>,
    blocked: Vec<String>,
    posts: Vec<PostId>,
}

fn insert_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn remove_value(list: &mut Vec<String>, value: &str) -> bool {
    let before = list.len();
    list.retain(|v| v != value);
    list.len() != before
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            gender: gender.into(),
            is_bot: false,
            is_public: true,
            friends: Vec::new(),
            friend_requests: Vec::new(),
            restricted: Vec::new(),
            blocked: Vec::new(),
            posts: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn is_bot(&self) -> bool {
        self.is_bot
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn friends(&self) -> &[String] {
        &self.friends
    }

    pub fn friend_requests(&self) -> &[String] {
        &self.friend_requests
    }

    pub fn restricted_friends(&self) -> &[String] {
        &self.restricted
    }

    pub fn blocked_users(&self) -> &[String] {
        &self.blocked
    }

    pub fn posts(&self) -> &[PostId] {
        &self.posts
    }

    pub fn set_bot(&mut self, bot: bool) {
        self.is_bot = bot;
    }

    pub fn set_public(&mut self, public: bool) {
        self.is_public = public;
    }

    // --- Friends ---

    /// Adds a friend. Refused for self and for blocked users.
    pub fn add_friend(&mut self, username: &str) -> bool {
        if username == self.username || self.is_blocked(username) {
            return false;
        }
        insert_unique(&mut self.friends, username)
    }

    /// Removing a friend also lifts any restriction on them.
    pub fn remove_friend(&mut self, username: &str) -> bool {
        remove_value(&mut self.restricted, username);
        remove_value(&mut self.friends, username)
    }

    pub fn has_friend(&self, username: &str) -> bool {
        self.friends.iter().any(|f| f == username)
    }

    pub fn is_friend(&self, username: &str) -> bool {
        self.has_friend(username)
    }

    pub fn add_friend_request(&mut self, from: &str) -> bool {
        if from == self.username {
            return false;
        }
        insert_unique(&mut self.friend_requests, from)
    }

    pub fn remove_friend_request(&mut self, from: &str) -> bool {
        remove_value(&mut self.friend_requests, from)
    }

    pub fn has_friend_request(&self, from: &str) -> bool {
        self.friend_requests.iter().any(|r| r == from)
    }

    // --- Password ---

    pub fn check_password(&self, password: &str) -> bool {
        self.password == password
    }

    /// Returns false, leaving the password untouched, when `old` does not match.
    pub fn change_password(&mut self, old: &str, new: &str) -> bool {
        if !self.check_password(old) {
            return false;
        }
        self.password = new.to_string();
        true
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    // --- Restriction & blocking ---

    /// No-op unless `username` is already a friend.
    pub fn restrict_friend(&mut self, username: &str) -> bool {
        if !self.is_friend(username) {
            return false;
        }
        insert_unique(&mut self.restricted, username)
    }

    pub fn unrestrict_friend(&mut self, username: &str) -> bool {
        remove_value(&mut self.restricted, username)
    }

    pub fn is_restricted_friend(&self, username: &str) -> bool {
        self.restricted.iter().any(|r| r == username)
    }

    /// Drops the friendship and any pending request from them, then blocks.
    pub fn block_user(&mut self, username: &str) -> bool {
        if username == self.username {
            return false;
        }
        self.remove_friend(username);
        self.remove_friend_request(username);
        insert_unique(&mut self.blocked, username)
    }

    pub fn unblock_user(&mut self, username: &str) -> bool {
        remove_value(&mut self.blocked, username)
    }

    pub fn is_blocked(&self, username: &str) -> bool {
        self.blocked.iter().any(|b| b == username)
    }

    // --- Posts ---

    pub fn add_post(&mut self, id: PostId) {
        if !self.posts.contains(&id) {
            self.posts.push(id);
        }
    }

    pub fn remove_post(&mut self, id: PostId) -> bool {
        let before = self.posts.len();
        self.posts.retain(|p| *p != id);
        self.posts.len() != before
    }

    // --- Relationship queries ---

    /// Both users list each other as friends, neither restricts the other and
    /// neither blocks the other.
    pub fn has_open_friendship(&self, other: &User) -> bool {
        self.is_friend(&other.username)
            && other.is_friend(&self.username)
            && !self.is_restricted_friend(&other.username)
            && !other.is_restricted_friend(&self.username)
            && !self.is_blocked(&other.username)
            && !other.is_blocked(&self.username)
    }

    /// Friends the two users have in common, resolved through `lookup`.
    ///
    /// Empty unless the two share an open friendship. Usernames `lookup` cannot
    /// resolve are skipped.
    pub fn mutual_friends<'a, F>(&self, other: &User, lookup: F) -> Vec<&'a User>
    where
        F: Fn(&str) -> Option<&'a User>,
    {
        if !self.has_open_friendship(other) {
            return Vec::new();
        }
        self.friends
            .iter()
            .filter(|name| other.is_friend(name))
            .filter_map(|name| lookup(name))
            .collect()
    }

    /// Posts authored by either user that both of them are allowed to see.
    ///
    /// Empty unless the two share an open friendship. `posts` is the system-wide post
    /// collection; each id in either user's post list is resolved against it.
    pub fn common_visible_posts<'a>(&self, other: &User, posts: &'a [Post]) -> Vec<&'a Post> {
        if !self.has_open_friendship(other) {
            return Vec::new();
        }
        let resolve = |id: &PostId| {
            posts
                .binary_search_by_key(id, |p| p.id())
                .ok()
                .map(|idx| &posts[idx])
        };

        let mut common: Vec<&Post> = Vec::new();
        for (owner, viewer) in [(self, other), (other, self)] {
            for post in owner.posts.iter().filter_map(resolve) {
                if post.can_user_view(viewer, owner) {
                    common.push(post);
                }
            }
        }
        common.sort_by_key(|p| p.id());
        common
    }

    // --- Serialization ---

    /// `username|email|password|gender|public|bot|friends|requests|restricted|blocked`
    pub fn serialize(&self) -> String {
        join_record([
            self.username.as_str(),
            self.email.as_str(),
            self.password.as_str(),
            self.gender.as_str(),
            encode_flag(self.is_public),
            encode_flag(self.is_bot),
            join_list(&self.friends).as_str(),
            join_list(&self.friend_requests).as_str(),
            join_list(&self.restricted).as_str(),
            join_list(&self.blocked).as_str(),
        ])
    }

    /// Parses a line written by [`User::serialize`]. The four list columns are optional.
    pub fn deserialize(line: &str) -> Result<User> {
        let fields = split_record(line);
        if fields.len() < 6 {
            return Err(invalid(format!(
                "expected at least 6 fields, found {}",
                fields.len()
            )));
        }
        if fields[0].is_empty() {
            return Err(invalid("empty username".to_string()));
        }

        let mut user = User::new(
            fields[0].as_str(),
            fields[1].as_str(),
            fields[2].as_str(),
            fields[3].as_str(),
        );
        user.is_public = decode_flag(&fields[4])
            .ok_or_else(|| invalid(format!("bad public flag '{}'", fields[4])))?;
        user.is_bot = decode_flag(&fields[5])
            .ok_or_else(|| invalid(format!("bad bot flag '{}'", fields[5])))?;

        let list = |idx: usize| fields.get(idx).map(|f| split_list(f)).unwrap_or_default();
        for blocked in list(9) {
            user.block_user(&blocked);
        }
        for friend in list(6) {
            user.add_friend(&friend);
        }
        for request in list(7) {
            user.add_friend_request(&request);
        }
        for restricted in list(8) {
            user.restrict_friend(&restricted);
        }
        Ok(user)
    }
}

fn invalid(reason: String) -> FriendbookError {
    FriendbookError::InvalidDataFormat {
        file: "user record".to_string(),
        line: 0,
        reason,
    }
}
