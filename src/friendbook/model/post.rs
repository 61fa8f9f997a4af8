use crate::ids::{CommentId, PostId};
use crate::model::{Comment, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    #[default]
    Public,
    FriendsOnly,
    Private,
}

impl Privacy {
    /// Numeric code used in `posts.txt`.
    pub fn code(self) -> u8 {
        match self {
            Privacy::Public => 0,
            Privacy::FriendsOnly => 1,
            Privacy::Private => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Privacy::Public),
            1 => Some(Privacy::FriendsOnly),
            2 => Some(Privacy::Private),
            _ => None,
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privacy::Public => write!(f, "public"),
            Privacy::FriendsOnly => write!(f, "friends"),
            Privacy::Private => write!(f, "private"),
        }
    }
}

impl FromStr for Privacy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "public" => Ok(Privacy::Public),
            "friends" | "friends-only" | "friends_only" => Ok(Privacy::FriendsOnly),
            "private" => Ok(Privacy::Private),
            other => Err(format!(
                "Invalid privacy '{}' (expected public, friends or private)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    id: PostId,
    author: String,
    content: String,
    created_at: DateTime<Utc>,
    privacy: Privacy,
    likes: Vec<String>,
    comments: Vec<Comment>,
    tagged: Vec<String>,
}

impl Post {
    pub fn new(
        id: PostId,
        author: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        privacy: Privacy,
    ) -> Self {
        Self {
            id,
            author: author.into(),
            content: content.into(),
            created_at,
            privacy,
            likes: Vec::new(),
            comments: Vec::new(),
            tagged: Vec::new(),
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn privacy(&self) -> Privacy {
        self.privacy
    }

    pub fn set_privacy(&mut self, privacy: Privacy) {
        self.privacy = privacy;
    }

    // --- Likes ---

    pub fn add_like(&mut self, username: &str) -> bool {
        if self.has_liked(username) {
            return false;
        }
        self.likes.push(username.to_string());
        true
    }

    pub fn remove_like(&mut self, username: &str) -> bool {
        let before = self.likes.len();
        self.likes.retain(|l| l != username);
        self.likes.len() != before
    }

    pub fn has_liked(&self, username: &str) -> bool {
        self.likes.iter().any(|l| l == username)
    }

    pub fn likes(&self) -> &[String] {
        &self.likes
    }

    // --- Comments ---

    pub fn add_comment(
        &mut self,
        id: CommentId,
        author: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> &mut Comment {
        self.comments.push(Comment::new(id, author, content, created_at));
        let last = self.comments.len() - 1;
        &mut self.comments[last]
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Finds a comment at any depth.
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.iter().find_map(|c| c.find(id))
    }

    pub fn comment_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        self.comments.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Removes a comment at any depth, together with its replies.
    pub fn remove_comment(&mut self, id: CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id() != id);
        if self.comments.len() != before {
            return true;
        }
        self.comments.iter_mut().any(|c| c.remove_descendant(id))
    }

    /// Total number of comments including replies.
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(Comment::thread_size).sum()
    }

    /// Every comment in pre-order, paired with its parent's id. Parents always come
    /// before their replies.
    pub fn comment_rows(&self) -> Vec<(Option<CommentId>, &Comment)> {
        let mut rows = Vec::with_capacity(self.comment_count());
        for comment in &self.comments {
            comment.collect_rows(None, &mut rows);
        }
        rows
    }

    // --- Tags ---

    pub fn tag_user(&mut self, username: &str) -> bool {
        if self.is_user_tagged(username) {
            return false;
        }
        self.tagged.push(username.to_string());
        true
    }

    pub fn is_user_tagged(&self, username: &str) -> bool {
        self.tagged.iter().any(|t| t == username)
    }

    pub fn tagged_users(&self) -> &[String] {
        &self.tagged
    }

    // --- Visibility ---

    /// Whether `viewer` may see this post. `author` must be the post's author.
    ///
    /// Authors always see their own posts. A block in either direction hides the
    /// post. FRIENDS_ONLY posts are visible to the author's friends unless the
    /// author restricts them; PRIVATE posts to nobody else.
    pub fn can_user_view(&self, viewer: &User, author: &User) -> bool {
        debug_assert_eq!(author.username(), self.author);
        if viewer.username() == self.author {
            return true;
        }
        if author.is_blocked(viewer.username()) || viewer.is_blocked(author.username()) {
            return false;
        }
        match self.privacy {
            Privacy::Public => true,
            Privacy::FriendsOnly => {
                author.is_friend(viewer.username())
                    && !author.is_restricted_friend(viewer.username())
            }
            Privacy::Private => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(privacy: Privacy) -> Post {
        Post::new(PostId(1), "alice", "hello", Utc::now(), privacy)
    }

    fn user(name: &str) -> User {
        User::new(name, format!("{}@example.com", name), "pw", "")
    }

    #[test]
    fn likes_are_a_set() {
        let mut p = post(Privacy::Public);
        assert!(p.add_like("bob"));
        assert!(p.add_like("carol"));
        assert!(!p.add_like("bob"));
        assert_eq!(p.likes().len(), 2);

        assert!(p.remove_like("bob"));
        assert!(!p.remove_like("bob"));
        assert!(!p.has_liked("bob"));
        assert!(p.has_liked("carol"));
    }

    #[test]
    fn tagging_is_idempotent() {
        let mut p = post(Privacy::Public);
        assert!(p.tag_user("bob"));
        assert!(!p.tag_user("bob"));
        assert_eq!(p.tagged_users(), ["bob"]);
    }

    #[test]
    fn public_posts_are_visible_to_everyone() {
        let alice = user("alice");
        let bob = user("bob");
        assert!(post(Privacy::Public).can_user_view(&bob, &alice));
    }

    #[test]
    fn friends_only_requires_friendship() {
        let mut alice = user("alice");
        let bob = user("bob");
        let p = post(Privacy::FriendsOnly);
        assert!(!p.can_user_view(&bob, &alice));

        alice.add_friend("bob");
        assert!(p.can_user_view(&bob, &alice));

        alice.restrict_friend("bob");
        assert!(!p.can_user_view(&bob, &alice));
    }

    #[test]
    fn private_posts_are_author_only() {
        let mut alice = user("alice");
        let bob = user("bob");
        alice.add_friend("bob");
        let p = post(Privacy::Private);
        assert!(p.can_user_view(&alice, &alice));
        assert!(!p.can_user_view(&bob, &alice));
    }

    #[test]
    fn blocked_viewer_cannot_see_public_posts() {
        let mut alice = user("alice");
        let bob = user("bob");
        alice.block_user("bob");
        assert!(!post(Privacy::Public).can_user_view(&bob, &alice));
    }

    #[test]
    fn nested_comments_are_found_and_removed() {
        let mut p = post(Privacy::Public);
        let now = Utc::now();
        let top = p.add_comment(CommentId(1), "bob", "first", now);
        let reply = top.add_reply(CommentId(2), "alice", "thanks", now);
        reply.add_reply(CommentId(3), "bob", "np", now);
        p.add_comment(CommentId(4), "carol", "second", now);

        assert_eq!(p.comment_count(), 4);
        assert_eq!(p.comment(CommentId(3)).unwrap().content(), "np");

        let rows: Vec<_> = p
            .comment_rows()
            .into_iter()
            .map(|(parent, c)| (parent, c.id()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (None, CommentId(1)),
                (Some(CommentId(1)), CommentId(2)),
                (Some(CommentId(2)), CommentId(3)),
                (None, CommentId(4)),
            ]
        );

        assert!(p.remove_comment(CommentId(2)));
        assert_eq!(p.comment_count(), 2);
        assert!(p.comment(CommentId(3)).is_none());
        assert!(!p.remove_comment(CommentId(2)));
    }

    #[test]
    fn privacy_parsing() {
        assert_eq!("Friends".parse::<Privacy>(), Ok(Privacy::FriendsOnly));
        assert_eq!("private".parse::<Privacy>(), Ok(Privacy::Private));
        assert!("secret".parse::<Privacy>().is_err());
        assert_eq!(Privacy::from_code(Privacy::Private.code()), Some(Privacy::Private));
        assert_eq!(Privacy::from_code(9), None);
    }
}
