use crate::ids::CommentId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment on a post, or a reply to another comment. Replies nest without limit.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    id: CommentId,
    author: String,
    content: String,
    created_at: DateTime<Utc>,
    replies: Vec<Comment>,
    likes: Vec<String>,
}

impl Comment {
    pub fn new(id: CommentId, author: &str, content: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            author: author.to_string(),
            content: content.to_string(),
            created_at,
            replies: Vec::new(),
            likes: Vec::new(),
        }
    }

    pub fn id(&self) -> CommentId {
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

    pub fn replies(&self) -> &[Comment] {
        &self.replies
    }

    pub fn likes(&self) -> &[String] {
        &self.likes
    }

    pub fn add_reply(
        &mut self,
        id: CommentId,
        author: &str,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> &mut Comment {
        self.replies.push(Comment::new(id, author, content, created_at));
        let last = self.replies.len() - 1;
        &mut self.replies[last]
    }

    /// Removes an immediate reply (and its own replies).
    pub fn remove_reply(&mut self, id: CommentId) -> bool {
        let before = self.replies.len();
        self.replies.retain(|r| r.id != id);
        self.replies.len() != before
    }

    pub(crate) fn remove_descendant(&mut self, id: CommentId) -> bool {
        self.remove_reply(id) || self.replies.iter_mut().any(|r| r.remove_descendant(id))
    }

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

    /// This comment or one of its descendants.
    pub fn find(&self, id: CommentId) -> Option<&Comment> {
        if self.id == id {
            return Some(self);
        }
        self.replies.iter().find_map(|r| r.find(id))
    }

    pub fn find_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        if self.id == id {
            return Some(self);
        }
        self.replies.iter_mut().find_map(|r| r.find_mut(id))
    }

    /// This comment plus all of its descendants.
    pub fn thread_size(&self) -> usize {
        1 + self.replies.iter().map(Comment::thread_size).sum::<usize>()
    }

    pub(crate) fn collect_rows<'a>(
        &'a self,
        parent: Option<CommentId>,
        rows: &mut Vec<(Option<CommentId>, &'a Comment)>,
    ) {
        rows.push((parent, self));
        for reply in &self.replies {
            reply.collect_rows(Some(self.id), rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment() -> Comment {
        Comment::new(CommentId(1), "alice", "hi", Utc::now())
    }

    #[test]
    fn replies_are_added_without_validation() {
        let mut c = comment();
        c.add_reply(CommentId(2), "bob", "", Utc::now());
        c.add_reply(CommentId(3), "bob", "", Utc::now());
        assert_eq!(c.replies().len(), 2);
        assert_eq!(c.thread_size(), 3);
    }

    #[test]
    fn remove_reply_only_touches_immediate_children() {
        let mut c = comment();
        c.add_reply(CommentId(2), "bob", "x", Utc::now())
            .add_reply(CommentId(3), "carol", "y", Utc::now());

        assert!(!c.remove_reply(CommentId(3)));
        assert!(c.remove_reply(CommentId(2)));
        assert!(c.replies().is_empty());
    }

    #[test]
    fn comment_likes_are_a_set() {
        let mut c = comment();
        assert!(c.add_like("bob"));
        assert!(!c.add_like("bob"));
        assert_eq!(c.likes(), ["bob"]);
        assert!(c.remove_like("bob"));
        assert!(!c.has_liked("bob"));
    }
}
