use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(PostId)
            .map_err(|_| format!("Invalid post id: {}", s))
    }
}

impl FromStr for CommentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(CommentId)
            .map_err(|_| format!("Invalid comment id: {}", s))
    }
}

/// Hands out post and comment ids from two independent counters.
///
/// Ids are never reused: after loading persisted data, call [`IdAllocator::observe_post`]
/// and [`IdAllocator::observe_comment`] for every id seen so the counters move past them.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_post: u64,
    next_comment: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_post_id(&mut self) -> PostId {
        let id = PostId(self.next_post);
        self.next_post += 1;
        id
    }

    pub fn next_comment_id(&mut self) -> CommentId {
        let id = CommentId(self.next_comment);
        self.next_comment += 1;
        id
    }

    pub fn observe_post(&mut self, id: PostId) {
        self.next_post = self.next_post.max(id.0 + 1);
    }

    pub fn observe_comment(&mut self, id: CommentId) {
        self.next_comment = self.next_comment.max(id.0 + 1);
    }
}
