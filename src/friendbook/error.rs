use crate::ids::{CommentId, PostId};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FriendbookError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed")]
    InvalidCredentials,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("You cannot send a friend request to yourself")]
    CannotBefriendSelf,

    #[error("Already friends with {0}")]
    AlreadyFriends(String),

    #[error("A friend request to {0} is already pending")]
    RequestPending(String),

    #[error("No pending friend request from {0}")]
    NoPendingRequest(String),

    #[error("Not friends with {0}")]
    NotFriends(String),

    #[error("Blocked: {0}")]
    Blocked(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("File operation failed on {}: {source}", path.display())]
    FileOperation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data format in {file}, line {line}: {reason}")]
    InvalidDataFormat {
        file: String,
        line: usize,
        reason: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl FriendbookError {
    /// True for storage failures, false for rejected requests.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            FriendbookError::FileOperation { .. }
                | FriendbookError::Io(_)
                | FriendbookError::InvalidDataFormat { .. }
                | FriendbookError::Serialization(_)
                | FriendbookError::Store(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FriendbookError>;
