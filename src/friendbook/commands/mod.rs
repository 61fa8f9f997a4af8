//! # Commands
//!
//! Business logic, one module per concern. Every command is a free function over a
//! [`Network`](crate::network::Network); commands that act on behalf of a user take
//! that user's name as `actor` and assume the session check already happened.
//!
//! Commands never persist. They report what changed through their return value and the
//! API layer decides which tables to write.

use crate::error::{FriendbookError, Result};

pub mod auth;
pub mod feed;
pub mod friends;
pub mod messages;
pub mod posts;
pub mod search;
pub mod seed;

/// Rejects blank text. Returns the input trimmed.
pub(crate) fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FriendbookError::InvalidInput(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}
