use super::feed;
use crate::error::Result;
use crate::model::{Post, User};
use crate::network::Network;

/// Posts `viewer` may see whose content or author contains `query`, ignoring case.
/// Newest first.
pub fn posts<'a>(network: &'a Network, viewer: &str, query: &str) -> Result<Vec<&'a Post>> {
    let needle = query.to_lowercase();
    Ok(feed::all_visible(network, viewer)?
        .into_iter()
        .filter(|post| {
            post.content().to_lowercase().contains(&needle)
                || post.author().to_lowercase().contains(&needle)
        })
        .collect())
}

/// Users whose username or email contains `query`, ignoring case. An empty query
/// lists everyone.
pub fn users<'a>(network: &'a Network, query: &str) -> Vec<&'a User> {
    let needle = query.to_lowercase();
    network
        .users()
        .iter()
        .filter(|user| {
            user.username().to_lowercase().contains(&needle)
                || user.email().to_lowercase().contains(&needle)
        })
        .collect()
}
