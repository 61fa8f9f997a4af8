use crate::error::{FriendbookError, Result};
use crate::ids::PostId;
use crate::model::{Post, User};
use crate::network::Network;

fn newest_first(mut posts: Vec<&Post>) -> Vec<&Post> {
    posts.sort_by(|a, b| b.id().cmp(&a.id()));
    posts
}

/// Posts by `author` that `viewer` may see, newest first.
pub fn visible_posts<'a>(
    network: &'a Network,
    viewer: &str,
    author: &str,
) -> Result<Vec<&'a Post>> {
    let viewer = network.require_user(viewer)?;
    let owner = network.require_user(author)?;
    let posts = owner
        .posts()
        .iter()
        .filter_map(|id| network.post(*id))
        .filter(|post| post.can_user_view(viewer, owner))
        .collect();
    Ok(newest_first(posts))
}

/// Every post in the network `viewer` may see, newest first.
pub fn all_visible<'a>(network: &'a Network, viewer: &str) -> Result<Vec<&'a Post>> {
    let viewer = network.require_user(viewer)?;
    let posts = network
        .posts()
        .iter()
        .filter(|post| network.can_view(viewer, post))
        .collect();
    Ok(newest_first(posts))
}

/// `actor`'s own posts plus the visible posts of their friends, newest first.
pub fn feed<'a>(network: &'a Network, actor: &str) -> Result<Vec<&'a Post>> {
    let user = network.require_user(actor)?;
    let posts = network
        .posts()
        .iter()
        .filter(|post| post.author() == actor || user.is_friend(post.author()))
        .filter(|post| network.can_view(user, post))
        .collect();
    Ok(newest_first(posts))
}

/// A single post, if `viewer` may see it.
pub fn view<'a>(network: &'a Network, viewer: &str, id: PostId) -> Result<&'a Post> {
    let viewer = network.require_user(viewer)?;
    let post = network.require_post(id)?;
    if !network.can_view(viewer, post) {
        let message = format!("post {} is not visible to you", id);
        return Err(FriendbookError::AccessDenied(message));
    }
    Ok(post)
}

pub fn timeline<'a>(network: &'a Network, viewer: &str, username: &str) -> Result<Vec<&'a Post>> {
    visible_posts(network, viewer, username)
}

/// Posts of either user that both may see. Empty unless the two are friends with no
/// restriction or block between them.
pub fn common_posts<'a>(network: &'a Network, a: &str, b: &str) -> Result<Vec<&'a Post>> {
    let ua = network.require_user(a)?;
    let ub = network.require_user(b)?;
    Ok(ua.common_visible_posts(ub, network.posts()))
}

pub fn mutual_friends<'a>(network: &'a Network, a: &str, b: &str) -> Result<Vec<&'a User>> {
    let ua = network.require_user(a)?;
    let ub = network.require_user(b)?;
    Ok(ua.mutual_friends(ub, |name| network.user(name)))
}
