use super::non_blank;
use crate::error::{FriendbookError, Result};
use crate::ids::{CommentId, PostId};
use crate::model::{Post, Privacy};
use crate::network::Network;
use chrono::{DateTime, Utc};

/// Fails unless `actor` may see post `id`.
fn ensure_visible(network: &Network, actor: &str, id: PostId) -> Result<()> {
    let post = network.require_post(id)?;
    let viewer = network.require_user(actor)?;
    if !network.can_view(viewer, post) {
        let message = format!("post {} is not visible to you", id);
        return Err(FriendbookError::AccessDenied(message));
    }
    Ok(())
}

/// Fails unless `actor` wrote post `id`.
fn ensure_author(network: &Network, actor: &str, id: PostId) -> Result<()> {
    if network.require_post(id)?.author() != actor {
        let message = format!("post {} belongs to someone else", id);
        return Err(FriendbookError::AccessDenied(message));
    }
    Ok(())
}

fn notify_author(network: &mut Network, id: PostId, actor: &str, what: &str) {
    let Some(author) = network.post(id).map(|p| p.author().to_string()) else {
        return;
    };
    if author != actor {
        network.notify(&author, format!("{} {}", actor, what));
    }
}

pub fn create(
    network: &mut Network,
    author: &str,
    content: &str,
    privacy: Privacy,
    now: DateTime<Utc>,
) -> Result<PostId> {
    non_blank(content, "Post content")?;
    let id = network.publish(author, content, privacy, now)?;
    tracing::debug!("{} created post {} ({})", author, id, privacy);
    Ok(id)
}

/// Returns false when `actor` had already liked the post.
pub fn like(network: &mut Network, actor: &str, id: PostId) -> Result<bool> {
    ensure_visible(network, actor, id)?;
    let added = network.require_post_mut(id)?.add_like(actor);
    if added {
        notify_author(network, id, actor, "liked your post");
    }
    Ok(added)
}

pub fn unlike(network: &mut Network, actor: &str, id: PostId) -> Result<bool> {
    Ok(network.require_post_mut(id)?.remove_like(actor))
}

pub fn comment(
    network: &mut Network,
    actor: &str,
    id: PostId,
    content: &str,
    now: DateTime<Utc>,
) -> Result<CommentId> {
    non_blank(content, "Comment")?;
    ensure_visible(network, actor, id)?;
    let comment_id = network.next_comment_id();
    network
        .require_post_mut(id)?
        .add_comment(comment_id, actor, content, now);
    notify_author(network, id, actor, "commented on your post");
    Ok(comment_id)
}

pub fn reply(
    network: &mut Network,
    actor: &str,
    post_id: PostId,
    parent: CommentId,
    content: &str,
    now: DateTime<Utc>,
) -> Result<CommentId> {
    non_blank(content, "Reply")?;
    ensure_visible(network, actor, post_id)?;
    if network.require_post(post_id)?.comment(parent).is_none() {
        return Err(FriendbookError::CommentNotFound(parent));
    }

    let reply_id = network.next_comment_id();
    let parent_author = {
        let comment = network
            .require_post_mut(post_id)?
            .comment_mut(parent)
            .ok_or(FriendbookError::CommentNotFound(parent))?;
        comment.add_reply(reply_id, actor, content, now);
        comment.author().to_string()
    };
    if parent_author != actor {
        network.notify(&parent_author, format!("{} replied to your comment", actor));
    }
    Ok(reply_id)
}

pub fn like_comment(
    network: &mut Network,
    actor: &str,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<bool> {
    ensure_visible(network, actor, post_id)?;
    let comment = network
        .require_post_mut(post_id)?
        .comment_mut(comment_id)
        .ok_or(FriendbookError::CommentNotFound(comment_id))?;
    Ok(comment.add_like(actor))
}

pub fn unlike_comment(
    network: &mut Network,
    actor: &str,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<bool> {
    let comment = network
        .require_post_mut(post_id)?
        .comment_mut(comment_id)
        .ok_or(FriendbookError::CommentNotFound(comment_id))?;
    Ok(comment.remove_like(actor))
}

/// Reposts `id` as a new post by `actor` with content `Shared: <content>`.
pub fn share(
    network: &mut Network,
    actor: &str,
    id: PostId,
    privacy: Privacy,
    now: DateTime<Utc>,
) -> Result<PostId> {
    ensure_visible(network, actor, id)?;
    let content = format!("Shared: {}", network.require_post(id)?.content());
    let shared = network.publish(actor, &content, privacy, now)?;
    notify_author(network, id, actor, "shared your post");
    Ok(shared)
}

/// Deletes one of `actor`'s own posts, comments included.
pub fn delete(network: &mut Network, actor: &str, id: PostId) -> Result<Post> {
    ensure_author(network, actor, id)?;
    let post = network
        .remove_post(id)
        .ok_or(FriendbookError::PostNotFound(id))?;
    tracing::info!("{} deleted post {}", actor, id);
    Ok(post)
}

/// Tags `username` on one of `actor`'s posts. Returns false if already tagged.
pub fn tag(network: &mut Network, actor: &str, id: PostId, username: &str) -> Result<bool> {
    ensure_author(network, actor, id)?;
    network.require_user(username)?;
    let added = network.require_post_mut(id)?.tag_user(username);
    if added && username != actor {
        network.notify(username, format!("{} tagged you in a post", actor));
    }
    Ok(added)
}

pub fn set_privacy(network: &mut Network, actor: &str, id: PostId, privacy: Privacy) -> Result<()> {
    ensure_author(network, actor, id)?;
    network.require_post_mut(id)?.set_privacy(privacy);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{auth, friends};

    fn network(names: &[&str]) -> Network {
        let mut net = Network::default();
        for name in names {
            auth::register(&mut net, name, &format!("{}@x.com", name), "pw", "").unwrap();
        }
        net
    }

    fn befriend(net: &mut Network, a: &str, b: &str) {
        friends::send_request(net, a, b).unwrap();
        friends::accept_request(net, b, a).unwrap();
    }

    #[test]
    fn likes_are_a_set() {
        let mut net = network(&["alice", "bob", "carol"]);
        let id = create(&mut net, "alice", "hello", Privacy::Public, Utc::now()).unwrap();

        assert!(like(&mut net, "bob", id).unwrap());
        assert!(like(&mut net, "carol", id).unwrap());
        assert_eq!(net.post(id).unwrap().likes().len(), 2);

        assert!(!like(&mut net, "bob", id).unwrap());
        assert_eq!(net.post(id).unwrap().likes().len(), 2);
        assert_eq!(net.notifications().for_user("alice").len(), 2);

        assert!(unlike(&mut net, "bob", id).unwrap());
        assert_eq!(net.post(id).unwrap().likes(), ["carol"]);
    }

    #[test]
    fn like_looks_up_by_id_after_deletes() {
        let mut net = network(&["alice", "bob"]);
        let first = create(&mut net, "alice", "one", Privacy::Public, Utc::now()).unwrap();
        let second = create(&mut net, "alice", "two", Privacy::Public, Utc::now()).unwrap();
        delete(&mut net, "alice", first).unwrap();

        like(&mut net, "bob", second).unwrap();
        assert!(net.post(second).unwrap().has_liked("bob"));
        assert!(matches!(
            like(&mut net, "bob", first),
            Err(FriendbookError::PostNotFound(_))
        ));
    }

    #[test]
    fn private_posts_refuse_interaction() {
        let mut net = network(&["alice", "bob"]);
        let id = create(&mut net, "alice", "secret", Privacy::Private, Utc::now()).unwrap();
        assert!(matches!(
            like(&mut net, "bob", id),
            Err(FriendbookError::AccessDenied(_))
        ));
        assert!(comment(&mut net, "bob", id, "hi", Utc::now()).is_err());
        assert!(share(&mut net, "bob", id, Privacy::Public, Utc::now()).is_err());
        assert!(like(&mut net, "alice", id).unwrap());
    }

    #[test]
    fn comments_and_replies_notify() {
        let mut net = network(&["alice", "bob"]);
        befriend(&mut net, "alice", "bob");
        let id = create(&mut net, "alice", "hi", Privacy::FriendsOnly, Utc::now()).unwrap();

        let c = comment(&mut net, "bob", id, "nice", Utc::now()).unwrap();
        let r = reply(&mut net, "alice", id, c, "thanks", Utc::now()).unwrap();
        assert!(like_comment(&mut net, "alice", id, c).unwrap());
        assert!(!like_comment(&mut net, "alice", id, c).unwrap());

        let post = net.post(id).unwrap();
        assert_eq!(post.comment_count(), 2);
        assert_eq!(post.comment(r).unwrap().content(), "thanks");

        let bob = net.notifications().for_user("bob");
        assert_eq!(bob.last().unwrap(), "alice replied to your comment");
        let alice = net.notifications().for_user("alice");
        assert_eq!(alice.last().unwrap(), "bob commented on your post");

        assert!(matches!(
            reply(&mut net, "bob", id, CommentId(999), "?", Utc::now()),
            Err(FriendbookError::CommentNotFound(_))
        ));
    }

    #[test]
    fn share_copies_content() {
        let mut net = network(&["alice", "bob"]);
        let id = create(&mut net, "alice", "news", Privacy::Public, Utc::now()).unwrap();
        let shared = share(&mut net, "bob", id, Privacy::Public, Utc::now()).unwrap();

        let post = net.post(shared).unwrap();
        assert_eq!(post.author(), "bob");
        assert_eq!(post.content(), "Shared: news");
        assert_eq!(
            net.notifications().for_user("alice"),
            vec!["bob shared your post"]
        );
    }

    #[test]
    fn only_the_author_manages_a_post() {
        let mut net = network(&["alice", "bob"]);
        let id = create(&mut net, "alice", "mine", Privacy::Public, Utc::now()).unwrap();

        assert!(delete(&mut net, "bob", id).is_err());
        assert!(set_privacy(&mut net, "bob", id, Privacy::Private).is_err());
        assert!(tag(&mut net, "bob", id, "bob").is_err());

        assert!(tag(&mut net, "alice", id, "bob").unwrap());
        assert!(!tag(&mut net, "alice", id, "bob").unwrap());
        set_privacy(&mut net, "alice", id, Privacy::Private).unwrap();
        assert_eq!(net.post(id).unwrap().privacy(), Privacy::Private);

        delete(&mut net, "alice", id).unwrap();
        assert!(net.user("alice").unwrap().posts().is_empty());
    }

    #[test]
    fn blank_posts_are_rejected() {
        let mut net = network(&["alice"]);
        assert!(matches!(
            create(&mut net, "alice", "   ", Privacy::Public, Utc::now()),
            Err(FriendbookError::InvalidInput(_))
        ));
    }
}
