use crate::error::{FriendbookError, Result};
use crate::model::User;
use crate::network::Network;

pub fn send_request(network: &mut Network, actor: &str, to: &str) -> Result<()> {
    if actor == to {
        return Err(FriendbookError::CannotBefriendSelf);
    }
    network.require_user(to)?;
    if network.is_blocked_between(actor, to) {
        return Err(FriendbookError::Blocked(to.to_string()));
    }
    if network.are_friends(actor, to) {
        return Err(FriendbookError::AlreadyFriends(to.to_string()));
    }
    if network.has_pending_request(actor, to) {
        return Err(FriendbookError::RequestPending(to.to_string()));
    }

    network.require_user_mut(to)?.add_friend_request(actor);
    network.notify(to, format!("{} sent you a friend request", actor));
    tracing::info!("{} sent a friend request to {}", actor, to);
    Ok(())
}

/// Accepts the pending request `from` sent to `actor`. A request in the other
/// direction, if any, is settled too.
pub fn accept_request(network: &mut Network, actor: &str, from: &str) -> Result<()> {
    network.require_user(from)?;
    if !network.has_pending_request(from, actor) {
        return Err(FriendbookError::NoPendingRequest(from.to_string()));
    }
    if !network.link_friends(actor, from) {
        return Err(FriendbookError::Blocked(from.to_string()));
    }

    network.require_user_mut(actor)?.remove_friend_request(from);
    network.require_user_mut(from)?.remove_friend_request(actor);
    network.notify(from, format!("{} accepted your friend request", actor));
    tracing::info!("{} accepted friend request from {}", actor, from);
    Ok(())
}

pub fn reject_request(network: &mut Network, actor: &str, from: &str) -> Result<()> {
    if !network.has_pending_request(from, actor) {
        return Err(FriendbookError::NoPendingRequest(from.to_string()));
    }
    network.require_user_mut(actor)?.remove_friend_request(from);
    if network.user(from).is_some() {
        network.notify(from, format!("{} rejected your friend request", actor));
    }
    tracing::info!("{} rejected friend request from {}", actor, from);
    Ok(())
}

pub fn remove_friend(network: &mut Network, actor: &str, other: &str) -> Result<()> {
    network.require_user(other)?;
    if !network.unlink_friends(actor, other) {
        return Err(FriendbookError::NotFriends(other.to_string()));
    }
    tracing::info!("{} removed {} from friends", actor, other);
    Ok(())
}

pub fn restrict(network: &mut Network, actor: &str, other: &str) -> Result<()> {
    network.require_user(other)?;
    let user = network.require_user_mut(actor)?;
    if !user.is_friend(other) {
        return Err(FriendbookError::NotFriends(other.to_string()));
    }
    user.restrict_friend(other);
    tracing::info!("{} restricted {}", actor, other);
    Ok(())
}

/// Returns whether `other` was restricted.
pub fn unrestrict(network: &mut Network, actor: &str, other: &str) -> Result<bool> {
    Ok(network.require_user_mut(actor)?.unrestrict_friend(other))
}

/// Blocks `other`. The friendship ends on both sides and pending requests in either
/// direction are dropped.
pub fn block(network: &mut Network, actor: &str, other: &str) -> Result<()> {
    if actor == other {
        return Err(FriendbookError::InvalidInput(
            "You cannot block yourself".to_string(),
        ));
    }
    network.require_user(other)?;

    network.require_user_mut(actor)?.block_user(other);
    let target = network.require_user_mut(other)?;
    target.remove_friend(actor);
    target.remove_friend_request(actor);
    tracing::info!("{} blocked {}", actor, other);
    Ok(())
}

/// Returns whether `other` was blocked.
pub fn unblock(network: &mut Network, actor: &str, other: &str) -> Result<bool> {
    let lifted = network.require_user_mut(actor)?.unblock_user(other);
    if lifted {
        tracing::info!("{} unblocked {}", actor, other);
    }
    Ok(lifted)
}

/// Usernames with a request waiting for `actor`, oldest first.
pub fn pending_requests(network: &Network, actor: &str) -> Result<Vec<String>> {
    Ok(network.require_user(actor)?.friend_requests().to_vec())
}

pub fn friends<'a>(network: &'a Network, actor: &str) -> Result<Vec<&'a User>> {
    Ok(network
        .require_user(actor)?
        .friends()
        .iter()
        .filter_map(|name| network.user(name))
        .collect())
}

/// Files a friend request from `actor` with up to `limit` bots, so each bot holds a
/// pending request from `actor`. Bots that are already friends, already hold one, or
/// are on either side of a block are skipped. Returns how many requests were filed.
pub fn bot_friend_requests(network: &mut Network, actor: &str, limit: usize) -> Result<usize> {
    if network.require_user(actor)?.is_bot() {
        return Ok(0);
    }

    let bots: Vec<String> = network
        .users()
        .iter()
        .filter(|b| b.is_bot() && b.username() != actor)
        .filter(|b| !b.is_friend(actor) && !b.has_friend_request(actor))
        .filter(|b| !network.is_blocked_between(actor, b.username()))
        .take(limit)
        .map(|b| b.username().to_string())
        .collect();

    for bot in &bots {
        network.require_user_mut(bot)?.add_friend_request(actor);
    }
    if !bots.is_empty() {
        tracing::info!("filed friend requests from {} with {} bots", actor, bots.len());
    }
    Ok(bots.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::register;

    fn network(names: &[&str]) -> Network {
        let mut net = Network::default();
        for name in names {
            register(&mut net, name, &format!("{}@x.com", name), "pw", "").unwrap();
        }
        net
    }

    #[test]
    fn request_then_accept_makes_friends_both_ways() {
        let mut net = network(&["alice", "bob"]);
        send_request(&mut net, "alice", "bob").unwrap();
        assert!(net.has_pending_request("alice", "bob"));
        assert_eq!(
            net.notifications().for_user("bob"),
            vec!["alice sent you a friend request"]
        );

        accept_request(&mut net, "bob", "alice").unwrap();
        assert!(net.are_friends("alice", "bob"));
        assert!(net.are_friends("bob", "alice"));
        assert!(!net.has_pending_request("alice", "bob"));
        assert_eq!(
            net.notifications().for_user("alice"),
            vec!["bob accepted your friend request"]
        );
    }

    #[test]
    fn accept_without_request_fails() {
        let mut net = network(&["alice", "bob"]);
        let err = accept_request(&mut net, "bob", "alice").unwrap_err();
        assert!(matches!(err, FriendbookError::NoPendingRequest(_)));
        assert!(!net.are_friends("alice", "bob"));
    }

    #[test]
    fn reject_clears_request() {
        let mut net = network(&["alice", "bob"]);
        send_request(&mut net, "alice", "bob").unwrap();
        reject_request(&mut net, "bob", "alice").unwrap();

        assert!(!net.are_friends("alice", "bob"));
        assert!(pending_requests(&net, "bob").unwrap().is_empty());
        assert!(reject_request(&mut net, "bob", "alice").is_err());
    }

    #[test]
    fn send_request_guards() {
        let mut net = network(&["alice", "bob"]);
        assert!(matches!(
            send_request(&mut net, "alice", "alice"),
            Err(FriendbookError::CannotBefriendSelf)
        ));
        assert!(matches!(
            send_request(&mut net, "alice", "zed"),
            Err(FriendbookError::UserNotFound(_))
        ));

        send_request(&mut net, "alice", "bob").unwrap();
        assert!(matches!(
            send_request(&mut net, "alice", "bob"),
            Err(FriendbookError::RequestPending(_))
        ));

        accept_request(&mut net, "bob", "alice").unwrap();
        assert!(matches!(
            send_request(&mut net, "alice", "bob"),
            Err(FriendbookError::AlreadyFriends(_))
        ));
    }

    #[test]
    fn block_severs_everything() {
        let mut net = network(&["alice", "bob"]);
        send_request(&mut net, "alice", "bob").unwrap();
        accept_request(&mut net, "bob", "alice").unwrap();

        block(&mut net, "bob", "alice").unwrap();
        assert!(!net.user("alice").unwrap().is_friend("bob"));
        assert!(!net.user("bob").unwrap().is_friend("alice"));
        assert!(net.user("bob").unwrap().is_blocked("alice"));

        assert!(matches!(
            send_request(&mut net, "alice", "bob"),
            Err(FriendbookError::Blocked(_))
        ));

        assert!(unblock(&mut net, "bob", "alice").unwrap());
        send_request(&mut net, "alice", "bob").unwrap();
    }

    #[test]
    fn restrict_requires_friendship() {
        let mut net = network(&["alice", "bob"]);
        assert!(matches!(
            restrict(&mut net, "alice", "bob"),
            Err(FriendbookError::NotFriends(_))
        ));

        send_request(&mut net, "alice", "bob").unwrap();
        accept_request(&mut net, "bob", "alice").unwrap();
        restrict(&mut net, "alice", "bob").unwrap();
        assert!(net.user("alice").unwrap().is_restricted_friend("bob"));

        remove_friend(&mut net, "alice", "bob").unwrap();
        assert!(!net.user("alice").unwrap().is_restricted_friend("bob"));
        assert!(matches!(
            remove_friend(&mut net, "alice", "bob"),
            Err(FriendbookError::NotFriends(_))
        ));
    }

    #[test]
    fn bots_hold_requests_from_people() {
        let mut net = network(&["alice", "bot1", "bot2", "bot3"]);
        for bot in ["bot1", "bot2", "bot3"] {
            net.user_mut(bot).unwrap().set_bot(true);
        }

        assert_eq!(bot_friend_requests(&mut net, "alice", 2).unwrap(), 2);
        assert_eq!(pending_requests(&net, "bot1").unwrap(), vec!["alice"]);
        assert_eq!(pending_requests(&net, "bot2").unwrap(), vec!["alice"]);
        assert!(pending_requests(&net, "bot3").unwrap().is_empty());
        assert!(pending_requests(&net, "alice").unwrap().is_empty());

        // bot1 and bot2 already hold one, so only bot3 is left
        assert_eq!(bot_friend_requests(&mut net, "alice", 5).unwrap(), 1);
        assert_eq!(bot_friend_requests(&mut net, "bot1", 5).unwrap(), 0);
        assert!(!net.has_pending_request("bot1", "bot2"));

        accept_request(&mut net, "bot1", "alice").unwrap();
        assert!(net.are_friends("alice", "bot1"));
        assert_eq!(bot_friend_requests(&mut net, "alice", 5).unwrap(), 0);
    }
}
