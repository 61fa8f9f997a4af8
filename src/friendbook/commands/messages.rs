use super::non_blank;
use crate::error::{FriendbookError, Result};
use crate::model::Message;
use crate::network::Network;
use chrono::{DateTime, Utc};

pub fn send(
    network: &mut Network,
    actor: &str,
    to: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if actor == to {
        return Err(FriendbookError::InvalidInput(
            "You cannot message yourself".to_string(),
        ));
    }
    network.require_user(to)?;
    if network.is_blocked_between(actor, to) {
        return Err(FriendbookError::Blocked(to.to_string()));
    }
    non_blank(content, "Message")?;

    network
        .conversations_mut()
        .append(Message::new(actor, to, content, now));
    tracing::debug!("{} sent a message to {}", actor, to);
    Ok(())
}

/// The whole conversation between `actor` and `other`, oldest first.
pub fn with<'a>(network: &'a Network, actor: &str, other: &str) -> Result<&'a [Message]> {
    network.require_user(other)?;
    Ok(network.conversations().between(actor, other))
}

/// One entry per conversation partner with the latest message, most recent first.
pub fn conversations<'a>(network: &'a Network, actor: &str) -> Vec<(String, &'a Message)> {
    let mut threads: Vec<(String, &Message)> = network
        .conversations()
        .threads_of(actor)
        .map(|(_, last)| (last.counterpart(actor).to_string(), last))
        .collect();
    threads.sort_by(|a, b| b.1.sent_at.cmp(&a.1.sent_at));
    threads
}
