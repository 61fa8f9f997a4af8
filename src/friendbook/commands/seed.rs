use crate::error::Result;
use crate::model::{Privacy, User};
use crate::network::Network;
use chrono::{DateTime, Utc};

pub const BOT_PASSWORD: &str = "bot123";

/// The bot that greets newcomers; it owns the welcome posts.
pub const GREETER_BOT: &str = "Bot_Alice";

/// Bots that only exist to send friend requests.
pub const REQUEST_BOTS: [&str; 4] = ["Bot_Bob", "Bot_Charlie", "Bot_David", "Bot_Eve"];

pub const WELCOME_POSTS: [&str; 5] = [
    "Welcome to our social network! 👋",
    "Hope you're having a great day! 🌟",
    "Feel free to connect with others! 🤝",
    "Share your thoughts and experiences! 💭",
    "Don't forget to check out new features! ✨",
];

/// (username, email, password, gender, first post)
const DEMO_USERS: [(&str, &str, &str, &str, &str); 3] = [
    ("john", "john@example.com", "password123", "male", "Hello world!"),
    ("jane", "jane@example.com", "password456", "female", "Having a great day!"),
    ("bob", "bob@example.com", "password789", "male", "Check out my new project!"),
];

const DEMO_FRIENDSHIPS: [(&str, &str); 2] = [("john", "jane"), ("jane", "bob")];

fn bot(username: &str, email: &str) -> User {
    let mut user = User::new(username, email, BOT_PASSWORD, "bot");
    user.set_bot(true);
    user.set_public(true);
    user
}

/// Adds the default bots that are missing. Returns how many were created.
pub fn bots(network: &mut Network, now: DateTime<Utc>) -> Result<usize> {
    let mut created = 0;

    if network.user(GREETER_BOT).is_none() {
        network.insert_user(bot(GREETER_BOT, "bot.alice@bot.com"))?;
        for content in WELCOME_POSTS {
            network.publish(GREETER_BOT, content, Privacy::Public, now)?;
        }
        created += 1;
    }

    for name in REQUEST_BOTS {
        if network.user(name).is_some() {
            continue;
        }
        network.insert_user(bot(name, &format!("{}@bot.com", name)))?;
        created += 1;
    }

    if created > 0 {
        tracing::info!("created {} default bots", created);
    }
    Ok(created)
}

/// Adds the demo people with their friendships and one post each, unless any of them
/// already exists. Returns how many were created.
pub fn demo_users(network: &mut Network, now: DateTime<Utc>) -> Result<usize> {
    let taken = DEMO_USERS.iter().any(|(name, email, ..)| {
        network.user(name).is_some() || network.user_by_email(email).is_some()
    });
    if taken {
        return Ok(0);
    }

    for (name, email, password, gender, _) in DEMO_USERS {
        network.insert_user(User::new(name, email, password, gender))?;
    }
    for (a, b) in DEMO_FRIENDSHIPS {
        network.link_friends(a, b);
    }
    for (name, _, _, _, content) in DEMO_USERS {
        network.publish(name, content, Privacy::Public, now)?;
    }
    tracing::info!("created {} demo users", DEMO_USERS.len());
    Ok(DEMO_USERS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth;

    #[test]
    fn bots_are_public_bots_with_welcome_posts() {
        let mut net = Network::default();
        assert_eq!(bots(&mut net, Utc::now()).unwrap(), 5);

        let greeter = net.user(GREETER_BOT).unwrap();
        assert!(greeter.is_bot());
        assert!(greeter.is_public());
        assert_eq!(greeter.posts().len(), WELCOME_POSTS.len());
        for name in REQUEST_BOTS {
            assert!(net.user(name).unwrap().is_bot());
        }
        assert!(auth::authenticate(&net, "bot.alice@bot.com", BOT_PASSWORD).is_ok());
    }

    #[test]
    fn seeding_twice_adds_nothing() {
        let mut net = Network::default();
        bots(&mut net, Utc::now()).unwrap();
        assert_eq!(bots(&mut net, Utc::now()).unwrap(), 0);
        assert_eq!(net.posts().len(), WELCOME_POSTS.len());
    }

    #[test]
    fn demo_users_come_with_friends_and_posts() {
        let mut net = Network::default();
        assert_eq!(demo_users(&mut net, Utc::now()).unwrap(), 3);
        assert!(net.are_friends("john", "jane"));
        assert!(net.are_friends("jane", "bob"));
        assert!(!net.are_friends("john", "bob"));
        assert_eq!(net.posts().len(), 3);
        assert_eq!(
            auth::authenticate(&net, "jane@example.com", "password456").unwrap(),
            "jane"
        );
        assert_eq!(demo_users(&mut net, Utc::now()).unwrap(), 0);
    }
}
