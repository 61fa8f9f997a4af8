use crate::error::{FriendbookError, Result};
use crate::model::Privacy;
use crate::notifications;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for friendbook, stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendbookConfig {
    /// How many notifications each user keeps before the oldest are dropped
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// How many bot accounts get a friend request from a person who logs in
    #[serde(default = "default_bot_request_limit")]
    pub bot_friend_request_limit: usize,

    /// Create the default bot accounts when the store holds no users
    #[serde(default = "default_true")]
    pub seed_bots: bool,

    /// Create the demo people (john, jane, bob) when the store holds no users
    #[serde(default)]
    pub seed_demo_users: bool,

    /// Privacy of posts created without an explicit level
    #[serde(default)]
    pub default_privacy: Privacy,
}

fn default_notification_capacity() -> usize {
    notifications::DEFAULT_CAPACITY
}

fn default_bot_request_limit() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl Default for FriendbookConfig {
    fn default() -> Self {
        Self {
            notification_capacity: default_notification_capacity(),
            bot_friend_request_limit: default_bot_request_limit(),
            seed_bots: true,
            seed_demo_users: false,
            default_privacy: Privacy::Public,
        }
    }
}

impl FriendbookConfig {
    /// A config that seeds nothing. Handy for tests and tools that want an empty network.
    pub fn empty() -> Self {
        Self {
            seed_bots: false,
            seed_demo_users: false,
            ..Self::default()
        }
    }

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| {
            FriendbookError::FileOperation {
                path: config_path.clone(),
                source,
            }
        })?;
        let config: FriendbookConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content).map_err(|source| FriendbookError::FileOperation {
            path: config_path,
            source,
        })?;
        Ok(())
    }
}
