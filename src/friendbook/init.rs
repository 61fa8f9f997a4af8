use crate::api::Friendbook;
use crate::error::{FriendbookError, Result};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "FRIENDBOOK_HOME";

/// Picks the data directory: an explicit path wins, then `$FRIENDBOOK_HOME`, then the
/// platform data directory.
pub fn resolve_data_dir(explicit: Option<&Path>, env_home: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(home) = env_home.filter(|h| !h.trim().is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "friendbook", "friendbook")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| FriendbookError::Store("Could not determine a data directory".to_string()))
}

/// Resolves the data directory and opens it.
pub fn initialize(explicit: Option<&Path>) -> Result<Friendbook<FileStore>> {
    let env_home = std::env::var(HOME_ENV).ok();
    let dir = resolve_data_dir(explicit, env_home.as_deref())?;
    tracing::debug!("using data directory {}", dir.display());
    Friendbook::open_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let dir = resolve_data_dir(Some(Path::new("/tmp/a")), Some("/tmp/b")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/a"));
    }

    #[test]
    fn env_home_is_next() {
        let dir = resolve_data_dir(None, Some("/tmp/b")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn blank_env_home_is_ignored() {
        if let Ok(dir) = resolve_data_dir(None, Some("  ")) {
            assert_ne!(dir, PathBuf::from("  "));
        }
    }

    #[test]
    fn initialize_opens_an_empty_dir() {
        let temp = tempfile::tempdir().unwrap();
        let api = initialize(Some(temp.path())).unwrap();
        assert!(api.user(crate::api::GREETER_BOT).is_some());
        assert!(temp.path().join("users.txt").exists());
    }
}
