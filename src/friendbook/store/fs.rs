use super::records::{
    attach_comments, comment_records, friendship_record, message_record, parse_comment,
    parse_friendship, parse_message, parse_post, post_record,
};
use super::DataStore;
use crate::error::{FriendbookError, Result};
use crate::model::{Conversations, Friendship, Post, User};
use std::fs;
use std::path::{Path, PathBuf};

pub const USERS_FILE: &str = "users.txt";
pub const FRIENDS_FILE: &str = "friends.txt";
pub const POSTS_FILE: &str = "posts.txt";
pub const COMMENTS_FILE: &str = "comments.txt";
pub const MESSAGES_FILE: &str = "messages.txt";

/// Stores each table as a text file under one data directory.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Reads every non-blank line of `file`. A missing file reads as empty.
    pub fn read_lines(&self, file: &str) -> Result<Vec<String>> {
        let path = self.path_of(file);
        if !path.exists() {
            tracing::debug!("{} does not exist yet, treating as empty", path.display());
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)
            .map_err(|source| FriendbookError::FileOperation { path: path.clone(), source })?;
        let lines: Vec<String> = content
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect();
        tracing::debug!("read {} lines from {}", lines.len(), path.display());
        Ok(lines)
    }

    /// Replaces `file` with `lines`. The content goes to a temp file first and is
    /// renamed over the target, so readers never see a half-written table.
    pub fn write_lines<I, L>(&self, file: &str, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|source| FriendbookError::FileOperation {
                path: self.root.clone(),
                source,
            })?;
        }

        let mut content = String::new();
        let mut count = 0usize;
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
            count += 1;
        }

        let target = self.path_of(file);
        let tmp = self.path_of(&format!(".{}.tmp", file));
        fs::write(&tmp, content)
            .map_err(|source| FriendbookError::FileOperation { path: tmp.clone(), source })?;
        fs::rename(&tmp, &target)
            .map_err(|source| FriendbookError::FileOperation { path: target.clone(), source })?;
        tracing::debug!("wrote {} lines to {}", count, target.display());
        Ok(())
    }

    /// Parses each line of `file`, skipping the ones `parse` rejects.
    fn parse_lines<T, F>(&self, file: &str, parse: F) -> Result<Vec<T>>
    where
        F: Fn(&str) -> std::result::Result<T, String>,
    {
        let mut parsed = Vec::new();
        for (idx, line) in self.read_lines(file)?.iter().enumerate() {
            match parse(line) {
                Ok(value) => parsed.push(value),
                Err(reason) => {
                    let err = FriendbookError::InvalidDataFormat {
                        file: file.to_string(),
                        line: idx + 1,
                        reason,
                    };
                    tracing::warn!("skipping record: {}", err);
                }
            }
        }
        Ok(parsed)
    }
}

impl DataStore for FileStore {
    fn load_users(&self) -> Result<Vec<User>> {
        self.parse_lines(USERS_FILE, |line| {
            User::deserialize(line).map_err(|e| match e {
                FriendbookError::InvalidDataFormat { reason, .. } => reason,
                other => other.to_string(),
            })
        })
    }

    fn load_friendships(&self) -> Result<Vec<Friendship>> {
        self.parse_lines(FRIENDS_FILE, parse_friendship)
    }

    fn load_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.parse_lines(POSTS_FILE, parse_post)?;
        posts.sort_by_key(|p| p.id());
        posts.dedup_by_key(|p| p.id());

        let rows = self.parse_lines(COMMENTS_FILE, parse_comment)?;
        for orphan in attach_comments(&mut posts, rows) {
            tracing::warn!(
                "skipping comment {} on post {}: no matching post or parent",
                orphan.id,
                orphan.post_id
            );
        }
        Ok(posts)
    }

    fn load_conversations(&self) -> Result<Conversations> {
        Ok(self
            .parse_lines(MESSAGES_FILE, parse_message)?
            .into_iter()
            .collect())
    }

    fn save_users(&mut self, users: &[User]) -> Result<()> {
        self.write_lines(USERS_FILE, users.iter().map(User::serialize))
    }

    fn save_friendships(&mut self, friendships: &[Friendship]) -> Result<()> {
        self.write_lines(FRIENDS_FILE, friendships.iter().map(friendship_record))
    }

    fn save_posts(&mut self, posts: &[Post]) -> Result<()> {
        self.write_lines(POSTS_FILE, posts.iter().map(post_record))?;
        self.write_lines(COMMENTS_FILE, comment_records(posts))
    }

    fn save_conversations(&mut self, conversations: &Conversations) -> Result<()> {
        self.write_lines(MESSAGES_FILE, conversations.messages().map(message_record))
    }
}
