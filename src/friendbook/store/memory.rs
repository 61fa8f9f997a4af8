use super::DataStore;
use crate::error::Result;
use crate::model::{Conversations, Friendship, Post, User};

/// Keeps the last saved copy of each table in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: Vec<User>,
    friendships: Vec<Friendship>,
    posts: Vec<Post>,
    conversations: Conversations,
    saves: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many table writes this store has received.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl DataStore for InMemoryStore {
    fn load_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    fn load_friendships(&self) -> Result<Vec<Friendship>> {
        Ok(self.friendships.clone())
    }

    fn load_posts(&self) -> Result<Vec<Post>> {
        let mut posts = self.posts.clone();
        posts.sort_by_key(|p| p.id());
        Ok(posts)
    }

    fn load_conversations(&self) -> Result<Conversations> {
        Ok(self.conversations.clone())
    }

    fn save_users(&mut self, users: &[User]) -> Result<()> {
        self.users = users.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn save_friendships(&mut self, friendships: &[Friendship]) -> Result<()> {
        self.friendships = friendships.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn save_posts(&mut self, posts: &[Post]) -> Result<()> {
        self.posts = posts.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn save_conversations(&mut self, conversations: &Conversations) -> Result<()> {
        self.conversations = conversations.clone();
        self.saves += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::ids::PostId;
    use crate::model::Privacy;
    use chrono::Utc;

    /// Builds a pre-populated [`InMemoryStore`] the way the file store would hold it.
    #[derive(Default)]
    pub struct StoreFixture {
        users: Vec<User>,
        friendships: Vec<Friendship>,
        posts: Vec<Post>,
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a user with email `<name>@example.com` and password `pw`.
        pub fn with_user(mut self, username: &str) -> Self {
            self.users.push(User::new(
                username,
                format!("{}@example.com", username),
                "pw",
                "unspecified",
            ));
            self
        }

        pub fn with_friends(mut self, a: &str, b: &str) -> Self {
            self.friendships.push(Friendship::new(a, b));
            self
        }

        pub fn with_post(mut self, author: &str, content: &str, privacy: Privacy) -> Self {
            let id = PostId(self.posts.len() as u64);
            self.posts.push(Post::new(id, author, content, Utc::now(), privacy));
            self
        }

        pub fn build(self) -> InMemoryStore {
            InMemoryStore {
                users: self.users,
                friendships: self.friendships,
                posts: self.posts,
                conversations: Conversations::new(),
                saves: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::model::Privacy;

    #[test]
    fn fixture_tables_load_back() {
        let store = StoreFixture::new()
            .with_user("alice")
            .with_user("bob")
            .with_friends("bob", "alice")
            .with_post("alice", "hello", Privacy::Public)
            .build();

        let snapshot = store.load().unwrap();
        assert_eq!(snapshot.users.len(), 2);
        assert_eq!(snapshot.friendships, vec![Friendship::new("alice", "bob")]);
        assert_eq!(snapshot.posts[0].content(), "hello");
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn saves_replace_tables() {
        let mut store = InMemoryStore::new();
        store
            .save_users(&[User::new("a", "a@x.com", "pw", "")])
            .unwrap();
        store.save_users(&[]).unwrap();
        assert!(store.load_users().unwrap().is_empty());
        assert_eq!(store.save_count(), 2);
    }
}
