use std::collections::{HashMap, VecDeque};

pub const DEFAULT_CAPACITY: usize = 50;

/// Per-user notification queues. Each queue is bounded; when full, the oldest
/// entry is dropped to make room.
#[derive(Debug, Clone)]
pub struct Notifications {
    capacity: usize,
    queues: HashMap<String, VecDeque<String>>,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl Notifications {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queues: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, username: &str, message: impl Into<String>) {
        let queue = self.queues.entry(username.to_string()).or_default();
        queue.push_back(message.into());
        while queue.len() > self.capacity {
            queue.pop_front();
        }
    }

    /// Oldest first.
    pub fn for_user(&self, username: &str) -> Vec<String> {
        self.queues
            .get(username)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear_user(&mut self, username: &str) {
        self.queues.remove(username);
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}
