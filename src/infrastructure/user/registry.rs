//! In-memory username registry implementation

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::domain::user::UsernameRegistry;

/// In-memory implementation of UsernameRegistry
///
/// Uniqueness only holds for the lifetime of the process and for callers
/// sharing the same instance. Clones share the underlying set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUsernameRegistry {
    usernames: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryUsernameRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with usernames that are already taken
    pub fn with_usernames<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let usernames: HashSet<String> = usernames.into_iter().map(Into::into).collect();

        Self {
            usernames: Arc::new(RwLock::new(usernames)),
        }
    }
}

// Poisoning is ignored: every critical section leaves the set consistent.
impl UsernameRegistry for InMemoryUsernameRegistry {
    fn reserve(&self, username: &str) -> bool {
        let mut usernames = self.usernames.write().unwrap_or_else(PoisonError::into_inner);
        let reserved = usernames.insert(username.to_string());

        if reserved {
            debug!(username = %username, "Reserved username");
        }

        reserved
    }

    fn contains(&self, username: &str) -> bool {
        let usernames = self.usernames.read().unwrap_or_else(PoisonError::into_inner);
        usernames.contains(username)
    }

    fn release(&self, username: &str) -> bool {
        let mut usernames = self.usernames.write().unwrap_or_else(PoisonError::into_inner);
        usernames.remove(username)
    }

    fn len(&self) -> usize {
        let usernames = self.usernames.read().unwrap_or_else(PoisonError::into_inner);
        usernames.len()
    }

    fn clear(&self) {
        let mut usernames = self.usernames.write().unwrap_or_else(PoisonError::into_inner);
        usernames.clear();
        debug!("Cleared username registry");
    }
}
