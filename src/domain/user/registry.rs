//! Username registry trait

#[cfg(test)]
use mockall::automock;

/// Tracks usernames already accepted by account creation
///
/// Implementations must make `reserve` an atomic check-and-insert.
#[cfg_attr(test, automock)]
pub trait UsernameRegistry: Send + Sync {
    /// Reserve a username; returns `false` if it was already taken
    fn reserve(&self, username: &str) -> bool;

    /// Check if a username has been reserved
    fn contains(&self, username: &str) -> bool;

    /// Release a reserved username; returns `true` if it was present
    fn release(&self, username: &str) -> bool;

    /// Number of reserved usernames
    fn len(&self) -> usize;

    /// Forget every reserved username
    fn clear(&self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
