use crate::record::IdentityKey;
use std::collections::HashSet;

/// In-memory set of identity keys seen during the current run
///
/// Keys are never evicted and never persisted; the store lives exactly as
/// long as the run that owns it.
#[derive(Debug, Default)]
pub struct DedupStore {
    seen: HashSet<IdentityKey>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `key` has not been inserted yet
    pub fn is_novel(&self, key: &IdentityKey) -> bool {
        !self.seen.contains(key)
    }

    /// Inserts `key`, ignoring whether it was already present
    pub fn insert(&mut self, key: IdentityKey) {
        self.seen.insert(key);
    }

    /// Inserts `key` if it is novel
    ///
    /// # Returns
    ///
    /// * `true` - The key was new and is now stored
    /// * `false` - The key was already present; the store is unchanged
    pub fn insert_if_novel(&mut self, key: IdentityKey) -> bool {
        self.seen.insert(key)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
