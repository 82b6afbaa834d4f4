//! Client-side dismissed-notification tracking.
//!
//! The hidden set is owned by an injected store rather than read from
//! ambient browser storage, so the logic stays testable and the persistence
//! medium is the caller's choice. Every mutation is persisted immediately;
//! a tracker rebuilt from the same store sees the same hidden set.

use std::collections::HashSet;

use crate::activity::ActivityRecord;
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Persistence for the hidden-id set.
pub trait DismissalStore {
    fn load(&self) -> Result<HashSet<DbId>, CoreError>;
    fn save(&self, hidden: &HashSet<DbId>) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Tracks which feed entries the user has dismissed.
pub struct DismissalTracker<S> {
    store: S,
    hidden: HashSet<DbId>,
}

impl<S: DismissalStore> DismissalTracker<S> {
    /// Load the persisted hidden set.
    pub fn new(store: S) -> Result<Self, CoreError> {
        let hidden = store.load()?;
        Ok(Self { store, hidden })
    }

    pub fn is_dismissed(&self, id: DbId) -> bool {
        self.hidden.contains(&id)
    }

    /// Dismiss one entry and persist.
    pub fn dismiss(&mut self, id: DbId) -> Result<(), CoreError> {
        if self.hidden.insert(id) {
            self.store.save(&self.hidden)?;
        }
        Ok(())
    }

    /// Un-dismiss one entry and persist.
    pub fn restore(&mut self, id: DbId) -> Result<(), CoreError> {
        if self.hidden.remove(&id) {
            self.store.save(&self.hidden)?;
        }
        Ok(())
    }

    /// Dismiss every entry in `visible`: the records on screen at the
    /// moment of the action. Entries that appear later are unaffected.
    pub fn dismiss_all(&mut self, visible: &[ActivityRecord]) -> Result<(), CoreError> {
        let before = self.hidden.len();
        self.hidden.extend(visible.iter().map(|r| r.id));
        if self.hidden.len() != before {
            self.store.save(&self.hidden)?;
        }
        Ok(())
    }

    /// Drop dismissed entries from a computed feed.
    pub fn retain_visible(&self, feed: &mut Vec<ActivityRecord>) {
        feed.retain(|r| !self.hidden.contains(&r.id));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
