//! Activity-log record model.
//!
//! Records are append-only and immutable once written; the only later
//! mutation is the soft-delete flag set when the parent project is removed.
//! Wire names match the historical log rows (`MEMBER_ADDED` etc.) so old
//! data deserializes unchanged.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// The fixed set of activity-log event types.
///
/// `Unknown` absorbs unrecognized historical type strings so a feed fetch
/// never fails to deserialize; the visibility engine default-denies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    ProjectCreated,
    ProjectUpdated,
    ProjectRemoved,
    PaymentStateChanged,
    MemberAdded,
    MemberRemoved,
    TaskCreated,
    TaskUpdated,
    TaskRemoved,
    NoteCreated,
    NoteUpdated,
    NoteRemoved,
    PaymentCreated,
    PaymentUpdated,
    PaymentRemoved,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    /// Returns `true` for the two membership-churn events, the only types
    /// whose metadata names an affected user.
    pub fn is_membership_event(self) -> bool {
        matches!(self, ActivityType::MemberAdded | ActivityType::MemberRemoved)
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Structured payload attached to some record types.
///
/// Tagged per event category so the type system enforces which fields exist
/// for which event, instead of shape-checking a loose JSON object at read
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityMetadata {
    /// Which *other* user a membership event is about, as opposed to the
    /// actor who performed the action.
    Membership {
        affected_user_id: DbId,
        affected_user_name: String,
        event_timestamp: Timestamp,
    },
}

// ---------------------------------------------------------------------------
// Record entity
// ---------------------------------------------------------------------------

/// One immutable audit-log entry for a domain mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: DbId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub project_id: DbId,
    /// Denormalized project attributes, read at query time for
    /// authorization.
    pub project_owner_id: DbId,
    pub project_is_deleted: bool,
    pub actor_user_id: DbId,
    pub metadata: Option<ActivityMetadata>,
    /// Event timestamp; the only ordering the feed has.
    pub created_at: Timestamp,
    /// Set on cascade-delete of the parent project. Soft-deleted rows are
    /// excluded from every query.
    pub is_deleted: bool,
}

impl ActivityRecord {
    /// The user a membership event's metadata is about, if present.
    ///
    /// Missing or non-membership metadata yields `None`, which the
    /// metadata-dependent visibility rules treat as a non-match rather than
    /// an error.
    pub fn affected_user_id(&self) -> Option<DbId> {
        match &self.metadata {
            Some(ActivityMetadata::Membership {
                affected_user_id, ..
            }) => Some(*affected_user_id),
            None => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
