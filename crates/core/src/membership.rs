//! Membership intervals reconstructed from join/leave event history.
//!
//! A viewer may join, leave, and rejoin the same project any number of
//! times. The activity feed needs that full span history, not just the
//! current membership snapshot, so spans are rebuilt per viewer from the
//! `MEMBER_ADDED`/`MEMBER_REMOVED` records addressed to them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::activity::{ActivityRecord, ActivityType};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A viewer's current membership row for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub project_id: DbId,
    pub joined_at: Timestamp,
}

/// A contiguous span during which a user was a member of a project.
///
/// `end == None` means the span is still open: the user is currently a
/// member. For a given (viewer, project) pair spans are ordered by `start`
/// and a current member always has exactly one open span, as the last
/// element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MembershipInterval {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl MembershipInterval {
    /// Returns `true` while the span has not been closed by a removal.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Returns `true` if `at` falls within this span, inclusive on both
    /// bounds. An open end is unbounded.
    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && self.end.map_or(true, |end| at <= end)
    }
}

/// Reconstructed spans per project for one viewer.
pub type IntervalsByProject = HashMap<DbId, Vec<MembershipInterval>>;

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

/// Rebuild the viewer's membership spans per project from the membership
/// events addressed to them, then reconcile against the current membership
/// rows.
///
/// The event walk is literal: `MEMBER_ADDED` opens a new span and
/// `MEMBER_REMOVED` closes the most recently opened still-open span. A
/// removal with nothing to close is a data anomaly and is ignored.
///
/// Reconciliation covers two legacy shapes:
/// - a current membership with no span at all (no historical `MEMBER_ADDED`
///   row, e.g. seed data) gets an open span starting at `joined_at`;
/// - a current membership whose spans are all closed (the log says removed
///   but the row still exists) gets a fresh open span appended, so the
///   viewer is not treated as a past-only member.
pub fn reconstruct_intervals(
    viewer_id: DbId,
    memberships: &[Membership],
    records: &[ActivityRecord],
) -> IntervalsByProject {
    let mut events: Vec<&ActivityRecord> = records
        .iter()
        .filter(|r| {
            r.activity_type.is_membership_event() && r.affected_user_id() == Some(viewer_id)
        })
        .collect();
    events.sort_by_key(|r| (r.created_at, r.id));

    let mut intervals = IntervalsByProject::new();
    for event in events {
        let spans = intervals.entry(event.project_id).or_default();
        match event.activity_type {
            ActivityType::MemberAdded => spans.push(MembershipInterval {
                start: event.created_at,
                end: None,
            }),
            ActivityType::MemberRemoved => {
                if let Some(open) = spans.iter_mut().rev().find(|s| s.is_open()) {
                    open.end = Some(event.created_at);
                }
            }
            _ => {}
        }
    }

    for membership in memberships {
        let spans = intervals.entry(membership.project_id).or_default();
        if !spans.iter().any(|s| s.is_open()) {
            spans.push(MembershipInterval {
                start: membership.joined_at,
                end: None,
            });
        }
    }

    intervals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
