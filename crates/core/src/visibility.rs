//! Per-viewer visibility decisions for activity-log records.
//!
//! The decision logic is an ordered list of pure rules evaluated
//! top-to-bottom per record; the first rule that matches decides, and a
//! record no rule claims is denied. After the per-record pass a per-project
//! override collapses noise for projects the viewer has lost (deleted
//! projects, departed memberships). Assembly dedupes by id, orders
//! newest-first, and caps the feed.

use std::collections::HashSet;

use crate::activity::{ActivityRecord, ActivityType};
use crate::membership::{
    reconstruct_intervals, IntervalsByProject, Membership, MembershipInterval,
};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of records in a computed feed.
pub const MAX_FEED_ENTRIES: usize = 50;

// ---------------------------------------------------------------------------
// Rule engine
// ---------------------------------------------------------------------------

/// Outcome of one visibility rule for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The rule claims the record: it is visible.
    Visible,
    /// The rule claims the record: it is hidden.
    Hidden,
    /// The rule does not apply; evaluation moves to the next rule.
    Pass,
}

/// Evaluation context shared by all rules for one viewer.
#[derive(Debug)]
pub struct RuleContext<'a> {
    pub viewer_id: DbId,
    pub intervals: &'a IntervalsByProject,
}

impl RuleContext<'_> {
    /// The viewer's open membership span for `project_id`, if any.
    fn open_interval(&self, project_id: DbId) -> Option<&MembershipInterval> {
        self.intervals
            .get(&project_id)?
            .iter()
            .rev()
            .find(|s| s.is_open())
    }
}

type RuleFn = fn(&RuleContext<'_>, &ActivityRecord) -> Decision;

/// The ordered rule list. The first non-[`Decision::Pass`] outcome wins; a
/// record that passes every rule is hidden.
pub const VISIBILITY_RULES: &[(&str, RuleFn)] = &[
    ("project_removed_notice", project_removed_notice),
    ("deleted_project", deleted_project),
    ("project_owner", project_owner),
    ("own_removal", own_removal),
    ("own_addition_current_stint", own_addition_current_stint),
    ("within_membership_span", within_membership_span),
];

/// A `PROJECT_REMOVED` record is a per-user deletion notice: visible only
/// to the user it is addressed to. On these rows `actor_user_id` names the
/// addressee, not whoever deleted the project, and one row exists per
/// affected user. This rule fully decides every `PROJECT_REMOVED` record,
/// so no later rule (including the owner rule) ever sees one.
fn project_removed_notice(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    if record.activity_type != ActivityType::ProjectRemoved {
        return Decision::Pass;
    }
    if record.actor_user_id == ctx.viewer_id {
        Decision::Visible
    } else {
        Decision::Hidden
    }
}

/// Anything else that happened in a deleted project is hidden.
fn deleted_project(_ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    if record.project_is_deleted {
        Decision::Hidden
    } else {
        Decision::Pass
    }
}

/// The project owner sees all remaining activity in their project,
/// including membership churn.
fn project_owner(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    if record.project_owner_id == ctx.viewer_id {
        Decision::Visible
    } else {
        Decision::Pass
    }
}

/// A user always sees their own removal from a project.
fn own_removal(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    if record.activity_type == ActivityType::MemberRemoved
        && record.affected_user_id() == Some(ctx.viewer_id)
    {
        Decision::Visible
    } else {
        Decision::Pass
    }
}

/// While the viewer is a current member, the only join notice they see is
/// the one that started the current stint; a `MEMBER_ADDED` from a prior,
/// now-closed stint is hidden. Without an open span the rule does not
/// apply, and the join notice falls through to the membership-span rule
/// (a departed member keeps their own join/leave history).
fn own_addition_current_stint(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    if record.activity_type != ActivityType::MemberAdded
        || record.affected_user_id() != Some(ctx.viewer_id)
    {
        return Decision::Pass;
    }
    match ctx.open_interval(record.project_id) {
        Some(open) if record.created_at >= open.start => Decision::Visible,
        Some(_) => Decision::Hidden,
        None => Decision::Pass,
    }
}

/// Everything else is visible only if it happened during one of the
/// viewer's membership spans for that project.
fn within_membership_span(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    let inside = ctx
        .intervals
        .get(&record.project_id)
        .map_or(false, |spans| spans.iter().any(|s| s.contains(record.created_at)));
    if inside {
        Decision::Visible
    } else {
        Decision::Pass
    }
}

/// Run the rule list for one record. Default-deny: a record no rule claims
/// (unknown types, strangers' projects) is hidden.
pub fn decide(ctx: &RuleContext<'_>, record: &ActivityRecord) -> Decision {
    for (_name, rule) in VISIBILITY_RULES {
        match rule(ctx, record) {
            Decision::Pass => continue,
            decided => return decided,
        }
    }
    Decision::Hidden
}

// ---------------------------------------------------------------------------
// Per-project overrides
// ---------------------------------------------------------------------------

/// Collapse a project's surviving records once the project is gone from the
/// viewer's perspective.
///
/// - A surviving deletion notice addressed to the viewer suppresses every
///   other record of that project.
/// - A viewer who was removed and holds no open span keeps only their own
///   join/leave records for that project, not its ongoing activity.
fn apply_project_overrides(
    ctx: &RuleContext<'_>,
    visible: Vec<ActivityRecord>,
) -> Vec<ActivityRecord> {
    let mut removal_notices: HashSet<DbId> = HashSet::new();
    let mut departures: HashSet<DbId> = HashSet::new();

    for record in &visible {
        match record.activity_type {
            ActivityType::ProjectRemoved if record.actor_user_id == ctx.viewer_id => {
                removal_notices.insert(record.project_id);
            }
            ActivityType::MemberRemoved
                if record.affected_user_id() == Some(ctx.viewer_id)
                    && ctx.open_interval(record.project_id).is_none() =>
            {
                departures.insert(record.project_id);
            }
            _ => {}
        }
    }

    visible
        .into_iter()
        .filter(|record| {
            if removal_notices.contains(&record.project_id) {
                return record.activity_type == ActivityType::ProjectRemoved
                    && record.actor_user_id == ctx.viewer_id;
            }
            if departures.contains(&record.project_id) {
                return record.activity_type.is_membership_event()
                    && record.affected_user_id() == Some(ctx.viewer_id);
            }
            true
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Engine entry point
// ---------------------------------------------------------------------------

/// Compute the ordered, deduplicated, capped activity feed for one viewer.
///
/// Pure and total: identical inputs produce identical, identically-ordered
/// output, and no input shape is an error. `candidates` may contain
/// duplicates (the same record can satisfy more than one fetch query); the
/// first occurrence of an id wins. Soft-deleted rows are dropped up front.
pub fn compute_visible_activity(
    viewer_id: DbId,
    memberships: &[Membership],
    candidates: &[ActivityRecord],
) -> Vec<ActivityRecord> {
    let mut seen: HashSet<DbId> = HashSet::new();
    let mut live: Vec<ActivityRecord> = Vec::with_capacity(candidates.len());
    for record in candidates {
        if !record.is_deleted && seen.insert(record.id) {
            live.push(record.clone());
        }
    }

    let intervals = reconstruct_intervals(viewer_id, memberships, &live);
    let ctx = RuleContext {
        viewer_id,
        intervals: &intervals,
    };

    let surviving: Vec<ActivityRecord> = live
        .into_iter()
        .filter(|record| decide(&ctx, record) == Decision::Visible)
        .collect();

    let mut feed = apply_project_overrides(&ctx, surviving);
    // Newest first; id breaks ties so the order is deterministic.
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    feed.truncate(MAX_FEED_ENTRIES);
    feed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
