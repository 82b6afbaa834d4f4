//! Feed assembly over an injected record source.
//!
//! The visibility engine is pure; this seam owns the I/O shape around it.
//! The three reads are independent of each other and run concurrently, and
//! all must complete before visibility is computed.

use async_trait::async_trait;

use crate::activity::ActivityRecord;
use crate::error::CoreError;
use crate::membership::Membership;
use crate::types::DbId;
use crate::visibility::compute_visible_activity;

// ---------------------------------------------------------------------------
// Source seam
// ---------------------------------------------------------------------------

/// Default cap for the newest-first candidate query.
pub const DEFAULT_CANDIDATE_PAGE_SIZE: i64 = 200;

/// Read interface the surrounding persistence layer implements.
///
/// All three queries exclude soft-deleted rows.
#[async_trait]
pub trait ActivitySource {
    /// Records in projects the viewer owns or currently belongs to, plus
    /// records the viewer authored. Newest first, capped at `limit`.
    async fn candidate_records(
        &self,
        viewer_id: DbId,
        limit: i64,
    ) -> Result<Vec<ActivityRecord>, CoreError>;

    /// Membership events whose metadata is about the viewer, regardless of
    /// current membership (a removed member would otherwise never see their
    /// own removal), ascending by time.
    async fn membership_events(&self, viewer_id: DbId)
        -> Result<Vec<ActivityRecord>, CoreError>;

    /// The viewer's current membership rows.
    async fn current_memberships(&self, viewer_id: DbId) -> Result<Vec<Membership>, CoreError>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Computes per-viewer activity feeds from an [`ActivitySource`].
pub struct FeedService<S> {
    source: S,
    page_size: i64,
}

impl<S: ActivitySource> FeedService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: DEFAULT_CANDIDATE_PAGE_SIZE,
        }
    }

    /// Override the candidate page size.
    pub fn with_page_size(source: S, page_size: i64) -> Self {
        Self { source, page_size }
    }

    /// Fetch the candidate set and compute the viewer's visible feed.
    pub async fn visible_activity(
        &self,
        viewer_id: DbId,
    ) -> Result<Vec<ActivityRecord>, CoreError> {
        let (mut candidates, membership_events, memberships) = tokio::try_join!(
            self.source.candidate_records(viewer_id, self.page_size),
            self.source.membership_events(viewer_id),
            self.source.current_memberships(viewer_id),
        )?;
        candidates.extend(membership_events);

        let visible = compute_visible_activity(viewer_id, &memberships, &candidates);
        tracing::debug!(
            viewer_id,
            candidates = candidates.len(),
            visible = visible.len(),
            "computed activity feed"
        );
        Ok(visible)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
