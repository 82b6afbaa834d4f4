//! Pure domain logic for the trackline activity feed.
//!
//! This crate holds the permission-scoped visibility engine for the
//! activity log: given a viewer, their current memberships, and a candidate
//! set of log records, it decides which records that viewer may see. It
//! lives in its own crate with zero internal deps so the API/repository
//! layer and any future CLI tooling can all reference it.
//!
//! The engine itself ([`visibility::compute_visible_activity`]) is a pure,
//! total function; the only async surface is the [`feed`] source seam that
//! fetches the candidate queries before the engine runs.

pub mod activity;
pub mod dismissal;
pub mod error;
pub mod feed;
pub mod membership;
pub mod types;
pub mod visibility;
