//! Pure issue aggregation engine.
//!
//! A synchronous, stateless pipeline re-run over the full in-memory issue
//! set whenever a page arrives or a filter changes: classify each issue into
//! a board column, fold columns into per-entity rollups, and enrich entities
//! with deterministic colors, initials, and team membership. No I/O, no
//! shared state, no failure modes: unrecognized input degrades to "no
//! bucket" instead of an error.

pub mod aggregate;
pub mod classify;
pub mod identity;

pub use aggregate::{assignee_rollups, team_rollups, CategoryCounts, EntityStats, Rollup, RollupSource};
pub use classify::{classify, due_date_order, partition, Buckets, Category};
