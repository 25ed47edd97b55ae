use chrono::{DateTime, NaiveDate, Utc};

/// A person referenced by an issue (assignee or reporter)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignee {
  pub name: String,
  /// Explicit initials from the tracker; empty when not provided
  pub initials: String,
  pub avatar: Option<String>,
}

/// A work item snapshot as reported by the tracker.
///
/// Timestamps and the due date are `None` when absent or malformed; the
/// aggregation engine treats every field as optional rather than failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Issue {
  pub id: String,
  pub key: String,
  pub summary: String,
  pub status: String,
  pub status_category: String,
  pub assignee: Option<Assignee>,
  pub priority: Option<String>,
  pub created: Option<DateTime<Utc>>,
  pub updated: Option<DateTime<Utc>>,
  pub duedate: Option<NaiveDate>,
  pub story_points: Option<f64>,
  pub project: String,
  pub reporter: Option<Assignee>,
  pub last_comment: Option<String>,
}

/// Project summary from the projects-list endpoint
#[derive(Debug, Clone)]
pub struct Project {
  pub id: String,
  pub key: String,
  pub name: String,
}

/// Tracker user from the users-list endpoint
#[derive(Debug, Clone)]
pub struct User {
  pub name: String,
  pub avatar: Option<String>,
  pub active: bool,
}
