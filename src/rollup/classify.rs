//! Workflow category classification.
//!
//! Maps each issue to at most one of the four board columns from its raw
//! status and status-category strings. Issues in a lifecycle phase the board
//! does not show (e.g. "Listo") fall outside every bucket.

use std::cmp::Ordering;

use crate::jira::types::Issue;

/// Coarse lifecycle phase meaning "to do"
pub const CATEGORY_TODO: &str = "Por hacer";
/// Coarse lifecycle phase meaning "in progress"
pub const CATEGORY_IN_PROGRESS: &str = "En curso";
/// Fine-grained status meaning "waiting for approval"
pub const STATUS_AWAITING_APPROVAL: &str = "Esperando aprobación";
/// The tracker reports the stopped status with inconsistent grammatical
/// gender depending on the issue type; both spellings mean the same state.
pub const DETAINED_STATUSES: &[&str] = &["Detenido", "Detenida"];

/// One of the four board columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
  Backlog,
  InProgress,
  AwaitingApproval,
  Detained,
}

impl Category {
  /// Board column order, left to right
  pub const ALL: [Category; 4] = [
    Category::Backlog,
    Category::InProgress,
    Category::AwaitingApproval,
    Category::Detained,
  ];

  /// Column title
  pub fn label(self) -> &'static str {
    match self {
      Category::Backlog => "Backlog",
      Category::InProgress => "En progreso",
      Category::AwaitingApproval => "Esperando aprobación",
      Category::Detained => "Detenido",
    }
  }
}

/// Classify an issue into its board column, if any.
///
/// The detained check runs first: a stopped issue stays in the Detained
/// column no matter which lifecycle phase the tracker reports for it.
pub fn classify(issue: &Issue) -> Option<Category> {
  if DETAINED_STATUSES.contains(&issue.status.as_str()) {
    return Some(Category::Detained);
  }
  match issue.status_category.as_str() {
    CATEGORY_IN_PROGRESS => {
      if issue.status == STATUS_AWAITING_APPROVAL {
        Some(Category::AwaitingApproval)
      } else {
        Some(Category::InProgress)
      }
    }
    CATEGORY_TODO => Some(Category::Backlog),
    _ => None,
  }
}

/// Ordering within a column: ascending by due date, issues without a due
/// date after every issue with one. Two absent dates compare equal; combined
/// with a stable sort this preserves input order, which is the documented
/// behavior rather than an accident.
pub fn due_date_order(a: &Issue, b: &Issue) -> Ordering {
  match (a.duedate, b.duedate) {
    (Some(a), Some(b)) => a.cmp(&b),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  }
}

/// Issues belonging to one column, sorted by due date
pub fn bucket<'a>(issues: &'a [Issue], category: Category) -> Vec<&'a Issue> {
  let mut matched: Vec<&Issue> = issues
    .iter()
    .filter(|issue| classify(issue) == Some(category))
    .collect();
  matched.sort_by(|a, b| due_date_order(a, b));
  matched
}

/// All four sorted columns derived from one issue set
#[derive(Debug, Default)]
pub struct Buckets<'a> {
  pub backlog: Vec<&'a Issue>,
  pub in_progress: Vec<&'a Issue>,
  pub awaiting_approval: Vec<&'a Issue>,
  pub detained: Vec<&'a Issue>,
}

impl<'a> Buckets<'a> {
  pub fn get(&self, category: Category) -> &[&'a Issue] {
    match category {
      Category::Backlog => &self.backlog,
      Category::InProgress => &self.in_progress,
      Category::AwaitingApproval => &self.awaiting_approval,
      Category::Detained => &self.detained,
    }
  }
}

/// Partition an issue set into the four columns in a single pass.
///
/// The buckets are pairwise disjoint and their union is a subset of the
/// input: an issue outside the four categories lands nowhere.
pub fn partition(issues: &[Issue]) -> Buckets<'_> {
  let mut buckets = Buckets::default();
  for issue in issues {
    match classify(issue) {
      Some(Category::Backlog) => buckets.backlog.push(issue),
      Some(Category::InProgress) => buckets.in_progress.push(issue),
      Some(Category::AwaitingApproval) => buckets.awaiting_approval.push(issue),
      Some(Category::Detained) => buckets.detained.push(issue),
      None => {}
    }
  }
  buckets.backlog.sort_by(|a, b| due_date_order(a, b));
  buckets.in_progress.sort_by(|a, b| due_date_order(a, b));
  buckets.awaiting_approval.sort_by(|a, b| due_date_order(a, b));
  buckets.detained.sort_by(|a, b| due_date_order(a, b));
  buckets
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;

  fn issue(id: &str, status: &str, category: &str, duedate: Option<&str>) -> Issue {
    Issue {
      id: id.to_string(),
      key: format!("PRJ-{}", id),
      status: status.to_string(),
      status_category: category.to_string(),
      duedate: duedate.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
      ..Issue::default()
    }
  }

  #[test]
  fn test_detained_wins_regardless_of_category() {
    for status in ["Detenido", "Detenida"] {
      for category in ["Por hacer", "En curso", "Listo", ""] {
        let i = issue("1", status, category, None);
        assert_eq!(classify(&i), Some(Category::Detained), "{status}/{category}");
      }
    }
  }

  #[test]
  fn test_awaiting_approval_requires_exact_status() {
    let waiting = issue("1", "Esperando aprobación", "En curso", None);
    assert_eq!(classify(&waiting), Some(Category::AwaitingApproval));

    // Any other non-detained status in the same phase is in progress
    let other = issue("2", "En revisión", "En curso", None);
    assert_eq!(classify(&other), Some(Category::InProgress));
  }

  #[test]
  fn test_backlog_and_excluded_statuses() {
    assert_eq!(
      classify(&issue("1", "Abierta", "Por hacer", None)),
      Some(Category::Backlog)
    );
    assert_eq!(classify(&issue("2", "Cerrada", "Listo", None)), None);
    assert_eq!(classify(&issue("3", "", "", None)), None);
  }

  #[test]
  fn test_partition_is_disjoint_and_complete() {
    let issues = vec![
      issue("1", "Abierta", "Por hacer", None),
      issue("2", "En desarrollo", "En curso", None),
      issue("3", "Esperando aprobación", "En curso", None),
      issue("4", "Detenida", "En curso", None),
      issue("5", "Cerrada", "Listo", None),
    ];

    let buckets = partition(&issues);
    let mut ids: Vec<&str> = Category::ALL
      .iter()
      .flat_map(|c| buckets.get(*c).iter().map(|i| i.id.as_str()))
      .collect();
    ids.sort_unstable();

    // Issue 5 is in no bucket; every other issue appears exactly once
    assert_eq!(ids, vec!["1", "2", "3", "4"]);
  }

  #[test]
  fn test_example_scenario_one_issue_per_bucket() {
    let issues = vec![
      issue("1", "Por hacer", "Por hacer", None),
      issue("2", "Esperando aprobación", "En curso", Some("2024-01-01")),
      issue("3", "Detenida", "En curso", Some("2024-01-02")),
    ];

    let buckets = partition(&issues);
    assert_eq!(buckets.backlog.len(), 1);
    assert_eq!(buckets.awaiting_approval.len(), 1);
    assert_eq!(buckets.detained.len(), 1);
    assert!(buckets.in_progress.is_empty());
  }

  #[test]
  fn test_sort_ascending_with_missing_dates_last() {
    let issues = vec![
      issue("1", "Abierta", "Por hacer", None),
      issue("2", "Abierta", "Por hacer", Some("2024-03-01")),
      issue("3", "Abierta", "Por hacer", Some("2024-01-15")),
      issue("4", "Abierta", "Por hacer", None),
    ];

    let sorted = bucket(&issues, Category::Backlog);
    let ids: Vec<&str> = sorted.iter().map(|i| i.id.as_str()).collect();
    // Dated issues ascending, undated after them in input order
    assert_eq!(ids, vec!["3", "2", "1", "4"]);
  }

  #[test]
  fn test_sort_is_stable_for_equal_dates() {
    let issues = vec![
      issue("1", "Abierta", "Por hacer", Some("2024-02-01")),
      issue("2", "Abierta", "Por hacer", Some("2024-02-01")),
      issue("3", "Abierta", "Por hacer", Some("2024-02-01")),
    ];

    let sorted = bucket(&issues, Category::Backlog);
    let ids: Vec<&str> = sorted.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
  }
}
