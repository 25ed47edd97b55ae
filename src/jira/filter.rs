//! Explicit filter state threaded through every fetch.
//!
//! Filters are plain values owned by the app and passed into each view and
//! query, never read from ambient context.

use crate::roster::{self, Team};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
  pub project: Option<String>,
  pub assignee: Option<String>,
  pub team_id: Option<String>,
  pub status: Option<String>,
}

impl IssueFilter {
  /// Assignees the search should request. An explicit assignee wins over a
  /// selected team, and a selected team over the full roster.
  pub fn assignees(&self) -> Vec<&str> {
    if let Some(assignee) = &self.assignee {
      return vec![assignee.as_str()];
    }
    if let Some(team) = self.team() {
      return team.members.to_vec();
    }
    roster::all_assignees()
  }

  /// The selected team, if the configured id is valid
  pub fn team(&self) -> Option<&'static Team> {
    self.team_id.as_deref().and_then(roster::team_by_id)
  }

  /// JQL clause for the issue search endpoint
  pub fn jql(&self) -> String {
    let mut clauses = Vec::new();
    if let Some(project) = &self.project {
      clauses.push(format!("project = {}", quote(project)));
    }
    let assignees: Vec<String> = self.assignees().iter().map(|name| quote(name)).collect();
    clauses.push(format!("assignee in ({})", assignees.join(", ")));
    if let Some(status) = &self.status {
      clauses.push(format!("status = {}", quote(status)));
    }
    format!("{} ORDER BY duedate ASC", clauses.join(" AND "))
  }

  /// One-line summary for the status bar
  pub fn describe(&self) -> String {
    let mut parts = Vec::new();
    if let Some(project) = &self.project {
      parts.push(format!("project={}", project));
    }
    if let Some(assignee) = &self.assignee {
      parts.push(format!("assignee={}", assignee));
    }
    if let Some(team) = self.team() {
      parts.push(format!("team={}", team.id));
    }
    if let Some(status) = &self.status {
      parts.push(format!("status={}", status));
    }
    if parts.is_empty() {
      "all rostered assignees".to_string()
    } else {
      parts.join("  ")
    }
  }
}

fn quote(value: &str) -> String {
  format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_explicit_assignee_wins_over_team() {
    let filter = IssueFilter {
      assignee: Some("Ana López".to_string()),
      team_id: Some("development".to_string()),
      ..IssueFilter::default()
    };
    assert_eq!(filter.assignees(), vec!["Ana López"]);
  }

  #[test]
  fn test_team_wins_over_roster() {
    let filter = IssueFilter {
      team_id: Some("design".to_string()),
      ..IssueFilter::default()
    };
    assert_eq!(filter.assignees().len(), 3);
    assert!(filter.assignees().contains(&"Emily Alzate Garcia"));
  }

  #[test]
  fn test_default_filter_requests_full_roster() {
    let filter = IssueFilter::default();
    assert_eq!(filter.assignees(), roster::all_assignees());
  }

  #[test]
  fn test_jql_quotes_and_joins() {
    let filter = IssueFilter {
      project: Some("PRJ".to_string()),
      assignee: Some("Ana \"La Jefa\" López".to_string()),
      status: Some("Detenida".to_string()),
      ..IssueFilter::default()
    };
    let jql = filter.jql();
    assert!(jql.starts_with("project = \"PRJ\" AND assignee in (\"Ana \\\"La Jefa\\\" López\")"));
    assert!(jql.contains("status = \"Detenida\""));
    assert!(jql.ends_with("ORDER BY duedate ASC"));
  }

  #[test]
  fn test_invalid_team_id_falls_back_to_roster() {
    let filter = IssueFilter {
      team_id: Some("quality".to_string()),
      ..IssueFilter::default()
    };
    assert!(filter.team().is_none());
    assert_eq!(filter.assignees(), roster::all_assignees());
  }
}
