//! Serde-deserializable types matching the tracker's REST responses.
//!
//! These types are separate from domain types so deserialization stays total
//! (absent or malformed fields default instead of failing) while the domain
//! types stay focused on what the dashboard needs.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::types::{Assignee, Issue, Project, User};

// ============================================================================
// Common nested field types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiStatusCategory {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiStatus {
  #[serde(default)]
  pub name: String,
  #[serde(rename = "statusCategory")]
  pub status_category: Option<ApiStatusCategory>,
}

#[derive(Debug, Deserialize)]
pub struct ApiUser {
  #[serde(rename = "displayName", default)]
  pub display_name: String,
  #[serde(rename = "avatarUrls", default)]
  pub avatar_urls: HashMap<String, String>,
  #[serde(default = "default_active")]
  pub active: bool,
}

fn default_active() -> bool {
  true
}

#[derive(Debug, Deserialize)]
pub struct ApiPriority {
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiProjectRef {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiComment {
  pub body: Value,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiCommentContainer {
  #[serde(default)]
  pub comments: Vec<ApiComment>,
}

// ============================================================================
// Issue search endpoint
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiIssueFields {
  #[serde(default)]
  pub summary: String,
  pub status: Option<ApiStatus>,
  pub assignee: Option<ApiUser>,
  pub reporter: Option<ApiUser>,
  pub priority: Option<ApiPriority>,
  #[serde(default)]
  pub created: String,
  #[serde(default)]
  pub updated: String,
  pub duedate: Option<String>,
  pub project: Option<ApiProjectRef>,
  pub comment: Option<ApiCommentContainer>,
  // Catch-all for custom fields (story points live in one of these)
  #[serde(flatten)]
  pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub fields: ApiIssueFields,
}

#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
  #[serde(default)]
  pub issues: Vec<ApiIssue>,
  #[serde(rename = "startAt", default)]
  pub start_at: u64,
  #[serde(rename = "maxResults", default)]
  pub max_results: u64,
  #[serde(default)]
  pub total: u64,
}

impl ApiSearchResponse {
  /// Whether this page is the final one of the result set
  pub fn is_last(&self) -> bool {
    self.start_at + self.issues.len() as u64 >= self.total
  }
}

// ============================================================================
// Projects and users endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiProject {
  #[serde(default)]
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub name: String,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiIssue {
  /// Convert a wire issue into the domain snapshot. `points_field` names the
  /// custom field carrying the story-point estimate, when configured.
  pub fn into_issue(self, points_field: Option<&str>) -> Issue {
    let f = self.fields;
    let (status, status_category) = match f.status {
      Some(s) => (s.name, s.status_category.map(|c| c.name).unwrap_or_default()),
      None => (String::new(), String::new()),
    };
    let story_points = points_field
      .and_then(|field| f.extra.get(field))
      .and_then(Value::as_f64);
    let last_comment = f
      .comment
      .unwrap_or_default()
      .comments
      .into_iter()
      .last()
      .and_then(|comment| extract_text(&comment.body));

    Issue {
      id: if self.id.is_empty() { self.key.clone() } else { self.id },
      key: self.key,
      summary: f.summary,
      status,
      status_category,
      assignee: f.assignee.map(ApiUser::into_person),
      priority: f.priority.map(|p| p.name),
      created: parse_timestamp(&f.created),
      updated: parse_timestamp(&f.updated),
      duedate: f.duedate.as_deref().and_then(parse_due_date),
      story_points,
      project: f.project.map(|p| p.name).unwrap_or_default(),
      reporter: f.reporter.map(ApiUser::into_person),
      last_comment,
    }
  }
}

impl ApiUser {
  fn avatar(&self) -> Option<String> {
    self.avatar_urls.get("48x48").cloned()
  }

  pub fn into_person(self) -> Assignee {
    let avatar = self.avatar();
    Assignee {
      name: self.display_name,
      initials: String::new(),
      avatar,
    }
  }

  pub fn into_user(self) -> User {
    let avatar = self.avatar();
    User {
      name: self.display_name,
      avatar,
      active: self.active,
    }
  }
}

impl From<ApiProject> for Project {
  fn from(p: ApiProject) -> Self {
    Project {
      id: p.id,
      key: p.key,
      name: p.name,
    }
  }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
  if value.is_empty() {
    return None;
  }
  DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%z")
    .or_else(|_| DateTime::parse_from_rfc3339(value))
    .ok()
    .map(|dt| dt.with_timezone(&Utc))
}

fn parse_due_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Extract plain text from a comment body in either plain string (API v2)
/// or ADF document (API v3) form
fn extract_text(value: &Value) -> Option<String> {
  if let Some(s) = value.as_str() {
    return Some(s.to_string());
  }

  if let Some(content) = value.get("content").and_then(|v| v.as_array()) {
    let mut text = String::new();
    walk_adf(content, &mut text);
    let trimmed = text.trim_end();
    if !trimmed.is_empty() {
      return Some(trimmed.to_string());
    }
  }

  None
}

fn walk_adf(content: &[Value], output: &mut String) {
  for node in content {
    match node.get("type").and_then(|v| v.as_str()) {
      Some("text") => {
        if let Some(text) = node.get("text").and_then(|v| v.as_str()) {
          output.push_str(text);
        }
      }
      Some("hardBreak") => output.push('\n'),
      Some(node_type) => {
        if let Some(children) = node.get("content").and_then(|v| v.as_array()) {
          walk_adf(children, output);
        }
        if node_type == "paragraph" || node_type == "heading" {
          output.push('\n');
        }
      }
      None => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn sample_issue() -> ApiIssue {
    serde_json::from_value(json!({
      "id": "10001",
      "key": "PRJ-1",
      "fields": {
        "summary": "Migrar el panel",
        "status": {
          "name": "Esperando aprobación",
          "statusCategory": { "name": "En curso" }
        },
        "assignee": {
          "displayName": "Ana López",
          "avatarUrls": { "48x48": "https://tracker/avatar/ana.png" }
        },
        "priority": { "name": "Alta" },
        "created": "2024-01-05T10:30:00.000+0000",
        "updated": "2024-01-10T08:00:00.000+0000",
        "duedate": "2024-02-01",
        "project": { "name": "Panel" },
        "customfield_10016": 5.0,
        "comment": {
          "comments": [
            { "body": "primero" },
            { "body": "listo para revisar" }
          ]
        }
      }
    }))
    .expect("sample issue deserializes")
  }

  #[test]
  fn test_issue_conversion() {
    let issue = sample_issue().into_issue(Some("customfield_10016"));
    assert_eq!(issue.id, "10001");
    assert_eq!(issue.status, "Esperando aprobación");
    assert_eq!(issue.status_category, "En curso");
    assert_eq!(issue.assignee.as_ref().map(|a| a.name.as_str()), Some("Ana López"));
    assert_eq!(
      issue.assignee.and_then(|a| a.avatar),
      Some("https://tracker/avatar/ana.png".to_string())
    );
    assert_eq!(issue.priority.as_deref(), Some("Alta"));
    assert_eq!(issue.duedate, parse_due_date("2024-02-01"));
    assert!(issue.created.is_some());
    assert_eq!(issue.story_points, Some(5.0));
    assert_eq!(issue.project, "Panel");
    assert_eq!(issue.last_comment.as_deref(), Some("listo para revisar"));
  }

  #[test]
  fn test_missing_fields_default() {
    let issue: ApiIssue = serde_json::from_value(json!({ "key": "PRJ-2" })).unwrap();
    let issue = issue.into_issue(None);
    assert_eq!(issue.id, "PRJ-2");
    assert_eq!(issue.status, "");
    assert_eq!(issue.status_category, "");
    assert!(issue.assignee.is_none());
    assert!(issue.created.is_none());
    assert!(issue.story_points.is_none());
  }

  #[test]
  fn test_malformed_due_date_is_none() {
    let issue: ApiIssue = serde_json::from_value(json!({
      "key": "PRJ-3",
      "fields": { "duedate": "pronto" }
    }))
    .unwrap();
    assert!(issue.into_issue(None).duedate.is_none());
  }

  #[test]
  fn test_is_last_derivation() {
    let page: ApiSearchResponse = serde_json::from_value(json!({
      "issues": [{ "key": "PRJ-1" }, { "key": "PRJ-2" }],
      "startAt": 0,
      "maxResults": 2,
      "total": 3
    }))
    .unwrap();
    assert!(!page.is_last());

    let last: ApiSearchResponse = serde_json::from_value(json!({
      "issues": [{ "key": "PRJ-3" }],
      "startAt": 2,
      "maxResults": 2,
      "total": 3
    }))
    .unwrap();
    assert!(last.is_last());
  }

  #[test]
  fn test_adf_comment_extraction() {
    let body = json!({
      "type": "doc",
      "content": [
        {
          "type": "paragraph",
          "content": [
            { "type": "text", "text": "falta la" },
            { "type": "hardBreak" },
            { "type": "text", "text": "revisión" }
          ]
        }
      ]
    });
    assert_eq!(extract_text(&body).as_deref(), Some("falta la\nrevisión"));
  }
}
