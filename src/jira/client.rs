use color_eyre::{eyre::eyre, Result};
use tracing::debug;

use crate::config::Config;
use crate::jira::api_types::{ApiProject, ApiSearchResponse, ApiUser};
use crate::jira::filter::IssueFilter;
use crate::jira::types::{Issue, Project, User};
use crate::query::Page;

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str =
  "summary,status,assignee,reporter,priority,created,updated,duedate,project,comment";

/// Tracker API client wrapper
#[derive(Clone)]
pub struct JiraClient {
  client: gouqi::r#async::Jira,
  points_field: Option<String>,
}

impl JiraClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_api_token()?;

    let credentials = if config.jira.auth_type.is_cloud(&config.jira.url) {
      gouqi::Credentials::Basic(config.jira.email.clone(), token)
    } else {
      gouqi::Credentials::Bearer(token)
    };

    let client = gouqi::r#async::Jira::new(&config.jira.url, credentials)
      .map_err(|e| eyre!("Failed to create Jira client: {}", e))?;

    Ok(Self {
      client,
      points_field: config.jira.points_field.clone(),
    })
  }

  /// Fetch one page of the filtered issue search. Pages are 1-based.
  pub async fn search_page(
    &self,
    filter: &IssueFilter,
    page: u64,
    page_size: u64,
  ) -> Result<Page<Issue>> {
    let jql = filter.jql();
    let start_at = page.saturating_sub(1) * page_size;

    let mut fields = SEARCH_FIELDS.to_string();
    if let Some(points_field) = &self.points_field {
      fields.push(',');
      fields.push_str(points_field);
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
      .append_pair("jql", &jql)
      .append_pair("startAt", &start_at.to_string())
      .append_pair("maxResults", &page_size.to_string())
      .append_pair("fields", &fields)
      .finish();
    let endpoint = format!("/search?{}", query);

    debug!(page, start_at, "fetching issue page");

    let response: ApiSearchResponse = self
      .client
      .get("api", &endpoint)
      .await
      .map_err(|e| eyre!("Failed to search issues: {}", e))?;

    let total = response.total;
    let is_last = response.is_last();
    let items: Vec<Issue> = response
      .issues
      .into_iter()
      .map(|issue| issue.into_issue(self.points_field.as_deref()))
      .collect();

    Ok(Page {
      items,
      total,
      is_last,
    })
  }

  /// List the projects visible to the authenticated account
  pub async fn list_projects(&self) -> Result<Vec<Project>> {
    let projects: Vec<ApiProject> = self
      .client
      .get("api", "/project")
      .await
      .map_err(|e| eyre!("Failed to list projects: {}", e))?;

    Ok(projects.into_iter().map(Project::from).collect())
  }

  /// List tracker users, accumulating every page
  pub async fn list_users(&self) -> Result<Vec<User>> {
    let mut all_users = Vec::new();
    let mut start_at = 0u64;
    let max_results = 50u64;

    loop {
      let endpoint = format!("/users/search?startAt={}&maxResults={}", start_at, max_results);

      let users: Vec<ApiUser> = self
        .client
        .get("api", &endpoint)
        .await
        .map_err(|e| eyre!("Failed to list users: {}", e))?;

      let page_len = users.len() as u64;
      all_users.extend(users.into_iter().map(ApiUser::into_user));

      if page_len < max_results {
        break;
      }
      start_at += max_results;
    }

    Ok(all_users)
  }
}
