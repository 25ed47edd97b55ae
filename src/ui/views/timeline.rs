use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::config::AvatarConfig;
use crate::jira::client::JiraClient;
use crate::jira::filter::IssueFilter;
use crate::jira::types::Issue;
use crate::query::PagedQuery;
use crate::rollup::identity;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Gantt-like timeline: one bar per issue, colored by owning project
pub struct TimelineView {
  query: PagedQuery<Issue>,
  avatars: AvatarConfig,
  scroll: usize,
}

/// Drawing span for one issue: creation day through due day, or the day
/// after the last update when no due date is set
fn issue_span(issue: &Issue) -> Option<(NaiveDate, NaiveDate)> {
  let start = issue.created?.date_naive();
  let end = match issue.duedate {
    Some(due) => due,
    None => issue
      .updated
      .map(|updated| updated.date_naive())
      .unwrap_or(start)
      .checked_add_days(Days::new(1))?,
  };
  Some((start, end.max(start)))
}

impl TimelineView {
  pub fn new(jira: JiraClient, filter: IssueFilter, page_size: u64, avatars: AvatarConfig) -> Self {
    let mut query = PagedQuery::new(move |page| {
      let jira = jira.clone();
      let filter = filter.clone();
      async move {
        jira
          .search_page(&filter, page, page_size)
          .await
          .map_err(|e| e.to_string())
      }
    });
    query.fetch();

    Self {
      query,
      avatars,
      scroll: 0,
    }
  }

  /// Issues with a drawable span, grouped by project and ordered by start
  fn rows(&self) -> Vec<(&Issue, (NaiveDate, NaiveDate))> {
    let mut rows: Vec<(&Issue, (NaiveDate, NaiveDate))> = self
      .query
      .items()
      .iter()
      .filter_map(|issue| issue_span(issue).map(|span| (issue, span)))
      .collect();
    rows.sort_by(|a, b| a.0.project.cmp(&b.0.project).then(a.1 .0.cmp(&b.1 .0)));
    rows
  }

  fn title(&self) -> String {
    if self.query.is_loading() {
      format!(" Timeline ({} of {} issues, loading...) ", self.query.items().len(), self.query.total())
    } else if let Some(error) = self.query.error() {
      format!(" Timeline (error: {}) ", error)
    } else {
      format!(" Timeline ({} issues) ", self.rows().len())
    }
  }
}

const LABEL_WIDTH: u16 = 24;

impl View for TimelineView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        let max = self.rows().len().saturating_sub(1);
        self.scroll = (self.scroll + 1).min(max);
      }
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('r') => {
        self.scroll = 0;
        self.query.refetch();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = self.rows();
    if rows.is_empty() {
      let content = if self.query.is_loading() {
        "Loading issues..."
      } else if self.query.error().is_some() {
        "Failed to load issues. Press 'r' to retry."
      } else {
        "No datable issues to draw."
      };
      let paragraph = Paragraph::new(content).style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    // Scale the full date range onto the drawable width
    let min_start = rows.iter().map(|(_, span)| span.0).min().unwrap_or_default();
    let max_end = rows.iter().map(|(_, span)| span.1).max().unwrap_or_default();
    let total_days = (max_end - min_start).num_days().max(1);
    let bar_width = i64::from(inner.width.saturating_sub(LABEL_WIDTH)).max(1);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
      format!(
        "{:<label$}{}  →  {}",
        "",
        min_start.format("%Y-%m-%d"),
        max_end.format("%Y-%m-%d"),
        label = LABEL_WIDTH as usize,
      ),
      Style::default().fg(Color::DarkGray),
    )));

    for (issue, (start, end)) in rows.iter().skip(self.scroll) {
      let x0 = (*start - min_start).num_days() * bar_width / total_days;
      let x1 = ((*end - min_start).num_days() * bar_width / total_days).max(x0 + 1);
      let color =
        identity::color_for(&issue.project, self.avatars.saturation, self.avatars.lightness);

      lines.push(Line::from(vec![
        Span::styled(
          format!("{:<10}", truncate(&issue.key, 10)),
          Style::default().fg(Color::Cyan),
        ),
        Span::styled(
          format!("{:<width$}", truncate(&issue.project, 13), width = (LABEL_WIDTH - 10) as usize),
          Style::default().fg(color),
        ),
        Span::raw(" ".repeat(x0 as usize)),
        Span::styled("█".repeat((x1 - x0) as usize), Style::default().fg(color)),
      ]));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
  }

  fn breadcrumb_label(&self) -> String {
    "Timeline".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("j/k", "scroll"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{TimeZone, Utc};

  fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
  }

  fn issue(created: Option<&str>, updated: Option<&str>, duedate: Option<&str>) -> Issue {
    let parse_ts = |s: &str| {
      Utc
        .with_ymd_and_hms(
          s[0..4].parse().unwrap(),
          s[5..7].parse().unwrap(),
          s[8..10].parse().unwrap(),
          12,
          0,
          0,
        )
        .single()
    };
    Issue {
      created: created.and_then(parse_ts),
      updated: updated.and_then(parse_ts),
      duedate: duedate.map(date),
      ..Issue::default()
    }
  }

  #[test]
  fn test_span_uses_due_date_when_present() {
    let span = issue_span(&issue(Some("2024-01-05"), Some("2024-01-08"), Some("2024-02-01")));
    assert_eq!(span, Some((date("2024-01-05"), date("2024-02-01"))));
  }

  #[test]
  fn test_span_falls_back_to_day_after_update() {
    let span = issue_span(&issue(Some("2024-01-05"), Some("2024-01-08"), None));
    assert_eq!(span, Some((date("2024-01-05"), date("2024-01-09"))));
  }

  #[test]
  fn test_span_requires_creation_date() {
    assert_eq!(issue_span(&issue(None, Some("2024-01-08"), None)), None);
  }

  #[test]
  fn test_span_never_ends_before_it_starts() {
    let span = issue_span(&issue(Some("2024-03-01"), None, Some("2024-01-01")));
    assert_eq!(span, Some((date("2024-03-01"), date("2024-03-01"))));
  }
}
