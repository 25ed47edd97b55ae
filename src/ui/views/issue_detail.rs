use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::jira::types::Issue;
use crate::rollup;
use crate::ui::renderfns::category_color;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Detail view for one issue. The full record is already in memory from the
/// search, so there is nothing to fetch.
pub struct IssueDetailView {
  issue: Issue,
}

impl IssueDetailView {
  pub fn new(issue: Issue) -> Self {
    Self { issue }
  }

  fn header_lines(&self) -> Vec<Line<'_>> {
    let issue = &self.issue;
    let status_style = match rollup::classify(issue) {
      Some(category) => Style::default().fg(category_color(category)),
      None => Style::default().fg(Color::DarkGray),
    };

    let field = |label: &'static str| Span::styled(label, Style::default().fg(Color::DarkGray));
    let person = |p: &Option<crate::jira::types::Assignee>| {
      p.as_ref().map(|a| a.name.clone()).unwrap_or_else(|| "Sin asignar".to_string())
    };
    let date = |d: &Option<chrono::DateTime<chrono::Utc>>| {
      d.map(|d| d.format("%Y-%m-%d %H:%M").to_string()).unwrap_or_else(|| "--".to_string())
    };

    vec![
      Line::from(vec![field("Summary:   "), Span::raw(&issue.summary)]),
      Line::from(vec![
        field("Status:    "),
        Span::styled(&issue.status, status_style),
        Span::styled(
          format!("  [{}]", issue.status_category),
          Style::default().fg(Color::DarkGray),
        ),
      ]),
      Line::from(vec![
        field("Assignee:  "),
        Span::raw(person(&issue.assignee)),
        field("   Reporter: "),
        Span::raw(person(&issue.reporter)),
      ]),
      Line::from(vec![
        field("Project:   "),
        Span::raw(&issue.project),
        field("   Priority: "),
        Span::raw(issue.priority.as_deref().unwrap_or("--")),
        field("   Points: "),
        Span::raw(
          issue
            .story_points
            .map(|p| p.to_string())
            .unwrap_or_else(|| "--".to_string()),
        ),
      ]),
      Line::from(vec![
        field("Created:   "),
        Span::raw(date(&issue.created)),
        field("   Updated: "),
        Span::raw(date(&issue.updated)),
        field("   Due: "),
        Span::raw(
          issue
            .duedate
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "--".to_string()),
        ),
      ]),
    ]
  }
}

impl View for IssueDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.issue.key))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(5), // Header fields
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Last comment
      ])
      .split(inner);

    frame.render_widget(Paragraph::new(self.header_lines()), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    let comment = self
      .issue
      .last_comment
      .as_deref()
      .unwrap_or("No comments yet");
    let comment_para = Paragraph::new(vec![
      Line::from(Span::styled(
        "Last comment:",
        Style::default().fg(Color::DarkGray),
      )),
      Line::from(Span::raw(comment)),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(comment_para, chunks[2]);
  }

  fn breadcrumb_label(&self) -> String {
    self.issue.key.clone()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new(":", "command"), Shortcut::new("q", "back")]
  }
}
