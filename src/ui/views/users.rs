use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::jira::client::JiraClient;
use crate::jira::filter::IssueFilter;
use crate::jira::types::Issue;
use crate::query::PagedQuery;
use crate::rollup::aggregate::{self, Rollup, RollupSource};
use crate::rollup::identity;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Per-person rollup summary over the accumulated issue set
pub struct UserSummaryView {
  query: PagedQuery<Issue>,
  rollups: Vec<Rollup>,
  list_state: ListState,
}

impl UserSummaryView {
  pub fn new(jira: JiraClient, filter: IssueFilter, page_size: u64) -> Self {
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
      rollups: Vec::new(),
      list_state: ListState::default(),
    }
  }

  fn title(&self) -> String {
    if self.query.is_loading() {
      format!(" Personas ({} of {} issues, loading...) ", self.query.items().len(), self.query.total())
    } else if let Some(error) = self.query.error() {
      format!(" Personas (error: {}) ", error)
    } else {
      format!(" Personas ({}) ", self.rollups.len())
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    ensure_valid_selection(&mut self.list_state, self.rollups.len());

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.rollups.is_empty() && !self.query.is_loading() {
      let content = if self.query.error().is_some() {
        "Failed to load issues. Press 'r' to retry."
      } else {
        "No assigned issues found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self.rollups.iter().map(rollup_row).collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  fn render_footer(&self, frame: &mut Frame, area: Rect) {
    let issues = self.query.items();
    let footer = format!(
      " {} personas · {} incidencias · {} pts",
      self.rollups.len(),
      issues.len(),
      aggregate::total_points(issues)
    );
    let paragraph = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
  }
}

/// One summary row: colored initials badge, name, per-column counts
fn rollup_row(rollup: &Rollup) -> ListItem<'_> {
  let badge_color = identity::palette_color_for(&rollup.name);
  let counts = rollup.counts;

  let line = Line::from(vec![
    Span::styled(
      format!(" {:^4} ", truncate(&rollup.initials, 4)),
      Style::default().fg(Color::White).bg(badge_color).bold(),
    ),
    Span::raw(" "),
    Span::raw(format!("{:<32}", truncate(&rollup.name, 32))),
    Span::styled(
      format!("{:>4} total ", counts.total),
      Style::default().fg(Color::White),
    ),
    Span::styled(
      format!("{:>3} backlog ", counts.backlog),
      Style::default().fg(Color::Blue),
    ),
    Span::styled(
      format!("{:>3} en curso ", counts.in_progress),
      Style::default().fg(Color::Yellow),
    ),
    Span::styled(
      format!("{:>3} aprobación ", counts.awaiting_approval),
      Style::default().fg(Color::Green),
    ),
    Span::styled(
      format!("{:>3} detenidas ", counts.detained),
      Style::default().fg(Color::Red),
    ),
    Span::styled(
      format!("{:>3} activas", counts.active()),
      Style::default().fg(Color::Magenta),
    ),
  ]);
  ListItem::new(line)
}

impl View for UserSummaryView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        // Narrow the dashboard to the selected person
        if let Some(rollup) = self.list_state.selected().and_then(|idx| self.rollups.get(idx)) {
          return ViewAction::SetAssignee(rollup.name.clone());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([Constraint::Min(0), Constraint::Length(1)])
      .split(area);

    self.render_list(frame, chunks[0]);
    self.render_footer(frame, chunks[1]);
  }

  fn breadcrumb_label(&self) -> String {
    "Personas".to_string()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      self.rollups = aggregate::assignee_rollups(RollupSource::Issues(self.query.items()));
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("Enter", "filter by person"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
