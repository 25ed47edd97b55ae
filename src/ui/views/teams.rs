use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::config::AvatarConfig;
use crate::jira::client::JiraClient;
use crate::jira::filter::IssueFilter;
use crate::jira::types::Issue;
use crate::query::PagedQuery;
use crate::rollup::aggregate::{self, Rollup, RollupSource};
use crate::rollup::identity;
use crate::roster;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Per-team rollup summary over the accumulated issue set
pub struct TeamSummaryView {
  query: PagedQuery<Issue>,
  avatars: AvatarConfig,
  rollups: Vec<Rollup>,
  list_state: ListState,
}

impl TeamSummaryView {
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
      rollups: Vec::new(),
      list_state: ListState::default(),
    }
  }

  fn title(&self) -> String {
    if self.query.is_loading() {
      format!(" Equipos ({} of {} issues, loading...) ", self.query.items().len(), self.query.total())
    } else if let Some(error) = self.query.error() {
      format!(" Equipos (error: {}) ", error)
    } else {
      format!(" Equipos ({}) ", self.rollups.len())
    }
  }

  fn rollup_row(&self, rollup: &Rollup) -> ListItem<'static> {
    let badge_color = identity::color_for(&rollup.name, self.avatars.saturation, self.avatars.lightness);
    let counts = rollup.counts;
    let label = roster::TEAMS
      .iter()
      .find(|team| team.name == rollup.name)
      .map(|team| team.label)
      .unwrap_or_default();

    let line = Line::from(vec![
      Span::styled(
        format!(" {:^4} ", rollup.initials),
        Style::default().fg(Color::White).bg(badge_color).bold(),
      ),
      Span::raw(" "),
      Span::raw(format!("{:<14}", truncate(&rollup.name, 14))),
      Span::styled(
        format!("{:<24}", truncate(label, 24)),
        Style::default().fg(Color::DarkGray),
      ),
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
        "No issues found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self.rollups.iter().map(|r| self.rollup_row(r)).collect();

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
      " {} equipos · {} incidencias · {} pts",
      self.rollups.len(),
      issues.len(),
      aggregate::total_points(issues)
    );
    let paragraph = Paragraph::new(footer).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
  }
}

impl View for TeamSummaryView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        // Narrow the dashboard to the selected team
        let team_id = self
          .list_state
          .selected()
          .and_then(|idx| self.rollups.get(idx))
          .and_then(|rollup| roster::TEAMS.iter().find(|team| team.name == rollup.name))
          .map(|team| team.id.to_string());
        if let Some(team_id) = team_id {
          return ViewAction::SetTeam(team_id);
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
    "Equipos".to_string()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      self.rollups = aggregate::team_rollups(RollupSource::Issues(self.query.items()), roster::TEAMS);
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("Enter", "filter by team"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
