use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::jira::client::JiraClient;
use crate::jira::types::Project;
use crate::query::{Query, QueryState};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Pick list of projects; selecting one narrows the dashboard filter
pub struct ProjectsView {
  query: Query<Vec<Project>>,
  list_state: ListState,
}

impl ProjectsView {
  pub fn new(jira: JiraClient) -> Self {
    let mut query = Query::new(move || {
      let jira = jira.clone();
      async move { jira.list_projects().await.map_err(|e| e.to_string()) }
    });
    query.fetch();

    Self {
      query,
      list_state: ListState::default(),
    }
  }

  fn projects(&self) -> &[Project] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }
}

impl View for ProjectsView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(project) = self.list_state.selected().and_then(|idx| self.projects().get(idx)) {
          return ViewAction::SetProject(project.key.clone());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.projects().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => " Proyectos (loading...) ".to_string(),
      QueryState::Error(e) => format!(" Proyectos (error: {}) ", e),
      _ => format!(" Proyectos ({}) ", len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 && !self.query.is_loading() {
      let content = if self.query.error().is_some() {
        "Failed to load projects. Press 'r' to retry."
      } else {
        "No projects visible to this account."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .projects()
      .iter()
      .map(|project| {
        let line = Line::from(vec![
          Span::styled(
            format!("{:<12}", truncate(&project.key, 12)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(truncate(&project.name, 60)),
        ]);
        ListItem::new(line)
      })
      .collect();

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

  fn breadcrumb_label(&self) -> String {
    "Proyectos".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("Enter", "filter by project"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
