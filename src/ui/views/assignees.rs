use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::jira::client::JiraClient;
use crate::jira::types::User;
use crate::query::{Query, QueryState};
use crate::rollup::identity;
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Pick list of tracker users; selecting one narrows the dashboard filter
pub struct AssigneesView {
  query: Query<Vec<User>>,
  list_state: ListState,
}

impl AssigneesView {
  pub fn new(jira: JiraClient) -> Self {
    let mut query = Query::new(move || {
      let jira = jira.clone();
      async move { jira.list_users().await.map_err(|e| e.to_string()) }
    });
    query.fetch();

    Self {
      query,
      list_state: ListState::default(),
    }
  }

  fn users(&self) -> &[User] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }
}

impl View for AssigneesView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(user) = self.list_state.selected().and_then(|idx| self.users().get(idx)) {
          return ViewAction::SetAssignee(user.name.clone());
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.users().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => " Asignados (loading...) ".to_string(),
      QueryState::Error(e) => format!(" Asignados (error: {}) ", e),
      _ => format!(" Asignados ({}) ", len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 && !self.query.is_loading() {
      let content = if self.query.error().is_some() {
        "Failed to load users. Press 'r' to retry."
      } else {
        "No users found."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .users()
      .iter()
      .map(|user| {
        let initials = identity::initials_for(&user.name);
        let name_style = if user.active {
          Style::default()
        } else {
          Style::default().fg(Color::DarkGray)
        };
        let line = Line::from(vec![
          Span::styled(
            format!(" {:^4} ", truncate(&initials, 4)),
            Style::default()
              .fg(Color::White)
              .bg(identity::palette_color_for(&user.name)),
          ),
          Span::raw(" "),
          Span::styled(truncate(&user.name, 48), name_style),
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
    "Asignados".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("Enter", "filter by assignee"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
