use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::jira::client::JiraClient;
use crate::jira::filter::IssueFilter;
use crate::jira::types::Issue;
use crate::query::PagedQuery;
use crate::rollup::{self, identity, Category};
use crate::ui::renderfns::{category_color, due_label, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::IssueDetailView;

/// Kanban board: the four workflow columns over the accumulated issue set
pub struct BoardView {
  query: PagedQuery<Issue>,
  selected_column: usize,
  selected_row: usize,
}

impl BoardView {
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

    // Start fetching immediately; remaining pages follow on their own
    query.fetch();

    Self {
      query,
      selected_column: 0,
      selected_row: 0,
    }
  }

  fn issues(&self) -> &[Issue] {
    self.query.items()
  }

  /// The issue under the cursor. Buckets are re-derived on demand: they
  /// borrow the accumulated set and are never stored.
  fn selected_issue(&self) -> Option<Issue> {
    let buckets = rollup::partition(self.issues());
    let column = buckets.get(Category::ALL[self.selected_column]);
    column.get(self.selected_row).map(|issue| (*issue).clone())
  }

  fn column_len(&self, column: usize) -> usize {
    let buckets = rollup::partition(self.issues());
    buckets.get(Category::ALL[column]).len()
  }

  fn navigate_row(&mut self, direction: i32) {
    let len = self.column_len(self.selected_column);
    if len == 0 {
      return;
    }
    if direction > 0 {
      self.selected_row = (self.selected_row + 1) % len;
    } else {
      self.selected_row = self.selected_row.checked_sub(1).unwrap_or(len - 1);
    }
  }

  fn navigate_column(&mut self, direction: i32) {
    let num_columns = Category::ALL.len();
    if direction > 0 {
      self.selected_column = (self.selected_column + 1) % num_columns;
    } else {
      self.selected_column = self
        .selected_column
        .checked_sub(1)
        .unwrap_or(num_columns - 1);
    }
    self.selected_row = 0;
  }

  fn progress_label(&self) -> String {
    if self.query.is_loading() {
      format!(" {} of {} issues (loading...) ", self.issues().len(), self.query.total())
    } else if let Some(error) = self.query.error() {
      format!(" error: {} ", error)
    } else {
      format!(" {} issues ", self.issues().len())
    }
  }

  fn render_column(&self, frame: &mut Frame, area: Rect, column_index: usize) {
    let category = Category::ALL[column_index];
    let buckets = rollup::partition(self.issues());
    let issues = buckets.get(category);
    let is_selected_column = column_index == self.selected_column;

    let border_color = if is_selected_column {
      Color::Yellow
    } else {
      category_color(category)
    };

    let title = format!(" {} ({}) ", truncate(category.label(), 16), issues.len());
    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color));

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = issues
      .iter()
      .map(|issue| {
        let initials = issue
          .assignee
          .as_ref()
          .map(|a| identity::initials_for(&a.name))
          .unwrap_or_default();
        let line = Line::from(vec![
          Span::styled(
            format!("{:<8}", truncate(&issue.key, 8)),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(
            format!("{:<6}", due_label(issue.duedate)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(truncate(&issue.summary, width.saturating_sub(18))),
          Span::styled(
            format!(" {}", initials),
            Style::default().fg(Color::DarkGray),
          ),
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

    if is_selected_column {
      let mut state = ListState::default();
      if !issues.is_empty() {
        state.select(Some(self.selected_row.min(issues.len() - 1)));
      }
      frame.render_stateful_widget(list, area, &mut state);
    } else {
      frame.render_widget(list, area);
    }
  }
}

impl View for BoardView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.navigate_row(1),
      KeyCode::Char('k') | KeyCode::Up => self.navigate_row(-1),
      KeyCode::Char('l') | KeyCode::Right => self.navigate_column(1),
      KeyCode::Char('h') | KeyCode::Left => self.navigate_column(-1),
      KeyCode::Char('r') => self.query.refetch(),
      KeyCode::Enter => {
        if let Some(issue) = self.selected_issue() {
          return ViewAction::Push(Box::new(IssueDetailView::new(issue)));
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
      .constraints([Constraint::Length(1), Constraint::Min(0)])
      .split(area);

    let progress = Paragraph::new(self.progress_label()).style(if self.query.error().is_some() {
      Style::default().fg(Color::Red)
    } else {
      Style::default().fg(Color::DarkGray)
    });
    frame.render_widget(progress, chunks[0]);

    let constraints: Vec<Constraint> = Category::ALL
      .iter()
      .map(|_| Constraint::Ratio(1, Category::ALL.len() as u32))
      .collect();
    let col_areas = Layout::horizontal(constraints).split(chunks[1]);

    for column_index in 0..Category::ALL.len() {
      self.render_column(frame, col_areas[column_index], column_index);
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Board".to_string()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      // The accumulated set changed; keep the cursor inside its column
      let len = self.column_len(self.selected_column);
      if len == 0 {
        self.selected_row = 0;
      } else {
        self.selected_row = self.selected_row.min(len - 1);
      }
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new(":", "command"),
      Shortcut::new("h/l", "column"),
      Shortcut::new("j/k", "issue"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "quit"),
    ]
  }
}
