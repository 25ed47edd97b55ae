use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::{info, warn};

use crate::commands;
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::jira::client::JiraClient;
use crate::jira::filter::IssueFilter;
use crate::roster;
use crate::ui::components::{draw_command_overlay, InputResult, TextInput};
use crate::ui::renderfns;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{
  AssigneesView, BoardView, ProjectsView, TeamSummaryView, TimelineView, UserSummaryView,
};

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  Command,
}

/// The root views reachable via commands; rebuilt whenever the filter changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
  Board,
  Users,
  Teams,
  Timeline,
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  views: Vec<Box<dyn View>>,
  root: RootKind,
  mode: Mode,
  /// Command line buffer (after pressing :)
  command: TextInput,
  selected_suggestion: usize,
  /// Filter state, owned here and passed into each view by value
  filter: IssueFilter,
  config: Config,
  jira: JiraClient,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config, filter: IssueFilter) -> Result<Self> {
    let jira = JiraClient::new(&config)?;

    let mut app = Self {
      views: Vec::new(),
      root: RootKind::Board,
      mode: Mode::Normal,
      command: TextInput::new(),
      selected_suggestion: 0,
      filter,
      config,
      jira,
      should_quit: false,
    };
    let root = app.make_root(RootKind::Board);
    app.views.push(root);

    Ok(app)
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250));

    // Main loop
    while !self.should_quit {
      terminal.draw(|frame| self.draw(frame))?;

      if let Some(event) = events.next().await {
        match event {
          Event::Key(key) => self.handle_key(key),
          Event::Tick => {
            if let Some(view) = self.views.last_mut() {
              view.tick();
            }
          }
        }
      }
    }

    // Cleanup terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
  }

  fn make_root(&self, kind: RootKind) -> Box<dyn View> {
    let jira = self.jira.clone();
    let filter = self.filter.clone();
    let page_size = self.config.page_size;
    match kind {
      RootKind::Board => Box::new(BoardView::new(jira, filter, page_size)),
      RootKind::Users => Box::new(UserSummaryView::new(jira, filter, page_size)),
      RootKind::Teams => Box::new(TeamSummaryView::new(jira, filter, page_size, self.config.avatars)),
      RootKind::Timeline => Box::new(TimelineView::new(jira, filter, page_size, self.config.avatars)),
    }
  }

  fn set_root(&mut self, kind: RootKind) {
    self.root = kind;
    let root = self.make_root(kind);
    self.views = vec![root];
  }

  /// Rebuild the current root after a filter change
  fn rebuild_root(&mut self) {
    self.set_root(self.root);
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_mode_key(key),
      Mode::Command => self.handle_command_mode_key(key),
    }
  }

  fn handle_normal_mode_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char(':') {
      self.mode = Mode::Command;
      self.command.clear();
      self.selected_suggestion = 0;
      return;
    }

    // Delegate everything else to the current view
    let action = match self.views.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::None,
    };
    self.apply_action(action);
  }

  fn handle_command_mode_key(&mut self, key: KeyEvent) {
    // Suggestion navigation is handled before the line editor
    match key.code {
      KeyCode::Tab | KeyCode::Down => {
        let suggestions = commands::get_suggestions(self.command.value());
        if !suggestions.is_empty() {
          self.selected_suggestion = (self.selected_suggestion + 1) % suggestions.len();
        }
        return;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let suggestions = commands::get_suggestions(self.command.value());
        if !suggestions.is_empty() {
          self.selected_suggestion = self
            .selected_suggestion
            .checked_sub(1)
            .unwrap_or(suggestions.len() - 1);
        }
        return;
      }
      _ => {}
    }

    match self.command.handle_key(key) {
      InputResult::Submitted(value) => {
        self.mode = Mode::Normal;
        self.execute_command(&value);
        self.command.clear();
        self.selected_suggestion = 0;
      }
      InputResult::Cancelled => {
        self.mode = Mode::Normal;
        self.command.clear();
        self.selected_suggestion = 0;
      }
      InputResult::Consumed => {
        // Reset selection on input change
        self.selected_suggestion = 0;
      }
      InputResult::NotHandled => {}
    }
  }

  fn execute_command(&mut self, value: &str) {
    // A highlighted suggestion wins while no argument is being typed
    let suggestions = commands::get_suggestions(value);
    let invocation = if !value.contains(' ')
      && !suggestions.is_empty()
      && self.selected_suggestion < suggestions.len()
    {
      Some(commands::Invocation {
        command: suggestions[self.selected_suggestion],
        arg: None,
      })
    } else {
      commands::parse(value)
    };

    let Some(invocation) = invocation else {
      warn!(input = value, "unknown command");
      return;
    };

    info!(command = invocation.command.name, "executing command");
    match invocation.command.name {
      "board" => self.set_root(RootKind::Board),
      "users" => self.set_root(RootKind::Users),
      "teams" => self.set_root(RootKind::Teams),
      "timeline" => self.set_root(RootKind::Timeline),
      "projects" => self.views.push(Box::new(ProjectsView::new(self.jira.clone()))),
      "assignees" => self.views.push(Box::new(AssigneesView::new(self.jira.clone()))),
      "project" => {
        self.filter.project = invocation.arg;
        self.rebuild_root();
      }
      "assignee" => {
        self.filter.assignee = invocation.arg;
        self.rebuild_root();
      }
      "team" => {
        match &invocation.arg {
          Some(id) if roster::team_by_id(id).is_none() => {
            warn!(team = id.as_str(), "unknown team id, filter unchanged");
            return;
          }
          _ => {}
        }
        self.filter.team_id = invocation.arg;
        self.rebuild_root();
      }
      "status" => {
        self.filter.status = invocation.arg;
        self.rebuild_root();
      }
      "clear" => {
        self.filter = IssueFilter::default();
        self.rebuild_root();
      }
      "quit" => self.should_quit = true,
      _ => {}
    }
  }

  fn apply_action(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.views.push(view),
      ViewAction::Pop => {
        if self.views.len() > 1 {
          self.views.pop();
        } else {
          self.should_quit = true;
        }
      }
      ViewAction::SetProject(key) => {
        self.filter.project = Some(key);
        self.rebuild_root();
      }
      ViewAction::SetAssignee(name) => {
        self.filter.assignee = Some(name);
        self.rebuild_root();
      }
      ViewAction::SetTeam(id) => {
        self.filter.team_id = Some(id);
        self.rebuild_root();
      }
    }
  }

  fn draw(&mut self, frame: &mut Frame) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Status bar
      ])
      .split(frame.area());

    let shortcuts = self
      .views
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default();
    let header_context = self
      .config
      .title
      .as_deref()
      .unwrap_or(&self.config.jira.url);
    renderfns::draw_header(
      frame,
      chunks[0],
      header_context,
      self.filter.project.as_deref(),
      &shortcuts,
    );

    if let Some(view) = self.views.last_mut() {
      view.render(frame, chunks[1]);
    }

    self.draw_status_bar(frame, chunks[2]);

    if self.mode == Mode::Command {
      let suggestions = commands::get_suggestions(self.command.value());
      draw_command_overlay(
        frame,
        chunks[1],
        self.command.value(),
        &suggestions,
        self.selected_suggestion,
      );
    }
  }

  fn draw_status_bar(&self, frame: &mut Frame, area: Rect) {
    let (content, style) = match self.mode {
      Mode::Normal => (
        format!(
          " {}  │  :command  Enter:select  q:back  Ctrl-C:quit",
          self.filter.describe()
        ),
        Style::default().fg(Color::DarkGray),
      ),
      Mode::Command => (
        format!(" :{}", self.command.value()),
        Style::default().fg(Color::Yellow),
      ),
    };

    let paragraph = ratatui::widgets::Paragraph::new(content).style(style);
    frame.render_widget(paragraph, area);
  }
}
