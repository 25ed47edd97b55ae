//! Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
  /// Whether the command accepts a trailing argument (e.g. a project key)
  pub takes_arg: bool,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "board",
    aliases: &["b", "kanban"],
    description: "Kanban board by workflow category",
    takes_arg: false,
  },
  Command {
    name: "users",
    aliases: &["u", "people"],
    description: "Per-person issue summary",
    takes_arg: false,
  },
  Command {
    name: "teams",
    aliases: &["t"],
    description: "Per-team issue summary",
    takes_arg: false,
  },
  Command {
    name: "timeline",
    aliases: &["tl", "gantt"],
    description: "Issue timeline by project",
    takes_arg: false,
  },
  Command {
    name: "projects",
    aliases: &["ps"],
    description: "Pick a project filter",
    takes_arg: false,
  },
  Command {
    name: "assignees",
    aliases: &["as"],
    description: "Pick an assignee filter",
    takes_arg: false,
  },
  Command {
    name: "project",
    aliases: &["p"],
    description: "Filter by project key",
    takes_arg: true,
  },
  Command {
    name: "assignee",
    aliases: &["a"],
    description: "Filter by assignee name",
    takes_arg: true,
  },
  Command {
    name: "team",
    aliases: &[],
    description: "Filter by team id",
    takes_arg: true,
  },
  Command {
    name: "status",
    aliases: &["s"],
    description: "Filter by workflow status",
    takes_arg: true,
  },
  Command {
    name: "clear",
    aliases: &["reset"],
    description: "Clear all filters",
    takes_arg: false,
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit tablero",
    takes_arg: false,
  },
];

/// A parsed command line: the command plus its optional argument
#[derive(Debug, Clone)]
pub struct Invocation {
  pub command: &'static Command,
  pub arg: Option<String>,
}

/// Parse a command line into a known command and its argument
pub fn parse(input: &str) -> Option<Invocation> {
  let trimmed = input.trim();
  let (name, arg) = match trimmed.split_once(' ') {
    Some((name, rest)) => (name, Some(rest.trim().to_string())),
    None => (trimmed, None),
  };

  let name = name.to_lowercase();
  let command = COMMANDS
    .iter()
    .find(|cmd| cmd.name == name || cmd.aliases.contains(&name.as_str()))?;

  Some(Invocation {
    command,
    arg: arg.filter(|a| !a.is_empty()),
  })
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  // Once an argument is being typed, only an exact command still matches
  if input.contains(' ') {
    let name = input.split_whitespace().next().unwrap_or("").to_lowercase();
    return COMMANDS
      .iter()
      .filter(|cmd| cmd.takes_arg && (cmd.name == name || cmd.aliases.contains(&name.as_str())))
      .collect();
  }

  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    // Exact match on name
    if cmd.name == input_lower {
      matches.push((cmd, 0)); // Highest priority
      continue;
    }

    // Exact match on alias
    if cmd.aliases.contains(&input_lower.as_str()) {
      matches.push((cmd, 1));
      continue;
    }

    // Prefix match on name
    if cmd.name.starts_with(&input_lower) {
      matches.push((cmd, 2));
      continue;
    }

    // Prefix match on alias
    if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      matches.push((cmd, 3));
      continue;
    }

    // Fuzzy match (contains)
    if cmd.name.contains(&input_lower) {
      matches.push((cmd, 4));
      continue;
    }

    // Fuzzy match on alias
    if cmd.aliases.iter().any(|a| a.contains(&input_lower)) {
      matches.push((cmd, 5));
    }
  }

  // Sort by priority
  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("board");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "board");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("b");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "board");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("tim");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "timeline");
  }

  #[test]
  fn test_argument_narrows_to_exact_command() {
    let suggestions = get_suggestions("project PR");
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].name, "project");
  }

  #[test]
  fn test_parse_with_argument() {
    let invocation = parse("assignee Ana López").expect("parses");
    assert_eq!(invocation.command.name, "assignee");
    assert_eq!(invocation.arg.as_deref(), Some("Ana López"));
  }

  #[test]
  fn test_parse_alias_without_argument() {
    let invocation = parse("q").expect("parses");
    assert_eq!(invocation.command.name, "quit");
    assert!(invocation.arg.is_none());
  }

  #[test]
  fn test_parse_unknown_command() {
    assert!(parse("sprint").is_none());
  }
}
