//! Static team roster.
//!
//! Team membership is deployment configuration, not tracker data: the board
//! groups people into teams the tracker itself knows nothing about. Changing
//! a roster means shipping a new build.

/// A configured team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
  pub id: &'static str,
  /// Display name used in summaries
  pub name: &'static str,
  /// Long-form label for pickers and headers
  pub label: &'static str,
  pub initials: &'static str,
  /// Member display names as they appear in the tracker
  pub members: &'static [&'static str],
}

pub const TEAM_DEVELOPMENT_MEMBERS: &[&str] = &[
  "camilo bastidas",
  "mario eraso",
  "kevin aguilera",
  "richard medina",
  "isabel Gomez",
  "maría alejandra pedraza cárdenas",
  "david sarmiento",
];

pub const TEAM_DESIGN_MEMBERS: &[&str] = &[
  "Cristhian Camilo Ruiz Segura",
  "Emily Alzate Garcia",
  "Francisco  Aguirre Tovar",
];

pub const TEAM_OPERATIONS_MEMBERS: &[&str] = &[
  "Richard Enrique Torres Pinzón",
  "Miller Ladino Osorio",
  "Juan Medina",
  "Evelyn Herreño",
  "Jefferson Alvarado Martinez",
  "Michelle Carolina Castro Muñoz",
  "David Alberto Espitia Quiceno",
];

/// All teams, in resolution order: when a name appears in more than one
/// roster the first team here wins.
pub const TEAMS: &[Team] = &[
  Team {
    id: "development",
    name: "DESARROLLO",
    label: "Equipo de Desarrollo",
    initials: "DEV",
    members: TEAM_DEVELOPMENT_MEMBERS,
  },
  Team {
    id: "operations",
    name: "OPERACIONES",
    label: "Equipo de Operaciones",
    initials: "OPS",
    members: TEAM_OPERATIONS_MEMBERS,
  },
  Team {
    id: "design",
    name: "DISEÑO",
    label: "Equipo de Diseño",
    initials: "DES",
    members: TEAM_DESIGN_MEMBERS,
  },
];

/// Every rostered member name, sorted
pub fn all_assignees() -> Vec<&'static str> {
  let mut names: Vec<&'static str> = TEAMS.iter().flat_map(|t| t.members.iter().copied()).collect();
  names.sort_unstable();
  names
}

/// Look up a team by its id
pub fn team_by_id(id: &str) -> Option<&'static Team> {
  TEAMS.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_all_assignees_covers_every_roster() {
    let all = all_assignees();
    let expected: usize = TEAMS.iter().map(|t| t.members.len()).sum();
    assert_eq!(all.len(), expected);
    assert!(all.windows(2).all(|w| w[0] <= w[1]));
  }

  #[test]
  fn test_team_by_id() {
    assert_eq!(team_by_id("development").map(|t| t.name), Some("DESARROLLO"));
    assert_eq!(team_by_id("quality"), None);
  }

  #[test]
  fn test_rosters_are_disjoint() {
    // Not enforced by the resolver (first match wins), but the intended
    // configuration keeps memberships disjoint.
    let all = all_assignees();
    let mut lowered: Vec<String> = all.iter().map(|n| n.trim().to_lowercase()).collect();
    lowered.sort_unstable();
    lowered.dedup();
    assert_eq!(lowered.len(), all.len());
  }
}
