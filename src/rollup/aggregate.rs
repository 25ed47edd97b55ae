//! Per-entity rollups: fold an issue set (or backend-precomputed stats) into
//! counts per board column for each assignee or team.
//!
//! Rollups are ephemeral: recomputed from the full in-memory issue set on
//! every refresh, keyed only by entity name, never stored.

use std::collections::HashMap;

use crate::jira::types::Issue;
use crate::roster::Team;

use super::classify::{self, Category};
use super::identity;

/// Issue counts per board column for one entity.
///
/// `total` counts every issue attributed to the entity, including issues in
/// none of the four columns, so `total >= backlog + in_progress +
/// awaiting_approval + detained`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
  pub total: usize,
  pub backlog: usize,
  pub in_progress: usize,
  pub awaiting_approval: usize,
  pub detained: usize,
}

impl CategoryCounts {
  /// Active load: everything currently moving or blocked, i.e. not backlog
  pub fn active(&self) -> usize {
    self.in_progress + self.awaiting_approval + self.detained
  }
}

/// Aggregated summary for one entity (a person or a team)
#[derive(Debug, Clone, PartialEq)]
pub struct Rollup {
  pub name: String,
  pub avatar: Option<String>,
  pub initials: String,
  pub counts: CategoryCounts,
}

/// Pre-aggregated per-entity data from a backend that computes counts
/// server-side, keyed by raw status string.
#[derive(Debug, Clone, Default)]
pub struct EntityStats {
  pub name: String,
  pub initials: String,
  pub avatar: Option<String>,
  pub total: usize,
  pub by_status: HashMap<String, usize>,
}

/// The aggregator's two input modes, resolved once at the boundary. Both
/// produce structurally identical rollups so the view layer never knows
/// which source supplied the data.
#[derive(Debug, Clone, Copy)]
pub enum RollupSource<'a> {
  Issues(&'a [Issue]),
  Stats(&'a [EntityStats]),
}

/// Rollups per assignee, sorted by name (case-insensitive ascending).
///
/// Issues without an assignee name are skipped.
pub fn assignee_rollups(source: RollupSource<'_>) -> Vec<Rollup> {
  let mut rollups = match source {
    RollupSource::Issues(issues) => assignee_rollups_from_issues(issues),
    RollupSource::Stats(stats) => stats.iter().map(stats_rollup).collect(),
  };
  sort_by_name(&mut rollups);
  rollups
}

/// Rollups per configured team, sorted by name (case-insensitive ascending).
///
/// Assignees resolve to teams in declared roster order (first match wins);
/// issues whose assignee is on no roster are dropped. Every configured team
/// appears in the output, zero counts included.
pub fn team_rollups(source: RollupSource<'_>, teams: &[Team]) -> Vec<Rollup> {
  let mut rollups = match source {
    RollupSource::Issues(issues) => team_rollups_from_issues(issues, teams),
    RollupSource::Stats(stats) => team_rollups_from_stats(stats, teams),
  };
  sort_by_name(&mut rollups);
  rollups
}

/// Sum of story-point estimates over an issue set; absent or non-finite
/// estimates count as zero.
pub fn total_points(issues: &[Issue]) -> f64 {
  issues
    .iter()
    .filter_map(|issue| issue.story_points)
    .filter(|points| points.is_finite())
    .sum()
}

fn assignee_rollups_from_issues(issues: &[Issue]) -> Vec<Rollup> {
  // Grouping order is irrelevant; the sort at the end is the contract.
  let mut grouped: HashMap<&str, Vec<&Issue>> = HashMap::new();
  for issue in issues {
    if let Some(assignee) = &issue.assignee {
      if !assignee.name.is_empty() {
        grouped.entry(assignee.name.as_str()).or_default().push(issue);
      }
    }
  }

  grouped
    .into_values()
    .map(|group| {
      // Non-empty by construction; take identity fields from the first issue
      let assignee = group[0].assignee.as_ref().cloned().unwrap_or_default();
      Rollup {
        initials: effective_initials(&assignee.initials, &assignee.name),
        name: assignee.name,
        avatar: assignee.avatar,
        counts: count_issues(&group),
      }
    })
    .collect()
}

fn team_rollups_from_issues(issues: &[Issue], teams: &[Team]) -> Vec<Rollup> {
  let mut grouped: HashMap<&str, Vec<&Issue>> = HashMap::new();
  for issue in issues {
    let name = issue.assignee.as_ref().map(|a| a.name.as_str()).unwrap_or_default();
    if name.is_empty() {
      continue;
    }
    if let Some(team) = identity::team_for(name, teams) {
      grouped.entry(team.id).or_default().push(issue);
    }
  }

  teams
    .iter()
    .map(|team| {
      let group = grouped.get(team.id).map(Vec::as_slice).unwrap_or(&[]);
      Rollup {
        name: team.name.to_string(),
        avatar: None,
        initials: team.initials.to_string(),
        counts: count_issues(group),
      }
    })
    .collect()
}

fn team_rollups_from_stats(stats: &[EntityStats], teams: &[Team]) -> Vec<Rollup> {
  teams
    .iter()
    .map(|team| {
      let members: Vec<&EntityStats> = stats
        .iter()
        .filter(|stat| identity::team_for(&stat.name, teams).map(|t| t.id) == Some(team.id))
        .collect();

      let total = members.iter().map(|stat| stat.total).sum();
      let mut by_status: HashMap<&str, usize> = HashMap::new();
      for stat in &members {
        for (status, count) in &stat.by_status {
          *by_status.entry(status.as_str()).or_default() += count;
        }
      }

      Rollup {
        name: team.name.to_string(),
        avatar: None,
        initials: team.initials.to_string(),
        counts: status_counts(total, |status| by_status.get(status).copied().unwrap_or(0)),
      }
    })
    .collect()
}

fn stats_rollup(stats: &EntityStats) -> Rollup {
  Rollup {
    name: stats.name.clone(),
    avatar: stats.avatar.clone(),
    initials: effective_initials(&stats.initials, &stats.name),
    counts: status_counts(stats.total, |status| {
      stats.by_status.get(status).copied().unwrap_or(0)
    }),
  }
}

fn count_issues(issues: &[&Issue]) -> CategoryCounts {
  let mut counts = CategoryCounts {
    total: issues.len(),
    ..CategoryCounts::default()
  };
  for issue in issues {
    match classify::classify(issue) {
      Some(Category::Backlog) => counts.backlog += 1,
      Some(Category::InProgress) => counts.in_progress += 1,
      Some(Category::AwaitingApproval) => counts.awaiting_approval += 1,
      Some(Category::Detained) => counts.detained += 1,
      None => {}
    }
  }
  counts
}

/// Map raw status-string counts into column counts. Backlog and in-progress
/// arrive keyed by lifecycle phase, the finer states by exact status; both
/// detained spellings are folded together like the classifier does.
fn status_counts(total: usize, get: impl Fn(&str) -> usize) -> CategoryCounts {
  CategoryCounts {
    total,
    backlog: get(classify::CATEGORY_TODO),
    in_progress: get(classify::CATEGORY_IN_PROGRESS),
    awaiting_approval: get(classify::STATUS_AWAITING_APPROVAL),
    detained: classify::DETAINED_STATUSES.iter().map(|status| get(status)).sum(),
  }
}

fn effective_initials(explicit: &str, name: &str) -> String {
  if explicit.is_empty() {
    identity::initials_for(name)
  } else {
    explicit.to_string()
  }
}

fn sort_by_name(rollups: &mut [Rollup]) {
  rollups.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::jira::types::Assignee;
  use crate::roster::TEAMS;

  fn issue(assignee: Option<&str>, status: &str, category: &str) -> Issue {
    Issue {
      status: status.to_string(),
      status_category: category.to_string(),
      assignee: assignee.map(|name| Assignee {
        name: name.to_string(),
        ..Assignee::default()
      }),
      ..Issue::default()
    }
  }

  #[test]
  fn test_assignee_rollup_counts() {
    let issues = vec![
      issue(Some("Ana López"), "Abierta", "Por hacer"),
      issue(Some("Ana López"), "En desarrollo", "En curso"),
    ];

    let rollups = assignee_rollups(RollupSource::Issues(&issues));
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].name, "Ana López");
    assert_eq!(
      rollups[0].counts,
      CategoryCounts {
        total: 2,
        backlog: 1,
        in_progress: 1,
        awaiting_approval: 0,
        detained: 0,
      }
    );
  }

  #[test]
  fn test_total_counts_unbucketed_issues() {
    let issues = vec![
      issue(Some("Ana"), "Abierta", "Por hacer"),
      issue(Some("Ana"), "Cerrada", "Listo"),
      issue(Some("Ana"), "Detenido", "En curso"),
    ];

    let rollups = assignee_rollups(RollupSource::Issues(&issues));
    let counts = rollups[0].counts;
    assert_eq!(counts.total, 3);
    assert!(counts.total >= counts.backlog + counts.in_progress + counts.awaiting_approval + counts.detained);
    assert_eq!(counts.detained, 1);
    assert_eq!(counts.active(), 1);
  }

  #[test]
  fn test_unassigned_issues_are_skipped() {
    let issues = vec![
      issue(None, "Abierta", "Por hacer"),
      issue(Some(""), "Abierta", "Por hacer"),
      issue(Some("Beto"), "Abierta", "Por hacer"),
    ];

    let rollups = assignee_rollups(RollupSource::Issues(&issues));
    assert_eq!(rollups.len(), 1);
    assert_eq!(rollups[0].name, "Beto");
  }

  #[test]
  fn test_rollups_sorted_case_insensitive() {
    let issues = vec![
      issue(Some("carla"), "Abierta", "Por hacer"),
      issue(Some("Ana"), "Abierta", "Por hacer"),
      issue(Some("Beto"), "Abierta", "Por hacer"),
    ];

    let rollups = assignee_rollups(RollupSource::Issues(&issues));
    let names: Vec<&str> = rollups.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Beto", "carla"]);
  }

  #[test]
  fn test_initials_derived_when_missing() {
    let issues = vec![issue(Some("maría pedraza"), "Abierta", "Por hacer")];
    let rollups = assignee_rollups(RollupSource::Issues(&issues));
    assert_eq!(rollups[0].initials, "MP");
  }

  #[test]
  fn test_stats_input_normalizes_to_same_shape() {
    let stats = vec![EntityStats {
      name: "Ana López".to_string(),
      total: 5,
      by_status: HashMap::from([
        ("Por hacer".to_string(), 2),
        ("En curso".to_string(), 1),
        ("Esperando aprobación".to_string(), 1),
        ("Detenida".to_string(), 1),
      ]),
      ..EntityStats::default()
    }];

    let rollups = assignee_rollups(RollupSource::Stats(&stats));
    assert_eq!(
      rollups[0].counts,
      CategoryCounts {
        total: 5,
        backlog: 2,
        in_progress: 1,
        awaiting_approval: 1,
        detained: 1,
      }
    );
    assert_eq!(rollups[0].initials, "AL");
  }

  #[test]
  fn test_stats_fold_both_detained_spellings() {
    let stats = vec![EntityStats {
      name: "Beto".to_string(),
      total: 2,
      by_status: HashMap::from([
        ("Detenido".to_string(), 1),
        ("Detenida".to_string(), 1),
      ]),
      ..EntityStats::default()
    }];

    let rollups = assignee_rollups(RollupSource::Stats(&stats));
    assert_eq!(rollups[0].counts.detained, 2);
  }

  #[test]
  fn test_team_rollups_group_by_roster() {
    let issues = vec![
      issue(Some("camilo bastidas"), "Abierta", "Por hacer"),
      issue(Some(" JUAN MEDINA "), "En desarrollo", "En curso"),
      issue(Some("nadie conocido"), "Abierta", "Por hacer"),
    ];

    let rollups = team_rollups(RollupSource::Issues(&issues), TEAMS);
    let names: Vec<&str> = rollups.iter().map(|r| r.name.as_str()).collect();
    // Every configured team, sorted by display name
    assert_eq!(names, vec!["DESARROLLO", "DISEÑO", "OPERACIONES"]);

    let dev = &rollups[0];
    assert_eq!(dev.counts.total, 1);
    assert_eq!(dev.counts.backlog, 1);
    assert_eq!(dev.initials, "DEV");

    let design = &rollups[1];
    assert_eq!(design.counts.total, 0);

    let ops = &rollups[2];
    assert_eq!(ops.counts.total, 1);
    assert_eq!(ops.counts.in_progress, 1);
  }

  #[test]
  fn test_team_rollups_from_stats_merge_members() {
    let stats = vec![
      EntityStats {
        name: "camilo bastidas".to_string(),
        total: 3,
        by_status: HashMap::from([("Por hacer".to_string(), 2), ("En curso".to_string(), 1)]),
        ..EntityStats::default()
      },
      EntityStats {
        name: "Mario Eraso".to_string(),
        total: 2,
        by_status: HashMap::from([("Por hacer".to_string(), 1), ("Detenida".to_string(), 1)]),
        ..EntityStats::default()
      },
      EntityStats {
        name: "nadie conocido".to_string(),
        total: 9,
        by_status: HashMap::new(),
        ..EntityStats::default()
      },
    ];

    let rollups = team_rollups(RollupSource::Stats(&stats), TEAMS);
    let dev = rollups.iter().find(|r| r.name == "DESARROLLO").expect("dev team");
    assert_eq!(
      dev.counts,
      CategoryCounts {
        total: 5,
        backlog: 3,
        in_progress: 1,
        awaiting_approval: 0,
        detained: 1,
      }
    );
  }

  #[test]
  fn test_total_points_skips_missing_estimates() {
    let mut a = issue(Some("Ana"), "Abierta", "Por hacer");
    a.story_points = Some(3.0);
    let b = issue(Some("Ana"), "Abierta", "Por hacer");
    let mut c = issue(Some("Ana"), "Abierta", "Por hacer");
    c.story_points = Some(2.5);

    assert_eq!(total_points(&[a, b, c]), 5.5);
  }
}
