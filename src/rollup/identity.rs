//! Entity identity helpers: deterministic avatar colors, derived initials,
//! and assignee-to-team resolution.
//!
//! The color derivation is shared by every call site (avatar badges, project
//! bars); saturation and lightness are caller configuration, only the hue
//! derivation is part of the contract.

use ratatui::style::Color;

use crate::roster::Team;

/// Fixed avatar palette for initials badges
pub const AVATAR_PALETTE: &[Color] = &[
  Color::Rgb(108, 74, 182),  // #6C4AB6
  Color::Rgb(60, 32, 82),    // #3C2052
  Color::Rgb(247, 184, 1),   // #F7B801
  Color::Rgb(241, 135, 1),   // #F18701
  Color::Rgb(243, 91, 4),    // #F35B04
  Color::Rgb(67, 188, 205),  // #43BCCD
  Color::Rgb(58, 110, 165),  // #3A6EA5
  Color::Rgb(255, 58, 85),   // #FF3A55
  Color::Rgb(250, 183, 68),  // #FAB744
  Color::Rgb(63, 62, 173),   // #3F3EAD
];

/// Hash a name with `hash * 31 + char_code` under 32-bit wraparound.
///
/// Case-sensitive: "Ana" and "ana" hash differently.
pub fn name_hash(name: &str) -> i32 {
  let mut hash: i32 = 0;
  for c in name.chars() {
    hash = (hash << 5).wrapping_sub(hash).wrapping_add(c as i32);
  }
  hash
}

/// Hue in degrees derived from the name hash
pub fn hue_for(name: &str) -> u16 {
  (name_hash(name).unsigned_abs() % 360) as u16
}

/// Deterministic HSL color for a name. Saturation and lightness are given
/// in percent.
pub fn color_for(name: &str, saturation: u8, lightness: u8) -> Color {
  let (r, g, b) = hsl_to_rgb(f64::from(hue_for(name)), f64::from(saturation), f64::from(lightness));
  Color::Rgb(r, g, b)
}

/// Deterministic pick from the fixed avatar palette
pub fn palette_color_for(name: &str) -> Color {
  AVATAR_PALETTE[name_hash(name).unsigned_abs() as usize % AVATAR_PALETTE.len()]
}

/// Derive initials from a display name: first letter of every
/// whitespace-separated token, uppercased.
pub fn initials_for(name: &str) -> String {
  name
    .split_whitespace()
    .filter_map(|token| token.chars().next())
    .flat_map(|c| c.to_uppercase())
    .collect()
}

/// Resolve an assignee name to a configured team.
///
/// Matching is case-insensitive and trims surrounding whitespace; teams are
/// checked in declared order and the first containing roster wins.
pub fn team_for<'a>(name: &str, teams: &'a [Team]) -> Option<&'a Team> {
  let normalized = name.trim().to_lowercase();
  teams
    .iter()
    .find(|team| team.members.iter().any(|member| member.trim().to_lowercase() == normalized))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
  let s = saturation / 100.0;
  let l = lightness / 100.0;

  let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
  let hp = (hue % 360.0) / 60.0;
  let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
  let m = l - c / 2.0;

  let (r, g, b) = match hp as u32 {
    0 => (c, x, 0.0),
    1 => (x, c, 0.0),
    2 => (0.0, c, x),
    3 => (0.0, x, c),
    4 => (x, 0.0, c),
    _ => (c, 0.0, x),
  };

  (
    ((r + m) * 255.0).round() as u8,
    ((g + m) * 255.0).round() as u8,
    ((b + m) * 255.0).round() as u8,
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::roster::TEAMS;

  #[test]
  fn test_name_hash_known_values() {
    assert_eq!(name_hash(""), 0);
    assert_eq!(name_hash("a"), 97);
    assert_eq!(name_hash("AB"), 2081);
  }

  #[test]
  fn test_hue_known_values() {
    assert_eq!(hue_for("Ana"), 92);
    assert_eq!(hue_for("ana"), 244);
    assert_eq!(hue_for("AB"), 281);
  }

  #[test]
  fn test_color_is_pure_and_case_sensitive() {
    assert_eq!(color_for("Ana", 70, 60), color_for("Ana", 70, 60));
    assert_ne!(hue_for("Ana"), hue_for("ana"));
  }

  #[test]
  fn test_palette_pick_is_stable() {
    let first = palette_color_for("maría pedraza");
    assert_eq!(palette_color_for("maría pedraza"), first);
    assert!(AVATAR_PALETTE.contains(&first));
  }

  #[test]
  fn test_initials_every_token() {
    assert_eq!(initials_for("maría pedraza"), "MP");
    assert_eq!(initials_for("Cristhian Camilo Ruiz Segura"), "CCRS");
    assert_eq!(initials_for("  solo  "), "S");
    assert_eq!(initials_for(""), "");
  }

  #[test]
  fn test_team_resolution_trims_and_ignores_case() {
    let padded = team_for(" Camilo Bastidas ", TEAMS);
    let lower = team_for("camilo bastidas", TEAMS);
    assert_eq!(padded.map(|t| t.id), Some("development"));
    assert_eq!(padded.map(|t| t.id), lower.map(|t| t.id));
  }

  #[test]
  fn test_team_resolution_misses() {
    assert!(team_for("nadie conocido", TEAMS).is_none());
    assert_eq!(team_for("JUAN MEDINA", TEAMS).map(|t| t.id), Some("operations"));
  }

  #[test]
  fn test_hsl_conversion_extremes() {
    assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), (255, 0, 0));
    assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), (0, 255, 0));
    assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), (0, 0, 255));
    // Zero saturation is a gray ramp
    assert_eq!(hsl_to_rgb(45.0, 0.0, 60.0), (153, 153, 153));
  }
}
