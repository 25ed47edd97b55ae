use chrono::NaiveDate;
use ratatui::prelude::Color;

use crate::rollup::Category;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Accent color for a board column
pub fn category_color(category: Category) -> Color {
  match category {
    Category::Backlog => Color::Rgb(63, 62, 173),          // indigo
    Category::InProgress => Color::Rgb(243, 176, 63),      // amber
    Category::AwaitingApproval => Color::Rgb(34, 197, 94), // green
    Category::Detained => Color::Rgb(239, 68, 68),         // red
  }
}

/// Short due-date label for issue rows
pub fn due_label(duedate: Option<NaiveDate>) -> String {
  match duedate {
    Some(date) => date.format("%m-%d").to_string(),
    None => "--".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hola", 10), "hola");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("tablero", 7), "tablero");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_truncate_counts_chars_not_bytes() {
    assert_eq!(truncate("aprobación", 10), "aprobación");
  }

  #[test]
  fn test_due_label() {
    let date = NaiveDate::parse_from_str("2024-02-01", "%Y-%m-%d").ok();
    assert_eq!(due_label(date), "02-01");
    assert_eq!(due_label(None), "--");
  }

  #[test]
  fn test_category_colors_are_distinct() {
    let colors: Vec<Color> = Category::ALL.iter().map(|c| category_color(*c)).collect();
    for (i, a) in colors.iter().enumerate() {
      for b in colors.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
  }
}
