use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub jira: JiraConfig,
  pub default_project: Option<String>,
  /// Custom title for the header (defaults to the tracker domain if not set)
  pub title: Option<String>,
  /// Issues requested per search page
  #[serde(default = "default_page_size")]
  pub page_size: u64,
  #[serde(default)]
  pub avatars: AvatarConfig,
}

fn default_page_size() -> u64 {
  50
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
  /// Auto-detect based on URL: .atlassian.net = cloud, else on-premise
  #[default]
  Auto,
  /// Jira Cloud - uses Basic auth (email + API token as password)
  Cloud,
  /// Jira On-premise - uses Bearer auth (PAT)
  Onpremise,
}

impl AuthType {
  pub fn is_cloud(self, url: &str) -> bool {
    match self {
      AuthType::Cloud => true,
      AuthType::Onpremise => false,
      AuthType::Auto => url.contains(".atlassian.net"),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
  pub url: String,
  pub email: String,
  /// Custom field name carrying the story-point estimate
  /// (e.g., "customfield_10016")
  pub points_field: Option<String>,
  /// Authentication type: auto, cloud, or onpremise
  #[serde(default)]
  pub auth_type: AuthType,
}

/// Saturation/lightness constants for hash-derived colors; the hue always
/// comes from the name hash.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
  pub saturation: u8,
  pub lightness: u8,
}

impl Default for AvatarConfig {
  fn default() -> Self {
    Self {
      saturation: 70,
      lightness: 60,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./tablero.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/tablero/config.yaml
  /// 4. ~/.config/tablero/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/tablero/config.yaml\n\
                 See config.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("tablero.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("tablero").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Get the tracker API token from environment variables.
  ///
  /// Checks TABLERO_JIRA_TOKEN first, then JIRA_API_TOKEN as fallback.
  pub fn get_api_token() -> Result<String> {
    std::env::var("TABLERO_JIRA_TOKEN")
      .or_else(|_| std::env::var("JIRA_API_TOKEN"))
      .map_err(|_| {
        eyre!(
          "Tracker API token not found. Set TABLERO_JIRA_TOKEN or JIRA_API_TOKEN environment variable."
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimal_config_defaults() {
    let config: Config = serde_yaml::from_str(
      "jira:\n  url: https://example.atlassian.net\n  email: ana@example.com\n",
    )
    .unwrap();

    assert_eq!(config.page_size, 50);
    assert_eq!(config.avatars.saturation, 70);
    assert_eq!(config.avatars.lightness, 60);
    assert_eq!(config.jira.auth_type, AuthType::Auto);
    assert!(config.jira.points_field.is_none());
  }

  #[test]
  fn test_auth_type_detection() {
    assert!(AuthType::Auto.is_cloud("https://foo.atlassian.net"));
    assert!(!AuthType::Auto.is_cloud("https://jira.company.com"));
    assert!(AuthType::Cloud.is_cloud("https://jira.company.com"));
    assert!(!AuthType::Onpremise.is_cloud("https://foo.atlassian.net"));
  }
}
