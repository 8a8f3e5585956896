//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL used for absolute links (no trailing slash)
    pub url: String,

    // Directory
    pub content_dir: String,
    pub templates_dir: String,
    pub output_dir: String,
    /// Author profiles, relative to `content_dir`
    pub authors_dir: String,
    /// Static files copied verbatim, relative to `content_dir`
    pub assets_dir: String,

    // Content
    pub frontmatter: FrontmatterFormat,
    pub on_error: ErrorPolicy,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),

            content_dir: "content".to_string(),
            templates_dir: "templates".to_string(),
            output_dir: "public".to_string(),
            authors_dir: "authors".to_string(),
            assets_dir: "assets".to_string(),

            frontmatter: FrontmatterFormat::default(),
            on_error: ErrorPolicy::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.normalize();
        Ok(config)
    }

    /// Apply environment / command line overrides on top of the file values
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.url {
            self.url = url.clone();
        }
        if let Some(dir) = &overrides.content_dir {
            self.content_dir = dir.clone();
        }
        if let Some(dir) = &overrides.templates_dir {
            self.templates_dir = dir.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output_dir = dir.clone();
        }
        if let Some(format) = overrides.frontmatter {
            self.frontmatter = format;
        }
        if let Some(policy) = overrides.on_error {
            self.on_error = policy;
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let trimmed = self.url.trim_end_matches('/').len();
        self.url.truncate(trimmed);
    }
}

/// Values that take precedence over `_config.yml`
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub url: Option<String>,
    pub content_dir: Option<String>,
    pub templates_dir: Option<String>,
    pub output_dir: Option<String>,
    pub frontmatter: Option<FrontmatterFormat>,
    pub on_error: Option<ErrorPolicy>,
}

/// How the metadata block between the `---` delimiters is decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontmatterFormat {
    /// Structured YAML, may yield nested and typed values
    #[default]
    Yaml,
    /// One `key: value` pair per line, values are always strings
    Simple,
}

impl std::str::FromStr for FrontmatterFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "yaml" => Ok(Self::Yaml),
            "simple" => Ok(Self::Simple),
            other => Err(format!(
                "unknown frontmatter format '{}' (expected yaml or simple)",
                other
            )),
        }
    }
}

/// What happens when a content file cannot be processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop at the first bad file
    #[default]
    Abort,
    /// Skip bad files, publish the rest, then report all failures
    Collect,
}

impl std::str::FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "abort" => Ok(Self::Abort),
            "collect" => Ok(Self::Collect),
            other => Err(format!(
                "unknown error policy '{}' (expected abort or collect)",
                other
            )),
        }
    }
}

/// Code block highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub line_number: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            line_number: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.url, "http://localhost:3000");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.frontmatter, FrontmatterFormat::Yaml);
        assert_eq!(config.on_error, ErrorPolicy::Abort);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
url: https://blog.example.com/
output_dir: dist
frontmatter: simple
on_error: collect
highlight:
  enable: false
"#;
        let mut config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        config.normalize();
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.frontmatter, FrontmatterFormat::Simple);
        assert_eq!(config.on_error, ErrorPolicy::Collect);
        assert!(!config.highlight.enable);
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
    }

    #[test]
    fn test_overrides_win() {
        let mut config = SiteConfig::default();
        config.apply(&ConfigOverrides {
            url: Some("https://example.org//".to_string()),
            templates_dir: Some("theme".to_string()),
            ..Default::default()
        });
        assert_eq!(config.url, "https://example.org");
        assert_eq!(config.templates_dir, "theme");
        assert_eq!(config.content_dir, "content");
    }

    #[test]
    fn test_load_reports_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "frontmatter: toml\n").unwrap();
        let err = SiteConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("collect".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Collect));
        assert!("ignore".parse::<ErrorPolicy>().is_err());
        assert_eq!(
            "simple".parse::<FrontmatterFormat>(),
            Ok(FrontmatterFormat::Simple)
        );
    }
}
