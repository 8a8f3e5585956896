//! quire: a static site generator for markdown posts, pages and author profiles
//!
//! A content tree of markdown files with YAML frontmatter is collected into a
//! cross-linked graph of posts, pages and authors, rendered through four Tera
//! templates and written out together with a sitemap.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use config::{ConfigOverrides, SiteConfig};
use content::{AuthorRegistry, Collection, ContentCollector, MarkdownRenderer};

/// A site rooted at a project directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Project root
    pub base_dir: PathBuf,
    pub content_dir: PathBuf,
    pub templates_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    pub authors_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        Self::with_overrides(base_dir, &ConfigOverrides::default())
    }

    /// Like [`Site::new`], with environment / command line values on top
    pub fn with_overrides<P: AsRef<Path>>(
        base_dir: P,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };
        config.apply(overrides);

        Ok(Self::from_config(base_dir, config))
    }

    /// Resolve every directory of `config` against `base_dir`
    pub fn from_config(base_dir: PathBuf, config: SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let templates_dir = base_dir.join(&config.templates_dir);
        let output_dir = base_dir.join(&config.output_dir);
        let authors_dir = content_dir.join(&config.authors_dir);
        let assets_dir = content_dir.join(&config.assets_dir);

        Self {
            config,
            base_dir,
            content_dir,
            templates_dir,
            output_dir,
            authors_dir,
            assets_dir,
        }
    }

    pub fn markdown_renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_config(&self.config.highlight)
    }

    /// Load author profiles, then collect and link all other content
    ///
    /// Skipped author profiles come first in `failures`.
    pub fn collect(&self, renderer: &MarkdownRenderer) -> Result<Collection> {
        let (authors, mut failures) = AuthorRegistry::load(
            &self.authors_dir,
            self.config.frontmatter,
            self.config.on_error,
            renderer,
        )?;
        let mut collection = ContentCollector::new(&self.content_dir, &self.authors_dir, renderer)
            .format(self.config.frontmatter)
            .policy(self.config.on_error)
            .collect(authors)?;
        failures.append(&mut collection.failures);
        collection.failures = failures;
        Ok(collection)
    }

    /// Build the site into the output directory
    pub fn build(&self) -> Result<commands::build::BuildReport> {
        commands::build::run(self)
    }

    /// Remove the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
