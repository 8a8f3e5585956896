//! CLI entry point for quire

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quire::config::{ConfigOverrides, ErrorPolicy, FrontmatterFormat};
use quire::Site;

#[derive(Parser)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A static site generator for markdown posts, pages and author profiles", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(flatten)]
    site: SiteArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Values that override `_config.yml`
#[derive(Args)]
struct SiteArgs {
    /// Base URL of the published site
    #[arg(long, global = true, env = "SITE_URL")]
    url: Option<String>,

    /// Content directory
    #[arg(long, global = true, env = "CONTENT_DIR")]
    content_dir: Option<String>,

    /// Templates directory
    #[arg(long, global = true, env = "TEMPLATES_DIR")]
    templates_dir: Option<String>,

    /// Output directory
    #[arg(long, global = true, env = "OUTPUT_DIR")]
    output_dir: Option<String>,

    /// Frontmatter format (yaml, simple)
    #[arg(long, global = true)]
    frontmatter: Option<FrontmatterFormat>,

    /// What to do with malformed content files (abort, collect)
    #[arg(long, global = true)]
    on_error: Option<ErrorPolicy>,
}

impl From<SiteArgs> for ConfigOverrides {
    fn from(args: SiteArgs) -> Self {
        Self {
            url: args.url,
            content_dir: args.content_dir,
            templates_dir: args.templates_dir,
            output_dir: args.output_dir,
            frontmatter: args.frontmatter,
            on_error: args.on_error,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "b", alias = "generate")]
    Build,

    /// Delete the output folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (posts, pages, authors)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quire=debug,info"
    } else {
        "quire=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };
    let overrides = ConfigOverrides::from(cli.site);

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            quire::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Build => {
            let site = Site::with_overrides(&base_dir, &overrides)?;
            tracing::info!("Building {:?} into {:?}", site.content_dir, site.output_dir);
            let report = site.build()?;
            println!(
                "Built {} posts, {} pages and {} authors into {:?}",
                report.posts, report.pages, report.authors, site.output_dir
            );
        }

        Commands::Clean => {
            let site = Site::with_overrides(&base_dir, &overrides)?;
            tracing::info!("Cleaning output folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = Site::with_overrides(&base_dir, &overrides)?;
            quire::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("quire version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
