use clap::{Parser, Subcommand};
use docs_index::config::{self, IndexConfig};
use docs_index::finder::Finder;
use docs_index::index::SectionIndex;
use docs_index::{output, scan, tree};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared version selector for query commands.
#[derive(clap::Args, Clone)]
struct VersionArg {
    /// Documentation version (defaults to the latest indexed one)
    #[arg(long, default_value = "")]
    version: String,
}

#[derive(Parser)]
#[command(name = "docs-index")]
#[command(about = "Index multi-version markdown documentation")]
#[command(long_about = "\
Index multi-version markdown documentation

Each version lives in its own directory below the documentation root.
Files become sections addressed by slug; directory landing pages
(_index.md) take their directory's slug.

Documentation structure:

  docs/
  ├── docs-index.toml              # Layout config (optional)
  ├── next/                        # Unreleased, never indexed
  ├── v1.4.x/                      # Version (newest is latest)
  │   ├── get-started.md           # slug: get-started
  │   └── using-k6/
  │       ├── _index.md            # slug: using-k6
  │       └── scenarios.md         # slug: using-k6/scenarios
  └── v1.3.x/

Frontmatter (all optional):
  title, description, weight (sibling order), aliases, menuTitle

Run 'docs-index gen-config' to generate a documented docs-index.toml.")]
#[command(version)]
struct Cli {
    /// Documentation root
    #[arg(long, default_value = "docs", global = true)]
    docs: PathBuf,

    /// Index file written by build and read by queries
    #[arg(long, default_value = "dist/sections.json", global = true)]
    index: PathBuf,

    /// Only log warnings and errors
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the index from the documentation root and write it
    Build {
        /// Index only these versions (repeatable; first is latest)
        #[arg(long = "version")]
        versions: Vec<String>,
        /// Fail when the build produced warnings
        #[arg(long)]
        strict: bool,
    },
    /// Build without writing, report what would be indexed
    Check,
    /// List indexed versions
    Versions,
    /// Show a depth-limited section tree
    Tree {
        #[command(flatten)]
        version: VersionArg,
        /// Only consider sections of this category
        #[arg(long)]
        category: Option<String>,
        /// List the children of this slug instead of the top level
        #[arg(long, default_value = "")]
        root: String,
        /// Levels to expand (clamped to the configured maximum)
        #[arg(long)]
        depth: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show one section by slug or alias
    Show {
        slug: String,
        #[command(flatten)]
        version: VersionArg,
    },
    /// Case-insensitive search over titles, descriptions and slugs
    Search {
        query: String,
        #[command(flatten)]
        version: VersionArg,
    },
    /// List the categories of a version
    Categories(VersionArg),
    /// Resolve a client version (e.g. v1.4.2) to an indexed version
    MatchVersion { client_version: String },
    /// Print a stock docs-index.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();
    if matches!(cli.command, Command::Tree { json: true, .. }) {
        cli.quiet = true;
    }
    init_logging(&cli);

    match &cli.command {
        Command::Build { versions, strict } => {
            let config = config::load_config(&cli.docs)?;
            let report = build(&cli.docs, versions, &config)?;
            output::print_build_report(&report);
            if *strict && !report.is_clean() {
                return Err(format!(
                    "{} warning(s) while building; not writing {}",
                    report.warnings.len(),
                    cli.index.display()
                )
                .into());
            }
            report.index.write_json(&cli.index)?;
            log::info!(
                "Wrote {} sections to {}",
                report.index.section_count(),
                cli.index.display()
            );
        }
        Command::Check => {
            log::info!("Checking {}", cli.docs.display());
            let report = scan::scan(&cli.docs)?;
            output::print_build_report(&report);
        }
        Command::Versions => {
            let (index, _) = load_index(&cli)?;
            output::print_versions(&index);
        }
        Command::Tree {
            version,
            category,
            root,
            depth,
            json,
        } => {
            let (index, config) = load_index(&cli)?;
            let finder = Finder::new(Arc::new(index));
            let depth = config.tree.clamp_depth(*depth);
            let listing = finder.tree(&version.version, category.as_deref(), root, depth)?;
            if *json {
                let nodes = tree::to_tree_nodes(&listing.nodes);
                println!("{}", serde_json::to_string_pretty(&nodes)?);
            } else {
                output::print_tree(&listing);
            }
        }
        Command::Show { slug, version } => {
            let finder = load_finder(&cli)?;
            output::print_section(finder.get_by_slug(slug, &version.version)?);
        }
        Command::Search { query, version } => {
            let finder = load_finder(&cli)?;
            output::print_section_list(&finder.search(query, &version.version)?);
        }
        Command::Categories(version) => {
            let finder = load_finder(&cli)?;
            output::print_categories(&finder.get_categories(&version.version)?);
        }
        Command::MatchVersion { client_version } => {
            let finder = load_finder(&cli)?;
            output::print_version_match(&finder.match_version(client_version));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Build every discovered version, or just the requested ones.
fn build(
    docs: &Path,
    versions: &[String],
    config: &IndexConfig,
) -> Result<scan::BuildReport, scan::ScanError> {
    if versions.is_empty() {
        scan::scan_with_config(docs, config)
    } else {
        scan::build_index(docs, versions, &config.layout)
    }
}

/// Load the index file using the documentation root's alias prefix.
fn load_index(cli: &Cli) -> Result<(SectionIndex, IndexConfig), Box<dyn std::error::Error>> {
    let config = config::load_config(&cli.docs)?;
    let index = SectionIndex::load_file(&cli.index, &config.layout.alias_prefix)?;
    Ok((index, config))
}

fn load_finder(cli: &Cli) -> Result<Finder, Box<dyn std::error::Error>> {
    let (index, _) = load_index(cli)?;
    Ok(Finder::new(Arc::new(index)))
}
