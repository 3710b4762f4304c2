use clap::{Parser, Subcommand};
use sofra::{config, loader::ContentLoader, ordering, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sofra")]
#[command(about = "Query and validate localized Markdown site content")]
#[command(long_about = "\
Query and validate localized Markdown site content

Each locale has its own directory of Markdown files with a YAML header.
Pages missing from a locale are served from the default locale.

Content structure:

  content/
  ├── config.toml              # Site config (optional)
  ├── tr/                      # Default locale
  │   ├── hakkimizda.md        # Standalone page
  │   ├── pages/kvkk.md        # Standalone page, alternate location
  │   ├── management/          # Staff profiles
  │   │   └── ayse-kaya.md
  │   └── news/                # News items (date, draft, archived)
  │       └── yeni-sube.md
  └── en/
      └── pages/about.md

Slug lookup searches <locale>/, pages/, management/, news/ in that order.

Run 'sofra gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Locale to query (defaults to the configured default locale)
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Log loader decisions (cache, fallback) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Query(Query),
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Commands that read content through the loader.
#[derive(Subcommand)]
enum Query {
    /// List every page of a locale
    Pages,
    /// Show one page by slug
    Page {
        slug: String,
        /// Print the full document as JSON
        #[arg(long, conflicts_with = "html")]
        json: bool,
        /// Render the page's Markdown sections to HTML
        #[arg(long)]
        html: bool,
    },
    /// List published news, newest first
    News,
    /// List management profiles in display order
    Management,
    /// Parse and validate every document of every configured locale
    Check,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::GenConfig => print!("{}", config::stock_config_toml()),
        Command::Query(query) => run_query(query, &cli.source, cli.locale.as_deref())?,
    }

    Ok(())
}

fn run_query(
    query: Query,
    source: &Path,
    locale: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    let loader = ContentLoader::from_config(source, &site_config);
    let locale = locale.unwrap_or(&site_config.default_locale);

    match query {
        Query::Pages => {
            let pages = loader.get_all_pages(locale)?;
            output::print_pages(&pages, locale);
        }
        Query::Page { slug, json, html } => {
            let Some(page) = loader.get_page_by_slug(locale, &slug)? else {
                return Err(format!("page '{slug}' not found for locale '{locale}'").into());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else if html {
                for line in output::format_page_html(&page) {
                    println!("{}", line);
                }
            } else {
                output::print_page(&page, locale);
            }
        }
        Query::News => {
            let news = loader.get_all_news(locale)?;
            output::print_news(&news, locale, site_config.time_zone());
        }
        Query::Management => {
            let mut people = loader.get_management_people(locale)?;
            ordering::sort_management(&mut people, &site_config.management.order, locale);
            output::print_management(&people, locale);
        }
        Query::Check => {
            println!("==> Checking {}", source.display());
            for locale in &site_config.locales {
                let pages = loader.get_all_pages(locale)?;
                println!("{}", output::format_check_summary(locale, &pages));
            }
            println!("Cache: {}", loader.stats());
            println!("==> Content is valid");
        }
    }

    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("sofra=debug")
    } else {
        EnvFilter::new("warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
