use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use crate::catalog::FetchCache;
use crate::client::ApiClient;
use crate::constants::DEFAULT_API_BASE;
use crate::content;
use crate::reporting;
use crate::selection::SelectionState;

const DESKHAVEN_LOGO: &str = r#"
     _           _    _
  __| | ___  ___| | _| |__   __ ___   _____ _ __
 / _` |/ _ \/ __| |/ / '_ \ / _` \ \ / / _ \ '_ \
| (_| |  __/\__ \   <| | | | (_| |\ V /  __/ | | |
 \__,_|\___||___/_|\_\_| |_|\__,_| \_/ \___|_| |_|
"#;

const TAGLINE: &str = "Virtual office landing-page platform";
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "deskhaven")]
#[command(version = VERSION)]
#[command(about = "Bulk-generate, inspect, and export virtual-office landing pages")]
struct Cli {
    /// Base URL of the deskhaven server
    #[arg(long, global = true, env = "DESKHAVEN_API", default_value = DEFAULT_API_BASE)]
    api: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bulk-generate pages for a city's areas
    Generate {
        /// Location id of the city
        #[arg(long)]
        city: i64,

        /// Area ids to generate for (comma separated); omit with --all-areas
        #[arg(long, value_delimiter = ',')]
        areas: Vec<i64>,

        /// Generate for every area in the city
        #[arg(long)]
        all_areas: bool,

        /// Purpose label; repeat for several purposes
        #[arg(long = "purpose", required = true)]
        purposes: Vec<String>,
    },
    /// List stored dynamic pages
    Pages,
    /// Export stored pages as JSON and CSV reports
    Export {
        #[arg(long, default_value = "reports")]
        output_dir: PathBuf,
    },
    /// Compose one page's content without persisting it
    Preview {
        #[arg(long)]
        area: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        purpose: String,
    },
}

pub struct DeskhavenCli;

impl DeskhavenCli {
    pub async fn run() -> anyhow::Result<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .try_init();

        let cli = Cli::parse();
        match cli.command {
            Commands::Generate {
                city,
                areas,
                all_areas,
                purposes,
            } => generate(&cli.api, city, &areas, all_areas, &purposes).await,
            Commands::Pages => pages(&cli.api).await,
            Commands::Export { output_dir } => export(&cli.api, &output_dir).await,
            Commands::Preview {
                area,
                city,
                purpose,
            } => {
                preview(&area, &city, &purpose);
                Ok(())
            }
        }
    }
}

fn print_banner() {
    println!("{}", DESKHAVEN_LOGO.cyan());
    println!("{} {}", TAGLINE.bold(), format!("v{VERSION}").dimmed());
    println!();
}

async fn generate(
    api: &str,
    city_id: i64,
    area_ids: &[i64],
    all_areas: bool,
    purposes: &[String],
) -> anyhow::Result<()> {
    print_banner();
    let client = ApiClient::new(api);

    let locations = client.locations().await?;
    let Some(city) = locations.into_iter().find(|l| l.id == city_id) else {
        anyhow::bail!("no city with id {city_id}; run `deskhaven pages` against the right server");
    };

    let mut state = SelectionState::new();
    let mut cache = FetchCache::default();
    let epoch = state.toggle_city(&city);

    let pool = match cache.get(city.id) {
        Some(areas) => areas.to_vec(),
        None => {
            let areas = client.areas(city.id).await;
            cache.put(city.id, areas.clone());
            areas
        }
    };
    if pool.is_empty() {
        println!(
            "{}",
            format!("No areas available for {} right now; re-run to retry.", city.name).yellow()
        );
        return Ok(());
    }
    state.apply_pool(epoch, pool);

    if all_areas {
        state.select_all_areas();
    } else {
        for id in area_ids {
            state.toggle_area(*id);
        }
    }
    for purpose in purposes {
        state.toggle_purpose(purpose);
    }

    println!(
        "{} {} pages pending for {}",
        "▸".cyan(),
        state.pending_count().to_string().bold(),
        city.name.bold()
    );

    let candidates = state.plan()?;
    match client.submit_bulk(&candidates).await {
        Ok(outcome) => {
            println!(
                "{} created, {} skipped — {}",
                outcome.created.to_string().green().bold(),
                outcome.skipped.to_string().yellow().bold(),
                outcome.message
            );
            Ok(())
        }
        Err(err) => {
            eprintln!(
                "{} {}",
                "Submit failed:".red().bold(),
                "your selections are unchanged; re-run to retry.".red()
            );
            Err(err.into())
        }
    }
}

async fn pages(api: &str) -> anyhow::Result<()> {
    let client = ApiClient::new(api);
    let pages = client.list_pages().await?;
    if pages.is_empty() {
        println!("{}", "No dynamic pages stored yet.".yellow());
        return Ok(());
    }
    for page in pages {
        let status = if page.is_active {
            "active".green()
        } else {
            "hidden".dimmed()
        };
        println!(
            "{}  [{}]  {} — {}",
            page.slug.bold(),
            status,
            page.city_name,
            page.purpose
        );
    }
    Ok(())
}

async fn export(api: &str, output_dir: &std::path::Path) -> anyhow::Result<()> {
    let client = ApiClient::new(api);
    let pages = client.list_pages().await?;
    reporting::write_outputs(&pages, output_dir)?;
    println!(
        "{} {} pages exported to {}",
        "✓".green().bold(),
        pages.len(),
        output_dir.display()
    );
    Ok(())
}

fn preview(area: &str, city: &str, purpose: &str) {
    let content = content::compose(area, city, purpose);
    println!("{} {}", "slug:".bold(), content.slug);
    println!();
    println!("{}", "Overview".cyan().bold());
    println!("{}", content.overview);
    println!();
    println!("{}", "Benefits".cyan().bold());
    if content.benefits.is_empty() {
        println!("{}", "(none for this purpose)".dimmed());
    }
    for benefit in &content.benefits {
        println!("  • {benefit}");
    }
    println!();
    println!("{}", "Why us".cyan().bold());
    for item in &content.why_us {
        println!("  {} — {}", item.title.bold(), item.description);
    }
}
