use anyhow::Result;
use clap::{Parser, Subcommand};
use upkeep_catalog::load_catalog;
use upkeep_core::Severity;

#[derive(Debug, Parser)]
#[command(name = "upkeep-cli")]
#[command(about = "Upkeep marketplace command-line interface")]
struct Cli {
    /// Directory holding the catalog YAML fragments.
    #[arg(long, default_value = "./data")]
    data_dir: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the web dashboard.
    Serve,
    /// Load and validate the catalog data, then report counts.
    Validate,
    /// Search services by relevance.
    Search { query: String },
    /// Print catalog and issue rollups.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Stats) {
        Commands::Serve => {
            upkeep_web::serve(&cli.data_dir).await?;
        }
        Commands::Validate => {
            let bundle = load_catalog(&cli.data_dir)?;
            println!(
                "catalog ok: categories={} services={} issues={}",
                bundle.registry.categories().len(),
                bundle.registry.service_count(),
                bundle.issues.issue_count()
            );
        }
        Commands::Search { query } => {
            let bundle = load_catalog(&cli.data_dir)?;
            let hits = bundle.registry.search(&query);
            if hits.is_empty() {
                println!("no services matched `{query}`");
            }
            for hit in hits {
                println!(
                    "[{}] {} ({} / {}) ${}-${}",
                    hit.relevance,
                    hit.entry.service.name,
                    hit.entry.category_id,
                    hit.entry.sub_category_id,
                    hit.entry.service.price_range.min,
                    hit.entry.service.price_range.max
                );
            }
        }
        Commands::Stats => {
            let bundle = load_catalog(&cli.data_dir)?;
            println!(
                "categories={} services={} issues={} emergencies={}",
                bundle.registry.categories().len(),
                bundle.registry.service_count(),
                bundle.issues.issue_count(),
                bundle.issues.issues_by_severity(Severity::Emergency).len()
            );
        }
    }

    Ok(())
}
