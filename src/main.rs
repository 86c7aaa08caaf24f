use std::fmt::Debug;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_revenue::api::{build_router, state::AppState};
use arena_revenue::assistant::{self, select_backend, AssistantContext};
use arena_revenue::calculate::{game_summaries, segment_customers, sponsor_report};
use arena_revenue::config::AppConfig;
use arena_revenue::ingest::header::{FieldTable, GAME_HEADER_KEYWORDS};
use arena_revenue::ingest::{
    crm::{CRM_FIELDS, CRM_HEADER_KEYWORDS},
    games::GAME_FIELDS,
    sponsors::{SPONSOR_FIELDS, SPONSOR_HEADER_KEYWORDS},
    tokenize, ColumnMap, HeaderDetector, Table,
};
use arena_revenue::models::{CrmFilter, GameFilter, SponsorFilter};
use arena_revenue::storage::{read_text, Dataset, DatasetKind, DatasetUpdate, StorageConfig};

#[derive(Parser)]
#[command(name = "arena-revenue")]
#[command(about = "Ticketing, CRM and sponsorship analytics for a basketball franchise")]
#[command(version)]
struct Cli {
    /// Path to configuration file (optional; missing file means defaults)
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides SERVER_PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the aggregates for the data directory
    Summary {
        /// Season label, e.g. 2024/2025 or 24-25
        #[arg(long)]
        season: Option<String>,

        /// Print the aggregates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a CSV export's header is detected and mapped
    InspectHeader {
        /// Path to the CSV file
        path: PathBuf,

        /// Dataset type: ticketing, crm or sponsorship
        #[arg(long, default_value = "ticketing")]
        dataset: String,
    },

    /// Print the effective configuration as TOML
    ShowConfig,

    /// Ask the assistant a question about the data directory
    Ask {
        question: String,

        /// Season label to restrict the game aggregates
        #[arg(long)]
        season: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(Some(cli.config.as_path()))
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    // Initialize tracing
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting arena-revenue v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let dataset = Dataset::load(&StorageConfig::from_app(&config))?;
            let backend = select_backend(&config.assistant)?;
            let addr = format!("{}:{}", config.server.host, config.server.port);

            let app = build_router(AppState::new(config, dataset, backend));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("API listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Summary { season, json } => {
            let dataset = Dataset::load(&StorageConfig::from_app(&config))?;
            let filter = GameFilter {
                season,
                ..Default::default()
            };
            let context = AssistantContext::build(&dataset, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&context)?);
            } else {
                print_summary(&dataset, &filter, &context);
            }
        }
        Commands::InspectHeader { path, dataset } => {
            let kind: DatasetKind = dataset.parse()?;
            let text = read_text(&path)?;
            inspect_header(kind, &text);
        }
        Commands::ShowConfig => {
            print!("{}", config.to_toml()?);
        }
        Commands::Ask { question, season } => {
            let dataset = Dataset::load(&StorageConfig::from_app(&config))?;
            let filter = GameFilter {
                season,
                ..Default::default()
            };
            let context = AssistantContext::build(&dataset, &filter);
            let backend = select_backend(&config.assistant)?;

            let answer = assistant::ask(backend.as_ref(), &question, &context).await?;
            println!("{}", answer.answer);
        }
    }

    Ok(())
}

fn print_summary(dataset: &Dataset, filter: &GameFilter, context: &AssistantContext) {
    let o = &context.overview;
    println!("\n=== Overview ===");
    println!("Games:        {}", o.games);
    println!("Attendance:   {} / {} seats", o.attendance, o.capacity);
    println!("Occupancy:    {:.1}%", o.occupancy * 100.0);
    println!("Revenue:      €{:.2}", o.total_revenue);
    println!("Yield:        €{:.2}", o.yield_per_ticket);
    println!("Comps:        {}", o.complimentary);

    println!("\n=== Games ===");
    for game in game_summaries(&dataset.games, filter) {
        println!(
            "  {:<12} {:<28} {:>6} {:>6.1}%  €{:>11.2}",
            game.date,
            game.opponent,
            game.attendance,
            game.occupancy * 100.0,
            game.total_revenue
        );
    }

    println!("\n=== Zones ===");
    for zone in &context.zones {
        println!(
            "  {:<16} {:>6} / {:<6} {:>6.1}%  €{:>8.2}",
            zone.zone.to_string(),
            zone.sold,
            zone.capacity,
            zone.occupancy * 100.0,
            zone.yield_per_ticket
        );
    }

    println!("\n=== Channels ===");
    for channel in &context.channels {
        println!(
            "  {:<16} {:>6}  €{:>11.2} {:>6.1}%",
            channel.channel.to_string(),
            channel.quantity,
            channel.revenue,
            channel.revenue_share * 100.0
        );
    }

    let comps = &context.comps;
    println!("\n=== Comps ===");
    println!(
        "  {} giveaway / {} paid ({:.1}%), leakage €{:.2}",
        comps.total_giveaway,
        comps.total_paid,
        comps.comp_rate * 100.0,
        comps.leakage_value
    );
    for (reason, count) in &comps.giveaway_reasons {
        println!("  - {}: {}", reason, count);
    }

    println!("\n=== P&L by month ===");
    for month in &context.pnl {
        println!("  {:>2}  €{:>12.2}", month.month, month.revenue);
    }

    let crm = segment_customers(&dataset.customers, &CrmFilter::default());
    println!("\n=== CRM segments ===");
    for segment in &crm.segments {
        println!(
            "  {:<16} {:>5} customers  €{:>10.2}",
            segment.segment.to_string(),
            segment.customers,
            segment.revenue
        );
    }

    let sponsors = sponsor_report(
        &dataset.sponsors,
        &SponsorFilter {
            season: filter.season.clone(),
            category: None,
        },
    );
    println!("\n=== Sponsors ===");
    for sponsor in &sponsors.sponsors {
        println!(
            "  {:<28} {:<9} €{:>11.2}  ratio {:.2}",
            sponsor.company,
            sponsor.tier.to_string(),
            sponsor.contract_value,
            sponsor.value_ratio
        );
    }
}

fn inspect_header(kind: DatasetKind, text: &str) {
    let grid = tokenize(text);
    let keywords = match kind {
        DatasetKind::Ticketing => GAME_HEADER_KEYWORDS,
        DatasetKind::Crm => CRM_HEADER_KEYWORDS,
        DatasetKind::Sponsorship => SPONSOR_HEADER_KEYWORDS,
    };
    let detector = HeaderDetector::new(keywords);
    let table = Table::locate(&grid, &detector);

    println!("\n=== Header ===");
    println!("Rows in file:   {}", grid.len());
    println!("Header row:     {}", table.header_row);
    println!(
        "Keyword score:  {}",
        grid.get(table.header_row)
            .map(|row| detector.score(row))
            .unwrap_or(0)
    );
    println!("Columns:        {}", table.columns.len());
    println!("Data rows:      {}", table.rows.len());

    println!("\n=== Fields ===");
    match kind {
        DatasetKind::Ticketing => print_fields(GAME_FIELDS, &table.columns),
        DatasetKind::Crm => print_fields(CRM_FIELDS, &table.columns),
        DatasetKind::Sponsorship => print_fields(SPONSOR_FIELDS, &table.columns),
    }

    let update = DatasetUpdate::parse(kind, text);
    println!("\n=== Load report ===");
    match serde_json::to_string_pretty(update.report()) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to render load report: {}", e),
    }
}

fn print_fields<F: Debug + 'static>(table: FieldTable<F>, columns: &ColumnMap) {
    for (field, synonyms) in table.iter() {
        match columns.find(synonyms) {
            Some(index) => println!("  {:<16} column {}", format!("{:?}", field), index),
            None => println!(
                "  {:<16} missing (tried {})",
                format!("{:?}", field),
                synonyms.join(", ")
            ),
        }
    }
}
