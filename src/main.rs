use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use forebet_predictions::config::{AppConfig, DatabaseConfig};
use forebet_predictions::pipeline::{PersistOutcome, Pipeline};
use forebet_predictions::storage::Repository;
use forebet_predictions::utils;

#[derive(Parser)]
#[command(
    name = "forebet-predictions",
    about = "forebet.com under/over 2.5 goals scraper",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the date range, write the spreadsheet, then insert into PostgreSQL
    Run {
        /// First day to scrape (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last day to scrape, inclusive (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Output file (.xlsx, or .csv for plain CSV)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after writing the spreadsheet
        #[arg(long)]
        skip_db: bool,
    },

    /// Create the football_predictions table if it does not exist
    Migrate,

    /// Show database statistics
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "forebet_predictions=info,warn",
        1 => "forebet_predictions=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = AppConfig::load()?;
    let db = DatabaseConfig::from_env()?;

    match cli.command {
        Command::Run {
            start_date,
            end_date,
            output,
            skip_db,
        } => {
            if let Some(start) = start_date {
                config.pipeline.start_date = start;
            }
            if let Some(end) = end_date {
                config.pipeline.end_date = end;
            }
            if let Some(path) = output {
                config.export.output_path = path;
            }
            config.pipeline.skip_db |= skip_db;

            if config.pipeline.start_date > config.pipeline.end_date {
                anyhow::bail!(
                    "Start date ({}) cannot be after end date ({})",
                    config.pipeline.start_date,
                    config.pipeline.end_date
                );
            }

            let output = config.export.output_path.clone();
            let _t = utils::Timer::start("Prediction scrape");
            let stats = Pipeline::new(config, db).run().await?;

            println!(
                "Wrote {} rows from {} days to {}",
                stats.records.len(),
                stats.days_fetched,
                output.display()
            );

            match stats.persisted {
                Some(PersistOutcome::Inserted(n)) => println!(
                    "Data has been successfully inserted into the PostgreSQL database ({} rows).",
                    n
                ),
                Some(PersistOutcome::Failed(e)) => {
                    eprintln!("Error while writing to PostgreSQL: {}", e)
                }
                None => {}
            }
        }

        Command::Migrate => {
            let mut repo = Repository::connect(&db).await?;
            let result = repo.ensure_table().await;
            repo.close().await?;
            result?;
            println!("Table football_predictions is ready.");
        }

        Command::Stats => {
            let mut repo = Repository::connect(&db).await?;
            let rows = repo.row_count().await;
            let leagues = repo.league_count().await;
            repo.close().await?;
            let (rows, leagues) = (rows?, leagues?);

            println!("─────────────────────────────────");
            println!("  Football predictions — Stats");
            println!("─────────────────────────────────");
            println!("  Rows     : {}", utils::fmt_number(rows));
            println!("  Leagues  : {}", utils::fmt_number(leagues));
            println!("─────────────────────────────────");
        }
    }

    Ok(())
}
