//! Pipeline orchestrator: ties scraper → export → storage together.
//!
//! ## Stages
//!
//! 1. For each day in the configured range, fetch the prediction page and
//!    extract its match rows. A day answered with anything but HTTP 200
//!    contributes no rows.
//! 2. Write every row to the spreadsheet (fatal on failure).
//! 3. Append every row to PostgreSQL in one transaction. Failure here is
//!    reported, not raised: the spreadsheet is already on disk.
//!
//! Not idempotent: running the same range twice stores every row twice.

use crate::config::{AppConfig, DatabaseConfig};
use crate::export;
use crate::models::PredictionRecord;
use crate::scraper::parsers::RecordExtractor;
use crate::scraper::{ForebetScraper, PageSource};
use crate::storage::{Repository, StorageError};
use crate::utils::DateRange;
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

// ── Collect ───────────────────────────────────────────────────────────────────

/// Rows gathered over a date range, in date order then page order.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<PredictionRecord>,
    pub days_fetched: usize,
    pub days_skipped: usize,
}

/// Fetch and parse one page per day, sequentially.
pub async fn collect_records<S>(
    source: &S,
    extractor: &RecordExtractor,
    range: DateRange,
) -> Result<Collected>
where
    S: PageSource + ?Sized,
{
    let mut collected = Collected::default();

    for date in range {
        collected.days_fetched += 1;

        let Some(html) = source.fetch_page(date).await? else {
            collected.days_skipped += 1;
            warn!("{}: no page, 0 rows", date);
            continue;
        };

        let rows = extractor.extract(&html);
        info!("{}: {} rows", date, rows.len());
        collected.records.extend(rows);
    }

    Ok(collected)
}

// ── Persist ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum PersistOutcome {
    Inserted(usize),
    Failed(StorageError),
}

impl PersistOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PersistOutcome::Inserted(_))
    }
}

/// Store `records` over one connection that is closed on every path.
///
/// A failure is returned, not logged; the caller reports it once.
pub async fn persist(db: &DatabaseConfig, records: &[PredictionRecord]) -> PersistOutcome {
    let mut repo = match Repository::connect(db).await {
        Ok(repo) => repo,
        Err(e) => {
            debug!("PostgreSQL step failed: {}", e);
            return PersistOutcome::Failed(e);
        }
    };

    let result = store(&mut repo, records).await;

    if let Err(e) = repo.close().await {
        warn!("Error while closing PostgreSQL connection: {}", e);
    }

    match result {
        Ok(n) => PersistOutcome::Inserted(n),
        Err(e) => {
            debug!("PostgreSQL step failed: {}", e);
            PersistOutcome::Failed(e)
        }
    }
}

async fn store(repo: &mut Repository, records: &[PredictionRecord]) -> Result<usize, StorageError> {
    repo.ensure_table().await?;
    repo.insert_records(records).await
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

pub struct Pipeline {
    config: AppConfig,
    db: DatabaseConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig, db: DatabaseConfig) -> Self {
        Self { config, db }
    }

    pub async fn run(&self) -> Result<PipelineStats> {
        let scraper =
            ForebetScraper::new(&self.config.scraper).context("Failed to build scraper")?;
        self.run_with(&scraper).await
    }

    pub async fn run_with<S>(&self, source: &S) -> Result<PipelineStats>
    where
        S: PageSource + ?Sized,
    {
        let range = self.config.pipeline.date_range();
        let extractor = RecordExtractor::new()?;

        // ── 1. Fetch + parse ───────────────────────────────────────────────────
        info!(
            "=== Step 1: Fetching {} days ({} → {}) ===",
            range.len(),
            range.start(),
            range.end()
        );
        let collected = collect_records(source, &extractor, range).await?;

        // ── 2. Spreadsheet ─────────────────────────────────────────────────────
        let output = &self.config.export.output_path;
        info!(
            "=== Step 2: Writing {} rows to {:?} ===",
            collected.records.len(),
            output
        );
        export::write_table(output, &collected.records)
            .with_context(|| format!("Failed to export to {:?}", output))?;

        // ── 3. PostgreSQL ──────────────────────────────────────────────────────
        let persisted = if self.config.pipeline.skip_db {
            info!("=== Step 3: Skipped (database disabled) ===");
            None
        } else {
            info!("=== Step 3: Inserting into PostgreSQL ===");
            Some(persist(&self.db, &collected.records).await)
        };

        let stats = PipelineStats {
            days_fetched: collected.days_fetched,
            days_skipped: collected.days_skipped,
            records: collected.records,
            persisted,
        };

        info!(
            "=== Done: {} days | {} skipped | {} rows ===",
            stats.days_fetched,
            stats.days_skipped,
            stats.records.len()
        );

        Ok(stats)
    }
}

#[derive(Debug)]
pub struct PipelineStats {
    pub days_fetched: usize,
    pub days_skipped: usize,
    pub records: Vec<PredictionRecord>,
    /// `None` when the database step was switched off.
    pub persisted: Option<PersistOutcome>,
}
