use crate::config::DatabaseConfig;
use crate::models::PredictionRecord;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info};

// ── Schema ────────────────────────────────────────────────────────────────────

pub const TABLE: &str = "football_predictions";

// Everything is TEXT, matching what the page shows.
const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS football_predictions (
    league_country      TEXT,
    home_team           TEXT,
    away_team           TEXT,
    date                TEXT,
    average_goals       TEXT,
    coefficient_value   TEXT,
    score               TEXT,
    ht_score            TEXT
)
"#;

const INSERT: &str = r#"
INSERT INTO football_predictions
    (league_country, home_team, away_team, date, average_goals, coefficient_value, score, ht_score)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Cannot connect to PostgreSQL: {0} is not set")]
    MissingSetting(&'static str),
    #[error("Cannot connect to PostgreSQL: DB_PORT {0:?} is not a port number")]
    InvalidPort(String),
    #[error("Cannot connect to PostgreSQL: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("PostgreSQL query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Build connection options from the `DB_*` settings.
pub fn connect_options(cfg: &DatabaseConfig) -> Result<PgConnectOptions, StorageError> {
    fn require<'a>(
        value: &'a Option<String>,
        var: &'static str,
    ) -> Result<&'a str, StorageError> {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or(StorageError::MissingSetting(var))
    }

    let name = require(&cfg.name, "DB_NAME")?;
    let user = require(&cfg.user, "DB_USER")?;
    let host = require(&cfg.host, "DB_HOST")?;
    let port_str = require(&cfg.port, "DB_PORT")?;
    let port: u16 = port_str
        .trim()
        .parse()
        .map_err(|_| StorageError::InvalidPort(port_str.to_string()))?;

    let mut options = PgConnectOptions::new()
        .host(host)
        .port(port)
        .username(user)
        .database(name);

    // An empty password is left to the server (trust auth, .pgpass).
    if let Some(password) = cfg.password.as_deref().filter(|p| !p.is_empty()) {
        options = options.password(password);
    }
    Ok(options)
}

// ── Repository ────────────────────────────────────────────────────────────────

/// A single PostgreSQL connection. Dropping it also closes the socket;
/// [`Repository::close`] does so gracefully.
pub struct Repository {
    conn: PgConnection,
}

impl Repository {
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StorageError> {
        let options = connect_options(cfg)?;
        debug!(
            "Connecting to PostgreSQL at {}:{}",
            options.get_host(),
            options.get_port()
        );
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(StorageError::Connect)?;
        Ok(Self { conn })
    }

    /// Create the table if it is missing. An existing table is left as is.
    pub async fn ensure_table(&mut self) -> Result<(), StorageError> {
        sqlx::query(DDL).execute(&mut self.conn).await?;
        debug!("Table {} ready", TABLE);
        Ok(())
    }

    /// Append every record in one transaction. Nothing is deduplicated, so
    /// inserting the same records twice stores them twice.
    pub async fn insert_records(
        &mut self,
        records: &[PredictionRecord],
    ) -> Result<usize, StorageError> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut tx = self.conn.begin().await?;
        for r in records {
            sqlx::query(INSERT)
                .bind(&r.league_country)
                .bind(&r.home_team)
                .bind(&r.away_team)
                .bind(&r.date)
                .bind(&r.average_goals)
                .bind(&r.coefficient_value)
                .bind(&r.score)
                .bind(&r.ht_score)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        info!("Inserted {} rows into {}", records.len(), TABLE);
        Ok(records.len())
    }

    pub async fn row_count(&mut self) -> Result<i64, StorageError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM football_predictions")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(n)
    }

    pub async fn league_count(&mut self) -> Result<i64, StorageError> {
        let n = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT league_country) FROM football_predictions",
        )
        .fetch_one(&mut self.conn)
        .await?;
        Ok(n)
    }

    pub async fn load_all(&mut self) -> Result<Vec<PredictionRecord>, StorageError> {
        let rows = sqlx::query_as::<_, PredictionRecord>(
            r#"SELECT league_country, home_team, away_team, date, average_goals,
                      coefficient_value, score, ht_score
               FROM football_predictions"#,
        )
        .fetch_all(&mut self.conn)
        .await?;
        Ok(rows)
    }

    pub async fn close(self) -> Result<(), StorageError> {
        self.conn.close().await?;
        Ok(())
    }
}
