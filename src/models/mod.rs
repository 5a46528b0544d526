use serde::{Deserialize, Serialize};

/// Stored in place of any field whose element is missing from the page.
pub const PLACEHOLDER: &str = "N/A";

// ── Columns ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name in the `football_predictions` table.
    pub name: &'static str,
    /// Header shown in the exported spreadsheet.
    pub header: &'static str,
}

/// Column order shared by the spreadsheet and the database table.
pub const COLUMNS: [Column; 8] = [
    Column { name: "league_country", header: "League/Country" },
    Column { name: "home_team", header: "Home Team" },
    Column { name: "away_team", header: "Away Team" },
    Column { name: "date", header: "Date" },
    Column { name: "average_goals", header: "Average Goals" },
    Column { name: "coefficient_value", header: "Coefficient Value" },
    Column { name: "score", header: "Score" },
    Column { name: "ht_score", header: "HT Score" },
];

// ── Prediction record ─────────────────────────────────────────────────────────

/// One match entry from an under/over 2.5 goals prediction page.
///
/// Every field is kept as the text shown on the page; nothing is parsed into
/// numbers or dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PredictionRecord {
    pub league_country: String,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub average_goals: String,
    pub coefficient_value: String,
    pub score: String,
    pub ht_score: String,
}

impl PredictionRecord {
    /// Field values in `COLUMNS` order.
    pub fn fields(&self) -> [&str; 8] {
        [
            self.league_country.as_str(),
            self.home_team.as_str(),
            self.away_team.as_str(),
            self.date.as_str(),
            self.average_goals.as_str(),
            self.coefficient_value.as_str(),
            self.score.as_str(),
            self.ht_score.as_str(),
        ]
    }

    /// Number of fields that fell back to the placeholder.
    pub fn missing_fields(&self) -> usize {
        self.fields().iter().filter(|f| **f == PLACEHOLDER).count()
    }
}
