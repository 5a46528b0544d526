use crate::models::{PLACEHOLDER, PredictionRecord};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

fn compile(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

// ── Field paths ───────────────────────────────────────────────────────────────

/// A chain of selectors, each one searched for inside the first match of the
/// one before it.
#[derive(Debug)]
pub struct FieldPath {
    steps: Vec<Selector>,
}

impl FieldPath {
    pub fn new(steps: &[&str]) -> Result<Self, ParseError> {
        let steps = steps
            .iter()
            .map(|s| compile(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { steps })
    }

    /// Trimmed text of the element at the end of the path, or `None` as soon
    /// as one step finds nothing.
    pub fn resolve(&self, container: ElementRef<'_>) -> Option<String> {
        let mut current = container;
        for step in &self.steps {
            current = current.select(step).next()?;
        }
        Some(current.text().collect::<String>().trim().to_string())
    }

    fn text_or_placeholder(&self, container: ElementRef<'_>) -> String {
        self.resolve(container)
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

// ── Prediction page ───────────────────────────────────────────────────────────

/// One match entry on the page.
const CONTAINER: &str = "div.rcnt";

/// Pulls [`PredictionRecord`]s out of an under/over 2.5 goals page.
#[derive(Debug)]
pub struct RecordExtractor {
    container: Selector,
    league_country: FieldPath,
    home_team: FieldPath,
    away_team: FieldPath,
    date: FieldPath,
    average_goals: FieldPath,
    coefficient_value: FieldPath,
    score: FieldPath,
    ht_score: FieldPath,
}

impl RecordExtractor {
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            container: compile(CONTAINER)?,
            league_country: FieldPath::new(&["div.shortagDiv", "span.shortTag"])?,
            home_team: FieldPath::new(&["span.homeTeam"])?,
            away_team: FieldPath::new(&["span.awayTeam"])?,
            date: FieldPath::new(&["time"])?,
            average_goals: FieldPath::new(&["div.avg_sc"])?,
            // Compound class selectors: extra classes or another order still match.
            coefficient_value: FieldPath::new(&["div.bigOnly.prmod", "span.lscrsp"])?,
            score: FieldPath::new(&["div.ex_sc.tabonly"])?,
            ht_score: FieldPath::new(&["div.lscr_td", "span.lscrsp"])?,
        })
    }

    /// One record per match container, in document order. A page without
    /// containers gives an empty vec.
    pub fn extract(&self, html: &str) -> Vec<PredictionRecord> {
        let doc = Html::parse_document(html);
        let records: Vec<_> = doc
            .select(&self.container)
            .map(|row| self.extract_row(row))
            .collect();

        debug!(
            "{} containers, {} placeholder fields",
            records.len(),
            records.iter().map(|r| r.missing_fields()).sum::<usize>()
        );
        records
    }

    fn extract_row(&self, row: ElementRef<'_>) -> PredictionRecord {
        PredictionRecord {
            league_country: self.league_country.text_or_placeholder(row),
            home_team: self.home_team.text_or_placeholder(row),
            away_team: self.away_team.text_or_placeholder(row),
            date: self.date.text_or_placeholder(row),
            average_goals: self.average_goals.text_or_placeholder(row),
            coefficient_value: self.coefficient_value.text_or_placeholder(row),
            score: self.score.text_or_placeholder(row),
            ht_score: self.ht_score.text_or_placeholder(row),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_ROW: &str = r#"
        <div class="rcnt tr_0">
          <div class="tnms">
            <div class="shortagDiv tghov"><span class="shortTag">ES1</span></div>
            <a class="tnmscn" href="/en/football/matches/barcelona-granada-2024-02-11">
              <span class="homeTeam"><span itemprop="name">Barcelona</span></span>
              <span class="awayTeam"><span itemprop="name">Granada</span></span>
              <time itemprop="startDate"><span class="date_bah">11/02/2024 18:30</span></time>
            </a>
          </div>
          <div class="avg_sc tabonly"> 3.17 </div>
          <div class="bigOnly prmod"><span class="lscrsp">1.53</span></div>
          <div class="ex_sc tabonly">3 - 1</div>
          <div class="lscr_td"><span class="lscrsp">3 - 3</span></div>
        </div>
    "#;

    fn page(rows: &[&str]) -> String {
        format!(
            "<html><body><div class=\"schema\">{}</div></body></html>",
            rows.concat()
        )
    }

    #[test]
    fn test_full_row() {
        let ex = RecordExtractor::new().unwrap();
        let records = ex.extract(&page(&[FULL_ROW]));

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.league_country, "ES1");
        assert_eq!(r.home_team, "Barcelona");
        assert_eq!(r.away_team, "Granada");
        assert_eq!(r.date, "11/02/2024 18:30");
        assert_eq!(r.average_goals, "3.17");
        assert_eq!(r.coefficient_value, "1.53");
        assert_eq!(r.score, "3 - 1");
        assert_eq!(r.ht_score, "3 - 3");
        assert_eq!(r.missing_fields(), 0);
    }

    #[test]
    fn test_page_without_containers() {
        let ex = RecordExtractor::new().unwrap();
        assert!(ex.extract("<html><body><p>No matches</p></body></html>").is_empty());
        assert!(ex.extract("").is_empty());
    }

    #[test]
    fn test_missing_coefficient_only() {
        let row = FULL_ROW.replace(
            r#"<div class="bigOnly prmod"><span class="lscrsp">1.53</span></div>"#,
            "",
        );
        let ex = RecordExtractor::new().unwrap();
        let records = ex.extract(&page(&[&row]));

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.coefficient_value, PLACEHOLDER);
        // the half-time span has the same class but lives under lscr_td
        assert_eq!(r.ht_score, "3 - 3");
        assert_eq!(r.league_country, "ES1");
        assert_eq!(r.score, "3 - 1");
        assert_eq!(r.missing_fields(), 1);
    }

    #[test]
    fn test_class_order_and_extra_classes_still_match() {
        let row = FULL_ROW
            .replace(r#"class="bigOnly prmod""#, r#"class="prmod bigOnly highlight""#)
            .replace(r#"class="ex_sc tabonly""#, r#"class="tabonly ex_sc""#);
        let ex = RecordExtractor::new().unwrap();
        let r = &ex.extract(&page(&[&row]))[0];

        assert_eq!(r.coefficient_value, "1.53");
        assert_eq!(r.score, "3 - 1");
    }

    #[test]
    fn test_outer_element_without_inner_span() {
        let row = FULL_ROW
            .replace(r#"<span class="shortTag">ES1</span>"#, "ES1")
            .replace(r#"<span class="lscrsp">3 - 3</span>"#, "");
        let ex = RecordExtractor::new().unwrap();
        let r = &ex.extract(&page(&[&row]))[0];

        assert_eq!(r.league_country, PLACEHOLDER);
        assert_eq!(r.ht_score, PLACEHOLDER);
        assert_eq!(r.home_team, "Barcelona");
    }

    #[test]
    fn test_second_row_missing_away_team_and_score() {
        let second = r#"
            <div class="rcnt tr_1">
              <div class="shortagDiv"><span class="shortTag">IT1</span></div>
              <span class="homeTeam">Inter</span>
              <time>12/02/2024 20:45</time>
              <div class="avg_sc">2.41</div>
              <div class="bigOnly prmod"><span class="lscrsp">1.88</span></div>
              <div class="lscr_td"><span class="lscrsp">1 - 0</span></div>
            </div>
        "#;
        let ex = RecordExtractor::new().unwrap();
        let records = ex.extract(&page(&[FULL_ROW, second]));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].home_team, "Barcelona");

        let r = &records[1];
        assert_eq!(r.away_team, PLACEHOLDER);
        assert_eq!(r.score, PLACEHOLDER);
        assert_eq!(r.league_country, "IT1");
        assert_eq!(r.home_team, "Inter");
        assert_eq!(r.date, "12/02/2024 20:45");
        assert_eq!(r.average_goals, "2.41");
        assert_eq!(r.coefficient_value, "1.88");
        assert_eq!(r.ht_score, "1 - 0");
    }

    #[test]
    fn test_empty_container_is_all_placeholders() {
        let ex = RecordExtractor::new().unwrap();
        let records = ex.extract(&page(&[r#"<div class="rcnt"></div>"#]));
        assert_eq!(records.len(), 1);
        assert!(records[0].fields().iter().all(|f| *f == PLACEHOLDER));
    }

    #[test]
    fn test_field_path_resolves_nested_steps() {
        let doc = Html::parse_fragment(
            r#"<div class="rcnt"><div class="a"><p>outer<span class="b"> inner </span></p></div></div>"#,
        );
        let container_sel = compile("div.rcnt").unwrap();
        let container = doc.select(&container_sel).next().unwrap();

        let path = FieldPath::new(&["div.a", "span.b"]).unwrap();
        assert_eq!(path.resolve(container).as_deref(), Some("inner"));

        let missing = FieldPath::new(&["div.a", "span.c"]).unwrap();
        assert_eq!(missing.resolve(container), None);
    }

    #[test]
    fn test_invalid_selector() {
        let err = FieldPath::new(&["div..broken"]).unwrap_err();
        assert!(err.to_string().contains("div..broken"));
    }
}
