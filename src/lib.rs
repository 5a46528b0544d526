//! Scraper for forebet.com under/over 2.5 goals predictions.
//!
//! Fetches one page per day, extracts eight text fields per match and writes
//! the rows to a spreadsheet and a PostgreSQL table.

pub mod config;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod storage;
pub mod utils;
