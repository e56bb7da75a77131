//! Review and stop-word sources
//!
//! Reviews come from a CSV file with a header row; one column holds the free
//! text. Stop words come from a plain text file, one word per line.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    vectorizer::token::StopWords,
};

/// Column read when none is configured
pub const DEFAULT_REVIEW_COLUMN: &str = "review";

/// Read the review column of a CSV file
/// See `read_reviews_from_reader`.
pub fn read_reviews(path: impl AsRef<Path>, column: &str) -> Result<Vec<String>> {
    let file = File::open(path.as_ref())?;
    read_reviews_from_reader(file, column)
}

/// Read the review column from CSV data
/// Rows whose field is missing, empty or unparsable are skipped. A whitespace-only
/// field is kept; it segments to an empty document that still counts towards N.
///
/// # Errors
/// * `MissingColumn` - header has no such column
/// * `Io` / `Csv` - the source itself cannot be read
pub fn read_reviews_from_reader<R: Read>(reader: R, column: &str) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let col_idx = rdr
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| Error::MissingColumn {
            column: column.to_string(),
        })?;

    let mut reviews = Vec::new();
    let mut skipped = 0usize;
    for (row, record) in rdr.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                debug!(row, error = %e, "skipping malformed row");
                skipped += 1;
                continue;
            }
        };
        match record.get(col_idx) {
            Some(text) if !text.is_empty() => reviews.push(text.to_string()),
            _ => skipped += 1,
        }
    }
    debug!(reviews = reviews.len(), skipped, column, "reviews loaded");
    Ok(reviews)
}

/// Read a stop-word file
pub fn read_stop_words(path: impl AsRef<Path>) -> Result<StopWords> {
    let file = File::open(path.as_ref())?;
    read_stop_words_from_reader(BufReader::new(file))
}

/// One stop word per line, trimmed; blank lines ignored
pub fn read_stop_words_from_reader<R: BufRead>(reader: R) -> Result<StopWords> {
    let mut stop_words = StopWords::new();
    for line in reader.lines() {
        stop_words.insert(&line?);
    }
    debug!(stop_words = stop_words.len(), "stop words loaded");
    Ok(stop_words)
}
