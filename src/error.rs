//! Error type shared by the corpus model, vectorizer and loaders.

use thiserror::Error;

/// Errors raised while building or querying a TF-IDF model
#[derive(Error, Debug)]
pub enum Error {
    /// term has no entry in the looked-up mapping
    /// (below the df floor, or absent from the document's bag-of-words)
    #[error("term not found: {term:?}{}", doc_suffix(.doc_index))]
    NotFound {
        doc_index: Option<usize>,
        term: String,
    },

    #[error("document index {index} out of range (corpus has {len} documents)")]
    OutOfRange { index: usize, len: usize },

    /// vectors built against different vocabularies
    #[error("vector dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("column {column:?} not found in corpus header")]
    MissingColumn { column: String },

    #[error("tokenizer failed: {0}")]
    Tokenizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn doc_suffix(doc_index: &Option<usize>) -> String {
    doc_index.map(|i| format!(" (document {i})")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_document() {
        let err = Error::NotFound { doc_index: Some(3), term: "room".to_string() };
        assert_eq!(err.to_string(), "term not found: \"room\" (document 3)");

        let err = Error::NotFound { doc_index: None, term: "room".to_string() };
        assert_eq!(err.to_string(), "term not found: \"room\"");
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = Error::DimensionMismatch { left: 3, right: 4 };
        assert_eq!(err.to_string(), "vector dimension mismatch: 3 != 4");
    }
}
