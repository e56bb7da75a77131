//! This crate finds reviews similar to a chosen review using TF-IDF vectors.
//!
//! ```
//! use review_tfidf::{
//!     DefaultTFIDFEngine, SortOrder, StopWords, TFIDFVectorizer, TieBreak, WhitespaceTokenizer,
//! };
//!
//! let reviews = ["good hotel nice room", "bad hotel dirty room", "good hotel nice room"];
//! let mut vectorizer = TFIDFVectorizer::<DefaultTFIDFEngine>::from_texts(
//!     &reviews,
//!     &WhitespaceTokenizer,
//!     &StopWords::new(),
//!     1,
//! )?;
//! vectorizer.select_vocabulary(10, SortOrder::Descending, TieBreak::Insertion);
//! assert_eq!(vectorizer.similar_documents(0, 0.99)?.indices(), vec![0, 2]);
//! # Ok::<(), review_tfidf::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod utils;
pub mod vectorizer;

/// TF-IDF Vectorizer
/// The top-level struct of this crate.
/// It owns the corpus statistics and the active vocabulary, turns each document
/// into a TF-IDF vector over that vocabulary, and scores documents against a
/// query document by cosine similarity.
///
/// `TFIDFVectorizer<E>` has one generic parameter:
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// Vectors are computed on demand; replacing the vocabulary takes effect on the
/// next call.
pub use vectorizer::TFIDFVectorizer;

/// Corpus for TF-IDF Vectorizer
/// Holds the segmented documents plus every statistic derived from them:
/// - per-document term frequency (bag of words)
/// - document frequency of each term
/// - inverse document frequency of each term clearing the df floor
///
/// Built once and immutable afterwards.
pub use vectorizer::corpus::Corpus;

/// Term Frequency structure
/// Counts term occurrences within a single document and converts them into a
/// bag of words using an engine's tf formula.
pub use vectorizer::term::{BagOfWords, TermFrequency};

/// Segmented document
/// The ordered term sequence left after tokenization and filtering.
pub use vectorizer::document::Document;

/// Vocabulary selection
/// `select_top_k` picks the k terms with the highest (or lowest) idf.
/// `SortOrder` and `TieBreak` control the ranking.
pub use vectorizer::vocabulary::{select_top_k, SortOrder, TieBreak, Vocabulary};

/// TF IDF Calculation Engine Trait
/// A trait that defines the behavior of a TF-IDF calculation engine.
///
/// By implementing this trait, you can plug different TF-IDF calculation strategies
/// into `TFIDFVectorizer<E>`.
/// - `DefaultTFIDFEngine`: tf = count / len, idf = log10(N / df)
/// - `SmoothTFIDFEngine`: same tf, idf = log10(N / (df + 1))
pub use vectorizer::tfidf::{DefaultTFIDFEngine, SmoothTFIDFEngine, TFIDFEngine};

/// Tokenization and filtering
/// `Tokenizer` is the seam for word segmentation. Closures `Fn(&str) -> Vec<String>`
/// implement it too.
pub use vectorizer::token::{
    filter_tokens, segment, CommandTokenizer, StopWords, Tokenizer, UnicodeWordTokenizer,
    WhitespaceTokenizer,
};

/// Similarity scoring
/// - `cosine_similarity`: cosine of two equal-length vectors, 0 if either is all zero
/// - `rank_similar`: lazy scan yielding documents above a threshold in corpus order
/// - `rank_by_score`: the same hits sorted by descending score
/// - `Hits`: list of (document index, score)
pub use vectorizer::evaluate::scoring::{cosine_similarity, rank_by_score, rank_similar, Hits};

pub use config::AnalysisConfig;
pub use error::{Error, Result};
