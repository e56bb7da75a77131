/// TF-IDF formulas
/// `Corpus` and `TFIDFVectorizer` are generic over this trait so the weighting
/// can be swapped without touching the pipeline.
pub trait TFIDFEngine: Send + Sync {
    /// Normalized term frequency
    /// # Arguments
    /// * `count` - occurrences of the term in the document
    /// * `doc_len` - number of terms in the document
    fn tf(count: u64, doc_len: u64) -> f64;

    /// Inverse document frequency
    /// # Arguments
    /// * `doc_num` - number of documents in the corpus
    /// * `doc_freq` - number of documents containing the term
    fn idf(doc_num: u64, doc_freq: u64) -> f64;
}

/// Textbook TF-IDF
/// tf = count / len, idf = log10(N / df)
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(count: u64, doc_len: u64) -> f64 {
        if doc_len == 0 {
            return 0.0;
        }
        count as f64 / doc_len as f64
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / doc_freq as f64).log10()
    }
}

/// Smoothed idf
/// idf = log10(N / (df + 1)); terms present in every document go slightly negative
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothTFIDFEngine;

impl TFIDFEngine for SmoothTFIDFEngine {
    #[inline]
    fn tf(count: u64, doc_len: u64) -> f64 {
        DefaultTFIDFEngine::tf(count, doc_len)
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        (doc_num as f64 / (doc_freq as f64 + 1.0)).log10()
    }
}
