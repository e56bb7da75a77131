use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::tfidf::TFIDFEngine;

/// Normalized term frequencies of one document, in first-occurrence order
pub type BagOfWords = IndexMap<Box<str>, f64>;

/// TermFrequency struct
/// Counts term occurrences within one document.
/// Insertion order of the counts is the order of first occurrence.
///
/// # Examples
/// ```
/// use review_tfidf::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_terms(&["good", "hotel", "good"]);
///
/// assert_eq!(term_freq.term_count("good"), 2);
/// assert_eq!(term_freq.total_term_count(), 3);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TermFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    term_count: IndexMap<Box<str>, u64>,
    total_term_count: u64,
}

/// Implementation for adding terms
impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: IndexMap::new(),
            total_term_count: 0,
        }
    }

    /// Add a term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        match self.term_count.get_mut(term) {
            Some(count) => *count += 1,
            None => {
                self.term_count.insert(term.into(), 1);
            }
        }
        self.total_term_count += 1;
        self
    }

    /// Add multiple terms
    ///
    /// # Arguments
    /// * `terms` - Slice of terms to add
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

/// Read access
impl TermFrequency {
    /// Occurrence count of a term, 0 when absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_count.get(term).copied().unwrap_or(0)
    }

    /// Sum of all counts (document length)
    #[inline]
    pub fn total_term_count(&self) -> u64 {
        self.total_term_count
    }

    /// Number of distinct terms
    #[inline]
    pub fn term_num(&self) -> usize {
        self.term_count.len()
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.term_count.contains_key(term)
    }

    /// Distinct terms in first-occurrence order
    pub fn term_set_iter(&self) -> impl Iterator<Item = &str> {
        self.term_count.keys().map(|k| k.as_ref())
    }

    /// (term, count) pairs in first-occurrence order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count.iter().map(|(k, &v)| (k.as_ref(), v))
    }

    /// Normalized term frequencies
    /// An empty document yields an empty bag; no division is performed.
    pub fn bag_of_words<E>(&self) -> BagOfWords
    where
        E: TFIDFEngine,
    {
        if self.total_term_count == 0 {
            return BagOfWords::new();
        }
        self.term_count
            .iter()
            .map(|(term, &count)| (term.clone(), E::tf(count, self.total_term_count)))
            .collect()
    }
}

impl<S> FromIterator<S> for TermFrequency
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut freq = TermFrequency::new();
        for term in iter {
            freq.add_term(term.as_ref());
        }
        freq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::DefaultTFIDFEngine;

    #[test]
    fn test_counts_keep_first_occurrence_order() {
        let freq: TermFrequency = ["nice", "room", "nice", "bed"].into_iter().collect();
        assert_eq!(freq.term_count("nice"), 2);
        assert_eq!(freq.term_count("missing"), 0);
        assert_eq!(freq.term_num(), 3);
        assert_eq!(freq.term_set_iter().collect::<Vec<_>>(), vec!["nice", "room", "bed"]);
    }

    #[test]
    fn test_bag_of_words_sums_to_one() {
        let freq: TermFrequency = ["a", "b", "a", "c", "a", "b", "d"].into_iter().collect();
        let bag = freq.bag_of_words::<DefaultTFIDFEngine>();
        let sum: f64 = bag.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((bag["a"] - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_document_has_empty_bag() {
        let freq = TermFrequency::new();
        assert!(freq.bag_of_words::<DefaultTFIDFEngine>().is_empty());
    }
}
