use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::corpus::InverseDocumentFrequency;

/// Direction of the idf sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// largest idf first (rarest terms)
    #[default]
    Descending,
    /// smallest idf first (most common terms)
    Ascending,
}

/// Order among terms with equal idf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// keep the idf mapping's insertion order (stable sort)
    #[default]
    Insertion,
    /// ascending by term
    Lexicographic,
}

/// Vocabulary
/// Ordered set of terms defining the dimensions of every feature vector.
/// Each term keeps the idf it was selected with; terms set through
/// `from_terms` carry none and are looked up at vectorization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    #[serde(with = "indexmap::map::serde_seq")]
    terms: IndexMap<Box<str>, Option<f64>>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit vocabulary, e.g. a hand-picked term list
    /// Duplicates keep their first position.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map: IndexMap<Box<str>, Option<f64>> = IndexMap::new();
        for term in terms {
            map.entry(Box::from(term.as_ref())).or_insert(None);
        }
        Self { terms: map }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// term at dimension `index`
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|(t, _)| &**t)
    }

    /// idf recorded at selection time
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.terms.get(term).copied().flatten()
    }

    /// terms in dimension order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(|t| &**t)
    }

    /// (term, idf at selection) in dimension order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.terms.iter().map(|(t, &idf)| (&**t, idf))
    }
}

/// Select the `k` terms with the largest (or smallest) idf
/// Returns every term when the idf mapping holds fewer than `k`.
/// Repeated calls on the same mapping give the same vocabulary.
pub fn select_top_k(
    idf: &InverseDocumentFrequency,
    k: usize,
    order: SortOrder,
    tie_break: TieBreak,
) -> Vocabulary {
    let mut ranked: Vec<(&Box<str>, f64)> = idf.iter().map(|(t, &v)| (t, v)).collect();
    // stable sort: with TieBreak::Insertion equal values keep mapping order
    ranked.sort_by(|a, b| {
        let by_value = match order {
            SortOrder::Descending => b.1.total_cmp(&a.1),
            SortOrder::Ascending => a.1.total_cmp(&b.1),
        };
        match tie_break {
            TieBreak::Insertion => by_value,
            TieBreak::Lexicographic => by_value.then_with(|| a.0.cmp(b.0)),
        }
    });
    let terms = ranked
        .into_iter()
        .take(k)
        .map(|(t, v)| (t.clone(), Some(v)))
        .collect();
    Vocabulary { terms }
}
