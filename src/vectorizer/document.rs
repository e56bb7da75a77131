use std::fmt;

use serde::Serialize;

/// Document
/// ordered sequence of filtered terms taken from one review
/// immutable once built; addressed by its position in the corpus
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Document {
    terms: Vec<String>,
}

impl Document {
    pub fn new(terms: Vec<String>) -> Self {
        Document { terms }
    }

    /// terms in segmentation order
    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// number of terms, counting repeats
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// membership check on the term sequence
    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|s| s.as_str())
    }
}

impl<S> FromIterator<S> for Document
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Document::new(iter.into_iter().map(Into::into).collect())
    }
}

/// terms joined by a single space
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for term in &self.terms {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(term)?;
            first = false;
        }
        Ok(())
    }
}
