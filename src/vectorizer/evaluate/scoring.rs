use std::{fmt::Debug, iter::Enumerate, slice::Iter};

use num::Num;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    error::{Error, Result},
    utils::math::vector::{dot, norm_sq},
    vectorizer::{tfidf::TFIDFEngine, TFIDFVectorizer},
};

/// Cosine similarity
/// cosθ = A・B / (|A||B|)
///
/// Defined as 0 when either vector has zero norm (no weighted overlap is
/// treated as maximally dissimilar, not as undefined).
///
/// # Errors
/// * `DimensionMismatch` - the vectors have different lengths
pub fn cosine_similarity<N>(v1: &[N], v2: &[N]) -> Result<f64>
where
    N: Num + Copy + Into<f64>,
{
    if v1.len() != v2.len() {
        return Err(Error::DimensionMismatch {
            left: v1.len(),
            right: v2.len(),
        });
    }
    let norm_a = norm_sq(v1);
    let norm_b = norm_sq(v2);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    let score = dot(v1, v2) / (norm_a.sqrt() * norm_b.sqrt());
    // rounding can push |score| a hair past 1
    Ok(score.clamp(-1.0, 1.0))
}

/// Lazy threshold scan over corpus vectors
/// Yields `(document index, score)` for every vector scoring strictly above the
/// threshold, in corpus order. A length mismatch is yielded as an error item.
pub struct RankSimilar<'a, N> {
    query: &'a [N],
    corpus: Enumerate<Iter<'a, Vec<N>>>,
    threshold: f64,
}

impl<N> Iterator for RankSimilar<'_, N>
where
    N: Num + Copy + Into<f64>,
{
    type Item = Result<(usize, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        for (idx, vec) in self.corpus.by_ref() {
            match cosine_similarity(self.query, vec) {
                Ok(score) if score > self.threshold => return Some(Ok((idx, score))),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Documents above `threshold`, in corpus order
pub fn rank_similar<'a, N>(query: &'a [N], corpus_vectors: &'a [Vec<N>], threshold: f64) -> RankSimilar<'a, N>
where
    N: Num + Copy + Into<f64>,
{
    RankSimilar {
        query,
        corpus: corpus_vectors.iter().enumerate(),
        threshold,
    }
}

/// Documents above `threshold`, highest score first
/// Equal scores keep corpus order.
pub fn rank_by_score<N>(query: &[N], corpus_vectors: &[Vec<N>], threshold: f64) -> Result<Hits>
where
    N: Num + Copy + Into<f64>,
{
    let mut hits = rank_similar(query, corpus_vectors, threshold).collect::<Result<Hits>>()?;
    hits.sort_by_score();
    Ok(hits)
}

/// Structure to store search results
#[derive(Clone, Default, PartialEq)]
pub struct Hits {
    /// (Document index, Score)
    pub list: Vec<(usize, f64)>,
}

impl Hits {
    /// Create a new Hits instance
    pub fn new(list: Vec<(usize, f64)>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|(_, s)| !s.is_nan());
        // stable, so ties stay in corpus order
        self.list.sort_by(|a, b| b.1.total_cmp(&a.1));
        self
    }

    /// Sort results by ascending score
    pub fn sort_by_score_rev(&mut self) -> &mut Self {
        self.list.retain(|(_, s)| !s.is_nan());
        self.list.sort_by(|a, b| a.1.total_cmp(&b.1));
        self
    }

    /// Document indices in current order
    pub fn indices(&self) -> Vec<usize> {
        self.list.iter().map(|(i, _)| *i).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(usize, f64)> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl FromIterator<(usize, f64)> for Hits {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Hits::new(iter.into_iter().collect())
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for (idx, score) in &self.list {
                writeln!(f, "    {}: {:.6}", idx, score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Corpus-wide similarity against one of the corpus documents
impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Score every document against `query_index`
    /// Vectorization and scoring run in parallel; scores are returned in corpus order.
    pub fn similarity_scores(&self, query_index: usize) -> Result<Vec<f64>> {
        let query = self.vectorize(query_index)?;
        let vectors = self.vectorize_all()?;
        vectors
            .par_iter()
            .map(|vec| cosine_similarity(&query, vec))
            .collect()
    }

    /// Documents scoring above `threshold` against `query_index`, in corpus order
    /// The query document itself is included when it clears the threshold.
    pub fn similar_documents(&self, query_index: usize, threshold: f64) -> Result<Hits> {
        let hits: Hits = self
            .similarity_scores(query_index)?
            .into_iter()
            .enumerate()
            .filter(|(_, score)| *score > threshold)
            .collect();
        debug!(query_index, threshold, hits = hits.len(), "similarity scan finished");
        Ok(hits)
    }

    /// Same filter as `similar_documents`, highest score first
    pub fn ranked_documents(&self, query_index: usize, threshold: f64) -> Result<Hits> {
        let mut hits = self.similar_documents(query_index, threshold)?;
        hits.sort_by_score();
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, 0.0, 1.7, 2.2];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_symmetry_and_range() {
        let a = [1.0, -2.0, 0.5];
        let b = [-0.3, 4.0, 2.0];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));
        let neg: Vec<f64> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &neg).unwrap() + 1.0).abs() < EPS);
    }

    #[test]
    fn test_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 3.0]).unwrap().abs() < EPS);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = [0.0; 3];
        assert_eq!(cosine_similarity(&zero, &[1.0, 2.0, 3.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0, 3.0], &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity::<f64>(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { left: 2, right: 3 }));
    }

    #[test]
    fn test_generic_inputs() {
        assert!((cosine_similarity(&[1u8, 2, 3], &[1u8, 2, 3]).unwrap() - 1.0).abs() < EPS);
        assert!((cosine_similarity(&[1.0f32, 0.0], &[1.0f32, 1.0]).unwrap() - 0.5f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_rank_similar_keeps_corpus_order() {
        let query = vec![1.0, 0.0];
        let corpus = vec![
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.6, 0.5],
        ];
        let hits: Vec<(usize, f64)> = rank_similar(&query, &corpus, 0.7)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(hits.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![0, 2, 3]);

        let ranked = rank_by_score(&query, &corpus, 0.7).unwrap();
        assert_eq!(ranked.indices(), vec![2, 0, 3]);
    }

    #[test]
    fn test_rank_similar_is_strictly_greater() {
        let query = vec![1.0, 0.0];
        let corpus = vec![vec![1.0, 0.0]];
        assert_eq!(rank_similar(&query, &corpus, 1.0).count(), 0);
    }

    #[test]
    fn test_rank_similar_surfaces_mismatch() {
        let query = vec![1.0, 0.0];
        let corpus = vec![vec![1.0, 0.0], vec![1.0]];
        let items: Vec<_> = rank_similar(&query, &corpus, 0.5).collect();
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(Error::DimensionMismatch { .. })));
        assert!(rank_by_score(&query, &corpus, 0.5).is_err());
    }

    #[test]
    fn test_hits_sorting_and_debug() {
        let mut hits = Hits::new(vec![(0, 0.2), (1, f64::NAN), (2, 0.9), (3, 0.2)]);
        hits.sort_by_score();
        assert_eq!(hits.indices(), vec![2, 0, 3]);
        hits.sort_by_score_rev();
        assert_eq!(hits.indices(), vec![0, 3, 2]);
        assert_eq!(format!("{:?}", Hits::new(vec![(1, 0.5)])), "[(1, 0.5)]");
        assert!(format!("{:#?}", hits).starts_with("Hits ["));
    }
}
