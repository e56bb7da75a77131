use std::collections::HashMap;

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    vectorizer::{
        document::Document,
        term::{BagOfWords, TermFrequency},
        tfidf::TFIDFEngine,
        token::{segment, StopWords, Tokenizer},
    },
};

/// term -> number of documents containing it, in first-appearance order
pub type DocumentFrequency = IndexMap<Box<str>, u64>;
/// term -> idf, only for terms at or above the df floor
pub type InverseDocumentFrequency = IndexMap<Box<str>, f64>;

/// Segment raw texts into documents
/// Empty texts produce no document. Whitespace-only texts become empty
/// documents and still count towards N.
/// Texts are segmented in parallel; the result keeps input order.
pub fn segment_corpus<T, S>(texts: &[S], tokenizer: &T, stop_words: &StopWords) -> Result<Vec<Document>>
where
    T: Tokenizer + ?Sized,
    S: AsRef<str> + Sync,
{
    let documents: Vec<Document> = texts
        .par_iter()
        .map(|text| text.as_ref())
        .filter(|text| !text.is_empty())
        .map(|text| segment(tokenizer, text, stop_words))
        .collect::<Result<_>>()?;
    debug!(
        texts = texts.len(),
        documents = documents.len(),
        "segmented corpus"
    );
    Ok(documents)
}

/// Per-document bag-of-words
/// raw count / document length; an empty document gets an empty bag
pub fn compute_term_frequencies<E>(documents: &[Document]) -> Vec<BagOfWords>
where
    E: TFIDFEngine,
{
    documents
        .par_iter()
        .map(|doc| doc.iter().collect::<TermFrequency>().bag_of_words::<E>())
        .collect()
}

/// (documents containing the term, first position seen as (doc, slot in bag))
type Seen<'a> = HashMap<&'a str, (u64, (usize, usize))>;

fn fold_bag<'a>(mut acc: Seen<'a>, (doc_idx, bag): (usize, &'a BagOfWords)) -> Seen<'a> {
    for (pos, term) in bag.keys().enumerate() {
        let first = (doc_idx, pos);
        acc.entry(&**term)
            .and_modify(|(count, seen)| {
                *count += 1;
                if first < *seen {
                    *seen = first;
                }
            })
            .or_insert((1, first));
    }
    acc
}

fn merge_seen<'a>(mut a: Seen<'a>, b: Seen<'a>) -> Seen<'a> {
    for (term, (count, first)) in b {
        a.entry(term)
            .and_modify(|(c, seen)| {
                *c += count;
                if first < *seen {
                    *seen = first;
                }
            })
            .or_insert((count, first));
    }
    a
}

/// Corpus-wide document frequencies
/// Each bag contributes its key set once, so repeats inside a document count once.
/// Partial counts are merged with an associative reduce, then ordered by first
/// appearance so the result matches a sequential pass.
pub fn compute_document_frequencies(bags: &[BagOfWords]) -> DocumentFrequency {
    let seen = bags
        .par_iter()
        .enumerate()
        .fold(Seen::new, fold_bag)
        .reduce(Seen::new, merge_seen);
    let mut entries: Vec<_> = seen.into_iter().collect();
    entries.sort_unstable_by_key(|(_, (_, first))| *first);
    entries
        .into_iter()
        .map(|(term, (count, _))| (Box::from(term), count))
        .collect()
}

/// idf for every term whose df reaches `min_df`
/// Terms below the floor are left out, so they never reach the vocabulary.
pub fn compute_inverse_document_frequencies<E>(
    df: &DocumentFrequency,
    total_documents: u64,
    min_df: u64,
) -> InverseDocumentFrequency
where
    E: TFIDFEngine,
{
    df.iter()
        .filter(|(_, &doc_freq)| doc_freq >= min_df)
        .map(|(term, &doc_freq)| (term.clone(), E::idf(total_documents, doc_freq)))
        .collect()
}

/// Corpus model
/// Holds the documents and their tf/df/idf statistics.
/// Everything is computed once in `build` and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Corpus {
    documents: Vec<Document>,
    term_frequencies: Vec<BagOfWords>,
    document_frequencies: DocumentFrequency,
    inverse_document_frequencies: InverseDocumentFrequency,
    min_df: u64,
}

impl Corpus {
    /// Compute tf, df and idf over the given documents
    /// Every document counts towards N, including ones with no terms.
    pub fn build<E>(documents: Vec<Document>, min_df: u64) -> Self
    where
        E: TFIDFEngine,
    {
        let term_frequencies = compute_term_frequencies::<E>(&documents);
        let document_frequencies = compute_document_frequencies(&term_frequencies);
        let inverse_document_frequencies = compute_inverse_document_frequencies::<E>(
            &document_frequencies,
            documents.len() as u64,
            min_df,
        );
        info!(
            documents = documents.len(),
            terms = document_frequencies.len(),
            idf_terms = inverse_document_frequencies.len(),
            min_df,
            "corpus statistics computed"
        );
        Self {
            documents,
            term_frequencies,
            document_frequencies,
            inverse_document_frequencies,
            min_df,
        }
    }

    /// Segment raw texts, then `build`
    pub fn from_texts<E, T, S>(
        texts: &[S],
        tokenizer: &T,
        stop_words: &StopWords,
        min_df: u64,
    ) -> Result<Self>
    where
        E: TFIDFEngine,
        T: Tokenizer + ?Sized,
        S: AsRef<str> + Sync,
    {
        let documents = segment_corpus(texts, tokenizer, stop_words)?;
        Ok(Self::build::<E>(documents, min_df))
    }

    #[inline]
    fn check_index(&self, doc_index: usize) -> Result<()> {
        if doc_index >= self.documents.len() {
            return Err(Error::OutOfRange {
                index: doc_index,
                len: self.documents.len(),
            });
        }
        Ok(())
    }

    /// Normalized frequency of `term` in document `doc_index`
    ///
    /// # Errors
    /// * `OutOfRange` - no such document
    /// * `NotFound` - the term does not occur in the document
    pub fn term_frequency(&self, doc_index: usize, term: &str) -> Result<f64> {
        self.check_index(doc_index)?;
        self.term_frequencies[doc_index]
            .get(term)
            .copied()
            .ok_or_else(|| Error::NotFound {
                doc_index: Some(doc_index),
                term: term.to_string(),
            })
    }

    /// idf of `term`
    ///
    /// # Errors
    /// * `NotFound` - unknown term, or df below the floor
    pub fn inverse_document_frequency(&self, term: &str) -> Result<f64> {
        self.inverse_document_frequencies
            .get(term)
            .copied()
            .ok_or_else(|| Error::NotFound {
                doc_index: None,
                term: term.to_string(),
            })
    }

    /// tf × idf of `term` in document `doc_index`; fails like the two lookups
    pub fn tf_idf(&self, doc_index: usize, term: &str) -> Result<f64> {
        Ok(self.term_frequency(doc_index, term)? * self.inverse_document_frequency(term)?)
    }

    pub fn document(&self, doc_index: usize) -> Result<&Document> {
        self.check_index(doc_index)?;
        Ok(&self.documents[doc_index])
    }

    #[inline]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    #[inline]
    pub fn term_frequencies(&self) -> &[BagOfWords] {
        &self.term_frequencies
    }

    #[inline]
    pub fn document_frequencies(&self) -> &DocumentFrequency {
        &self.document_frequencies
    }

    #[inline]
    pub fn inverse_document_frequencies(&self) -> &InverseDocumentFrequency {
        &self.inverse_document_frequencies
    }

    pub fn document_frequency(&self, term: &str) -> Option<u64> {
        self.document_frequencies.get(term).copied()
    }

    #[inline]
    pub fn min_df(&self) -> u64 {
        self.min_df
    }

    /// Number of documents (N)
    #[inline]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::tfidf::{DefaultTFIDFEngine, SmoothTFIDFEngine};

    fn doc(text: &str) -> Document {
        text.split_whitespace().collect()
    }

    fn hotel_corpus(min_df: u64) -> Corpus {
        Corpus::build::<DefaultTFIDFEngine>(
            vec![
                doc("good hotel nice room"),
                doc("bad hotel dirty room"),
                doc("good hotel nice room"),
            ],
            min_df,
        )
    }

    #[test]
    fn test_document_frequencies() {
        let corpus = hotel_corpus(1);
        let df: Vec<(&str, u64)> = corpus
            .document_frequencies()
            .iter()
            .map(|(t, &c)| (&**t, c))
            .collect();
        assert_eq!(
            df,
            vec![("good", 2), ("hotel", 3), ("nice", 2), ("room", 3), ("bad", 1), ("dirty", 1)]
        );
    }

    #[test]
    fn test_repeated_term_counts_once_for_df() {
        let corpus = Corpus::build::<DefaultTFIDFEngine>(vec![doc("room room room"), doc("bed")], 1);
        assert_eq!(corpus.document_frequency("room"), Some(1));
        assert!((corpus.term_frequency(0, "room").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_idf_values_and_floor() {
        let corpus = hotel_corpus(1);
        assert_eq!(corpus.inverse_document_frequency("hotel").unwrap(), 0.0);
        assert_eq!(corpus.inverse_document_frequency("bad").unwrap(), (3.0f64 / 1.0).log10());
        assert_eq!(corpus.inverse_document_frequency("good").unwrap(), (3.0f64 / 2.0).log10());

        let floored = hotel_corpus(2);
        assert!(floored.inverse_document_frequency("good").is_ok());
        assert!(matches!(
            floored.inverse_document_frequency("bad"),
            Err(Error::NotFound { doc_index: None, .. })
        ));
        assert_eq!(floored.inverse_document_frequencies().len(), 4);
    }

    #[test]
    fn test_idf_matches_formula_for_every_term() {
        let corpus = hotel_corpus(2);
        let n = corpus.len() as f64;
        for (term, &df) in corpus.document_frequencies() {
            match corpus.inverse_document_frequencies().get(term) {
                Some(&idf) => {
                    assert!(df >= 2);
                    assert_eq!(idf, (n / df as f64).log10());
                }
                None => assert!(df < 2),
            }
        }
    }

    #[test]
    fn test_empty_documents_count_towards_n() {
        let corpus = Corpus::build::<DefaultTFIDFEngine>(
            vec![doc("clean"), Document::default(), doc("clean quiet")],
            1,
        );
        assert_eq!(corpus.len(), 3);
        assert!(corpus.term_frequencies()[1].is_empty());
        assert_eq!(corpus.inverse_document_frequency("clean").unwrap(), (3.0f64 / 2.0).log10());
    }

    #[test]
    fn test_bags_sum_to_one() {
        let corpus = Corpus::build::<DefaultTFIDFEngine>(
            vec![doc("a b a c"), doc("x y z x x w q"), doc("solo"), Document::default()],
            1,
        );
        for (i, bag) in corpus.term_frequencies().iter().enumerate() {
            if corpus.documents()[i].is_empty() {
                continue;
            }
            let sum: f64 = bag.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "document {i} sums to {sum}");
        }
    }

    #[test]
    fn test_lookup_failures() {
        let corpus = hotel_corpus(1);
        assert!(matches!(
            corpus.term_frequency(0, "bad"),
            Err(Error::NotFound { doc_index: Some(0), .. })
        ));
        assert!(matches!(
            corpus.term_frequency(3, "good"),
            Err(Error::OutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(corpus.document(9), Err(Error::OutOfRange { .. })));
        assert!((corpus.tf_idf(1, "bad").unwrap() - 0.25 * 3f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_df_reduction_matches_sequential_order() {
        let documents: Vec<Document> = (0..500)
            .map(|i| doc(&format!("t{} common t{} shared{}", i % 37, i % 11, i % 5)))
            .collect();
        let bags = compute_term_frequencies::<DefaultTFIDFEngine>(&documents);
        let parallel = compute_document_frequencies(&bags);

        let mut sequential = DocumentFrequency::new();
        for bag in &bags {
            for term in bag.keys() {
                *sequential.entry(term.clone()).or_insert(0) += 1;
            }
        }
        assert_eq!(
            parallel.iter().collect::<Vec<_>>(),
            sequential.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_segment_corpus_skips_only_empty_texts() {
        let texts = vec!["good hotel", "", "   ", "bad, room 12"];
        let stop = StopWords::new();
        let tokenizer = |t: &str| t.split_whitespace().map(str::to_string).collect::<Vec<_>>();
        let docs = segment_corpus(&texts, &tokenizer, &stop).unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].terms(), &["good", "hotel"]);
        assert!(docs[1].is_empty());
        assert_eq!(docs[2].terms(), &["room"]);
    }

    #[test]
    fn test_whitespace_text_counts_towards_n() {
        let texts = vec!["clean room", "   ", "clean bed"];
        let corpus = Corpus::from_texts::<DefaultTFIDFEngine, _, _>(
            &texts,
            &crate::vectorizer::token::WhitespaceTokenizer,
            &StopWords::new(),
            1,
        )
        .unwrap();
        assert_eq!(corpus.len(), 3);
        let expected = (3.0f64 / 2.0).log10();
        assert!((corpus.inverse_document_frequency("clean").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_engine_keeps_common_terms_below_zero() {
        let corpus = Corpus::build::<SmoothTFIDFEngine>(
            vec![doc("good hotel"), doc("bad hotel")],
            1,
        );
        assert!(corpus.inverse_document_frequency("hotel").unwrap() < 0.0);
    }
}
