pub mod corpus;
pub mod document;
pub mod evaluate;
pub mod term;
pub mod tfidf;
pub mod token;
pub mod vocabulary;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::{
    error::{Error, Result},
    vectorizer::{
        corpus::Corpus,
        document::Document,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::{StopWords, Tokenizer},
        vocabulary::{select_top_k, SortOrder, TieBreak, Vocabulary},
    },
};

/// TF-IDF vectorizer over a fixed corpus
/// Owns the corpus statistics and the active vocabulary.
/// Vectors are computed on demand and never cached, so replacing the vocabulary
/// takes effect on the next call.
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<E = DefaultTFIDFEngine>
where
    E: TFIDFEngine,
{
    corpus: Corpus,
    vocabulary: Vocabulary,
    _marker: std::marker::PhantomData<E>,
}

impl<E> TFIDFVectorizer<E>
where
    E: TFIDFEngine,
{
    /// Wrap an already built corpus; the vocabulary starts empty
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            vocabulary: Vocabulary::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Build the corpus statistics with this vectorizer's engine
    pub fn build(documents: Vec<Document>, min_df: u64) -> Self {
        Self::new(Corpus::build::<E>(documents, min_df))
    }

    /// Segment raw texts, then `build`
    pub fn from_texts<T, S>(
        texts: &[S],
        tokenizer: &T,
        stop_words: &StopWords,
        min_df: u64,
    ) -> Result<Self>
    where
        T: Tokenizer + ?Sized,
        S: AsRef<str> + Sync,
    {
        Ok(Self::new(Corpus::from_texts::<E, T, S>(texts, tokenizer, stop_words, min_df)?))
    }

    #[inline]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.corpus.len()
    }

    /// Select the top-`k` idf terms and make them the active vocabulary
    pub fn select_vocabulary(&mut self, k: usize, order: SortOrder, tie_break: TieBreak) -> &Vocabulary {
        let vocabulary = select_top_k(self.corpus.inverse_document_frequencies(), k, order, tie_break);
        if vocabulary.is_empty() {
            warn!(
                k,
                min_df = self.corpus.min_df(),
                "empty vocabulary; every vector will be zero-length"
            );
        }
        info!(k, selected = vocabulary.len(), ?order, ?tie_break, "vocabulary selected");
        self.vocabulary = vocabulary;
        &self.vocabulary
    }

    /// Replace the active vocabulary
    pub fn set_vocabulary(&mut self, vocabulary: Vocabulary) {
        self.vocabulary = vocabulary;
    }

    /// tf × idf, with missing statistics counting as weight 0
    fn weight(&self, doc_index: usize, term: &str) -> Result<f64> {
        match self.corpus.tf_idf(doc_index, term) {
            Err(Error::NotFound { .. }) => Ok(0.0),
            other => other,
        }
    }

    /// Feature vector of document `doc_index`
    /// One weight per vocabulary term, in vocabulary order. A term absent from
    /// the document's term sequence weighs 0.
    ///
    /// # Errors
    /// * `OutOfRange` - no such document
    pub fn vectorize(&self, doc_index: usize) -> Result<Vec<f64>> {
        let document = self.corpus.document(doc_index)?;
        self.vocabulary
            .terms()
            .map(|term| {
                if document.contains(term) {
                    self.weight(doc_index, term)
                } else {
                    Ok(0.0)
                }
            })
            .collect()
    }

    /// Feature vectors of every document, in corpus order
    pub fn vectorize_all(&self) -> Result<Vec<Vec<f64>>> {
        (0..self.corpus.len())
            .into_par_iter()
            .map(|doc_index| self.vectorize(doc_index))
            .collect()
    }
}
