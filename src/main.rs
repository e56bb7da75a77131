use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use review_tfidf::{
    config::{AnalysisConfig, DEFAULT_K, DEFAULT_MIN_DF, DEFAULT_THRESHOLD},
    loader::{self, DEFAULT_REVIEW_COLUMN},
    vectorizer::{document::Document, token::StopWords},
    CommandTokenizer, DefaultTFIDFEngine, Hits, SmoothTFIDFEngine, SortOrder, TFIDFEngine,
    TFIDFVectorizer, TieBreak, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer,
};

#[derive(Parser)]
#[command(name = "review-tfidf")]
#[command(version)]
#[command(about = "Find reviews similar to a chosen review using TF-IDF cosine similarity")]
struct Cli {
    /// CSV file with a header row
    #[arg(long)]
    reviews: PathBuf,

    /// Stop-word file, one word per line
    #[arg(long)]
    stop_words: PathBuf,

    /// Column holding the review text
    #[arg(long, default_value = DEFAULT_REVIEW_COLUMN)]
    column: String,

    /// Vocabulary size
    #[arg(short, long, default_value_t = DEFAULT_K)]
    k: usize,

    /// Report documents scoring strictly above this
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Minimum document frequency for a term to get an idf value
    #[arg(long, default_value_t = DEFAULT_MIN_DF)]
    min_df: u64,

    /// Index of the query review (after empty rows are dropped)
    #[arg(long, default_value_t = 0)]
    query: usize,

    /// Select the lowest-idf terms instead of the highest
    #[arg(long)]
    ascending: bool,

    #[arg(long, value_enum, default_value_t = TieBreakArg::Insertion)]
    tie_break: TieBreakArg,

    /// Use log10(N / (df + 1)) for idf
    #[arg(long)]
    smooth_idf: bool,

    /// Sort matches by descending score instead of corpus order
    #[arg(long)]
    ranked: bool,

    #[arg(long, value_enum, default_value_t = TokenizerArg::Unicode)]
    tokenizer: TokenizerArg,

    /// Segmenter command line for `--tokenizer command` (e.g. "jieba -d ' '")
    #[arg(long)]
    segmenter: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Also print the selected vocabulary with idf values
    #[arg(long)]
    show_vocabulary: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TieBreakArg {
    Insertion,
    Lexicographic,
}

#[derive(Clone, Copy, ValueEnum)]
enum TokenizerArg {
    Unicode,
    Whitespace,
    Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            k: self.k,
            threshold: self.threshold,
            min_df: self.min_df,
            query_index: self.query,
            order: if self.ascending {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            },
            tie_break: match self.tie_break {
                TieBreakArg::Insertion => TieBreak::Insertion,
                TieBreakArg::Lexicographic => TieBreak::Lexicographic,
            },
        }
    }

    fn tokenizer(&self) -> anyhow::Result<Box<dyn Tokenizer>> {
        Ok(match self.tokenizer {
            TokenizerArg::Unicode => Box::new(UnicodeWordTokenizer),
            TokenizerArg::Whitespace => Box::new(WhitespaceTokenizer),
            TokenizerArg::Command => {
                let Some(line) = self.segmenter.as_deref() else {
                    bail!("--tokenizer command requires --segmenter");
                };
                let Some(command) = CommandTokenizer::from_command_line(line) else {
                    bail!("--segmenter is empty");
                };
                Box::new(command)
            }
        })
    }
}

#[derive(Serialize)]
struct Match<'a> {
    index: usize,
    score: f64,
    tokens: &'a Document,
}

#[derive(Serialize)]
struct VocabularyEntry<'a> {
    term: &'a str,
    idf: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let tokenizer = cli.tokenizer()?;

    let reviews = loader::read_reviews(&cli.reviews, &cli.column)
        .with_context(|| format!("failed to read reviews from {}", cli.reviews.display()))?;
    let stop_words = loader::read_stop_words(&cli.stop_words)
        .with_context(|| format!("failed to read stop words from {}", cli.stop_words.display()))?;
    info!(reviews = reviews.len(), stop_words = stop_words.len(), "inputs loaded");

    if cli.smooth_idf {
        run::<SmoothTFIDFEngine>(&cli, &config, &reviews, tokenizer.as_ref(), &stop_words)
    } else {
        run::<DefaultTFIDFEngine>(&cli, &config, &reviews, tokenizer.as_ref(), &stop_words)
    }
}

fn run<E: TFIDFEngine>(
    cli: &Cli,
    config: &AnalysisConfig,
    reviews: &[String],
    tokenizer: &dyn Tokenizer,
    stop_words: &StopWords,
) -> anyhow::Result<()> {
    let mut vectorizer =
        TFIDFVectorizer::<E>::from_texts(reviews, tokenizer, stop_words, config.min_df)
            .context("failed to segment reviews")?;
    vectorizer.select_vocabulary(config.k, config.order, config.tie_break);

    let hits = if cli.ranked {
        vectorizer.ranked_documents(config.query_index, config.threshold)
    } else {
        vectorizer.similar_documents(config.query_index, config.threshold)
    }
    .with_context(|| format!("failed to score against review {}", config.query_index))?;
    info!(query = config.query_index, matches = hits.len(), "similarity search finished");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        Format::Text => write_text(&mut out, &vectorizer, &hits, cli.show_vocabulary)?,
        Format::Json => write_json(&mut out, &vectorizer, &hits, cli.show_vocabulary)?,
    }
    out.flush()?;
    Ok(())
}

fn write_text<E: TFIDFEngine>(
    out: &mut impl Write,
    vectorizer: &TFIDFVectorizer<E>,
    hits: &Hits,
    show_vocabulary: bool,
) -> anyhow::Result<()> {
    if show_vocabulary {
        for (term, idf) in vectorizer.vocabulary().iter() {
            match idf {
                Some(idf) => writeln!(out, "{term}\t{idf:.6}")?,
                None => writeln!(out, "{term}\t-")?,
            }
        }
        writeln!(out)?;
    }
    for &(index, score) in hits.iter() {
        let document = vectorizer.corpus().document(index)?;
        writeln!(out, "{score:.6}\t{document}")?;
    }
    Ok(())
}

/// A bare array of matches, or `{vocabulary, matches}` when the vocabulary is shown
fn write_json<E: TFIDFEngine>(
    out: &mut impl Write,
    vectorizer: &TFIDFVectorizer<E>,
    hits: &Hits,
    show_vocabulary: bool,
) -> anyhow::Result<()> {
    let mut matches = Vec::with_capacity(hits.len());
    for &(index, score) in hits.iter() {
        matches.push(Match {
            index,
            score,
            tokens: vectorizer.corpus().document(index)?,
        });
    }

    if show_vocabulary {
        let vocabulary: Vec<VocabularyEntry> = vectorizer
            .vocabulary()
            .iter()
            .map(|(term, idf)| VocabularyEntry { term, idf })
            .collect();
        serde_json::to_writer_pretty(
            &mut *out,
            &serde_json::json!({ "vocabulary": vocabulary, "matches": matches }),
        )?;
    } else {
        serde_json::to_writer_pretty(&mut *out, &matches)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["review-tfidf", "--reviews", "r.csv", "--stop-words", "s.txt"]);
        assert_eq!(cli.column, "review");
        assert_eq!(cli.config(), AnalysisConfig::default());
        assert!(cli.format == Format::Text);
    }

    #[test]
    fn test_command_tokenizer_needs_segmenter() {
        let cli = Cli::parse_from([
            "review-tfidf",
            "--reviews",
            "r.csv",
            "--stop-words",
            "s.txt",
            "--tokenizer",
            "command",
        ]);
        assert!(cli.tokenizer().is_err());
    }

    #[test]
    fn test_text_report() {
        let docs: Vec<Document> = ["good hotel nice room", "bad hotel dirty room", "good hotel nice room"]
            .iter()
            .map(|t| t.split_whitespace().collect())
            .collect();
        let mut vectorizer = TFIDFVectorizer::<DefaultTFIDFEngine>::build(docs, 1);
        vectorizer.select_vocabulary(10, SortOrder::Descending, TieBreak::Insertion);
        let hits = vectorizer.similar_documents(0, 0.99).unwrap();

        let mut buf = Vec::new();
        write_text(&mut buf, &vectorizer, &hits, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "1.000000\tgood hotel nice room\n1.000000\tgood hotel nice room\n");

        let mut buf = Vec::new();
        write_json(&mut buf, &vectorizer, &hits, false).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json[1]["index"], 2);
        assert_eq!(json[1]["tokens"][0], "good");
    }
}
