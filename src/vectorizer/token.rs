use std::{
    collections::HashSet,
    io::{self, Write},
    process::{Command, Stdio},
    thread,
};

use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    error::{Error, Result},
    vectorizer::document::Document,
};

/// Word segmentation capability
/// Maps raw text to an ordered sequence of raw tokens.
/// Segmentation internals belong to the implementation; the corpus model only
/// relies on the order of the returned tokens.
///
/// Any `Fn(&str) -> Vec<String>` closure is a tokenizer, which keeps the core
/// testable with a stub.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String> + Send + Sync,
{
    #[inline]
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self(text))
    }
}

/// Splits on Unicode whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }
}

/// UAX#29 word boundaries
/// Punctuation and whitespace segments are dropped by `unicode_words`.
/// Han ideographs come out one per token, so a dictionary segmenter
/// (`CommandTokenizer`) is the better fit for Chinese or Japanese corpora.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeWordTokenizer;

impl Tokenizer for UnicodeWordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(text.unicode_words().map(str::to_string).collect())
    }
}

/// External segmenter process
/// The text is written to the command's stdin, tokens are read back from stdout.
///
/// Output format:
/// - tab separated lines (morphological analyzer style): first column is the token
/// - otherwise: whitespace separated tokens
/// - `EOS` lines and blank lines are skipped
#[derive(Debug, Clone)]
pub struct CommandTokenizer {
    program: String,
    args: Vec<String>,
}

impl CommandTokenizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from a command line split on whitespace
    /// Quoting is not understood; pass such arguments through `with_args`.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program).with_args(parts))
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn parse_output(stdout: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() || line == "EOS" {
                continue;
            }
            if line.contains('\t') {
                if let Some(tok) = line.split('\t').next() {
                    if !tok.is_empty() && tok != "EOS" {
                        tokens.push(tok.to_string());
                    }
                }
            } else {
                tokens.extend(line.split_whitespace().map(str::to_string));
            }
        }
        tokens
    }
}

impl Tokenizer for CommandTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Tokenizer(format!("failed to spawn {}: {e}", self.program)))?;
        // stdin is written from its own thread while stdout and stderr are drained
        let stdin = child.stdin.take();
        let (output, written) = thread::scope(|s| {
            let writer = stdin.map(|mut stdin| s.spawn(move || stdin.write_all(text.as_bytes())));
            let output = child.wait_with_output();
            let written = match writer {
                Some(handle) => handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked"))),
                None => Ok(()),
            };
            (output, written)
        });
        let output = output?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(Error::Tokenizer(format!(
                "{} exited with status {:?}: {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }
        written?;
        if !stderr.trim().is_empty() {
            warn!(program = %self.program, stderr = %stderr.trim(), "segmenter wrote to stderr");
        }
        Ok(Self::parse_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Stop word set
/// Entries are trimmed; blank entries are dropped. Order and duplicates are irrelevant.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn insert(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() {
            return false;
        }
        self.words.insert(word.to_string())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S> FromIterator<S> for StopWords
where
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut stop_words = StopWords::new();
        for word in iter {
            stop_words.insert(word.as_ref());
        }
        stop_words
    }
}

/// true when every char is a letter (digits, punctuation and mixed tokens fail)
/// Letter numbers such as `〇` or `Ⅻ` are alphabetic in Unicode but rejected here.
#[inline]
pub fn is_alphabetic_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_alphabetic() && !c.is_numeric())
}

/// Keep tokens that are not stop words and are purely alphabetic
/// Segmentation order is preserved.
pub fn filter_tokens<I, S>(tokens: I, stop_words: &StopWords) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str> + Into<String>,
{
    tokens
        .into_iter()
        .filter(|tok| {
            let tok = tok.as_ref();
            !stop_words.contains(tok) && is_alphabetic_token(tok)
        })
        .map(Into::into)
        .collect()
}

/// Segment raw text and filter it into a document
pub fn segment<T>(tokenizer: &T, text: &str, stop_words: &StopWords) -> Result<Document>
where
    T: Tokenizer + ?Sized,
{
    let raw = tokenizer.tokenize(text)?;
    Ok(Document::new(filter_tokens(raw, stop_words)))
}
