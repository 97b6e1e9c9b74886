use crate::error::AnalysisResult;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

lazy_static::lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "a", "about", "above", "after", "again", "against", "all", "am", "an", "and",
            "any", "are", "aren't", "as", "at", "be", "because", "been", "before", "being",
            "below", "between", "both", "but", "by", "can't", "cannot", "could", "couldn't",
            "did", "didn't", "do", "does", "doesn't", "doing", "don't", "down", "during",
            "each", "few", "for", "from", "further", "had", "hadn't", "has", "hasn't",
            "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
            "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i",
            "i'd", "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's",
            "its", "itself", "let's", "me", "more", "most", "mustn't", "my", "myself",
            "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other", "ought",
            "our", "ours", "ourselves", "out", "over", "own", "same", "shan't", "she",
            "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such",
            "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
            "then", "there", "there's", "these", "they", "they'd", "they'll", "they're",
            "they've", "this", "those", "through", "to", "too", "under", "until", "up",
            "very", "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were",
            "weren't", "what", "what's", "when", "when's", "where", "where's", "which",
            "while", "who", "who's", "whom", "why", "why's", "with", "won't", "would",
            "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your", "yours",
            "yourself", "yourselves",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// A token as handed over by an annotator, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub shape: String,
    pub is_alpha: bool,
    pub is_stop: bool,
}

/// Tokenization and tagging capability.
///
/// Implementations must return tokens in document order and must be
/// deterministic for a given input.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> AnalysisResult<Vec<AnnotatedToken>>;
}

/// Collapse every run of line breaks into a single space.
///
/// `\r\n`, `\r` and `\n` all count as line breaks. Nothing else is touched.
pub fn normalize_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;

    for c in text.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }

    out
}

/// Orthographic shape: `X` upper, `x` lower, `d` digit, other chars kept.
/// Runs of the same shape character are capped at four.
pub fn word_shape(text: &str) -> String {
    let mut shape = String::with_capacity(text.len());
    let mut last = None;
    let mut run = 0;

    for c in text.chars() {
        let s = if c.is_uppercase() {
            'X'
        } else if c.is_lowercase() {
            'x'
        } else if c.is_numeric() {
            'd'
        } else {
            c
        };

        if Some(s) == last {
            run += 1;
        } else {
            last = Some(s);
            run = 1;
        }
        if run <= 4 {
            shape.push(s);
        }
    }

    shape
}

/// Deterministic rule-based annotator built on Unicode word boundaries.
///
/// It has no statistical model: POS tags are coarse (`PUNCT`, `NUM`, `SYM`,
/// `X`) and the lemma is the English stem of the lowercased word.
pub struct RuleAnnotator {
    stemmer: Stemmer,
}

impl RuleAnnotator {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Split text into word and punctuation segments, dropping whitespace
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_word_bounds()
            .filter(|s| !s.trim().is_empty())
            .collect()
    }

    fn coarse_pos(segment: &str) -> &'static str {
        if segment.chars().all(char::is_alphabetic) {
            "X"
        } else if segment.chars().any(char::is_numeric)
            && segment.chars().all(|c| c.is_numeric() || c == '.' || c == ',')
        {
            "NUM"
        } else if segment.chars().all(|c| c.is_ascii_punctuation() && !"$%&+<=>^|~#@".contains(c))
        {
            "PUNCT"
        } else if segment.chars().any(char::is_alphanumeric) {
            "X"
        } else {
            "SYM"
        }
    }

    fn annotate_segment(&self, segment: &str) -> AnnotatedToken {
        let lower = segment.to_lowercase();
        let is_alpha = segment.chars().all(char::is_alphabetic);
        let lemma = if is_alpha {
            self.stemmer.stem(&lower).to_string()
        } else {
            lower.clone()
        };
        let pos = Self::coarse_pos(segment);

        AnnotatedToken {
            text: segment.to_string(),
            lemma,
            pos: pos.to_string(),
            tag: pos.to_string(),
            dep: "dep".to_string(),
            shape: word_shape(segment),
            is_alpha,
            is_stop: STOPWORDS.contains(lower.as_str()),
        }
    }
}

impl Default for RuleAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator for RuleAnnotator {
    fn annotate(&self, text: &str) -> AnalysisResult<Vec<AnnotatedToken>> {
        Ok(self
            .tokenize(text)
            .into_iter()
            .map(|segment| self.annotate_segment(segment))
            .collect())
    }
}
