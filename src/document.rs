use crate::frequency::FrequencyTable;
use crate::tokenizer::AnnotatedToken;
use serde::{Deserialize, Serialize};

/// One enriched token, in document order.
///
/// The three counters are zero until [`crate::stats::compute_running_stats`]
/// has run over the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub index: usize,
    pub text: String,
    pub normalized_text: String,
    pub lemma: String,
    pub source: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub shape: String,
    pub is_alpha: bool,
    pub is_stop: bool,
    pub length: usize,
    pub corpus_frequency: f64,
    #[serde(default)]
    pub form_cumulative_count: usize,
    #[serde(default)]
    pub lemma_cumulative_count: usize,
    #[serde(default)]
    pub form_total_count: usize,
}

impl TokenRecord {
    pub fn from_annotated(
        index: usize,
        token: AnnotatedToken,
        source: &str,
        frequencies: &FrequencyTable,
    ) -> Self {
        let normalized_text = token.text.to_lowercase();
        let corpus_frequency = frequencies.lookup(&normalized_text);
        let length = token.text.chars().count();

        Self {
            index,
            text: token.text,
            normalized_text,
            lemma: token.lemma,
            source: source.to_string(),
            pos: token.pos,
            tag: token.tag,
            dep: token.dep,
            shape: token.shape,
            is_alpha: token.is_alpha,
            is_stop: token.is_stop,
            length,
            corpus_frequency,
            form_cumulative_count: 0,
            lemma_cumulative_count: 0,
            form_total_count: 0,
        }
    }
}

/// Enrich annotator output with lookups, keeping document order.
pub fn enrich(
    tokens: Vec<AnnotatedToken>,
    source: &str,
    frequencies: &FrequencyTable,
) -> Vec<TokenRecord> {
    tokens
        .into_iter()
        .enumerate()
        .map(|(i, token)| TokenRecord::from_annotated(i, token, source, frequencies))
        .collect()
}
