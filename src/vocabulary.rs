use crate::document::TokenRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Classifier parameters
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Aggregates strictly below this corpus frequency are novel candidates
    pub rarity_threshold: f64,
    /// Maximum rows per extract
    pub top_k: usize,
    /// Content words must be strictly longer than this
    pub min_length: usize,
    /// Multiplier turning a corpus frequency into a per-million rate
    pub per_million_scale: f64,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            rarity_threshold: 100.0,
            top_k: 25,
            min_length: 2,
            per_million_scale: 1000.0,
        }
    }
}

/// Per-form counts over the content words of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyAggregate {
    pub normalized_text: String,
    pub document_frequency: usize,
    pub corpus_frequency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingCriterion {
    /// Ascending corpus frequency
    RarestFirst,
    /// Descending document frequency
    MostFrequentFirst,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractRow {
    pub normalized_text: String,
    pub document_frequency: usize,
    pub corpus_frequency: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_per_million: Option<f64>,
}

/// Ranked, length-capped list of aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyExtract {
    pub criterion: RankingCriterion,
    pub rows: Vec<ExtractRow>,
}

impl VocabularyExtract {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn words(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.normalized_text.as_str()).collect()
    }
}

pub fn is_content_word(record: &TokenRecord, options: &ClassifierOptions) -> bool {
    !record.is_stop && record.is_alpha && record.length > options.min_length
}

/// Group content words by normalized form, ordered by form.
pub fn aggregate(records: &[TokenRecord], options: &ClassifierOptions) -> Vec<VocabularyAggregate> {
    let mut groups: BTreeMap<&str, VocabularyAggregate> = BTreeMap::new();

    for record in records.iter().filter(|r| is_content_word(r, options)) {
        groups
            .entry(record.normalized_text.as_str())
            .or_insert_with(|| VocabularyAggregate {
                normalized_text: record.normalized_text.clone(),
                document_frequency: 0,
                corpus_frequency: record.corpus_frequency,
            })
            .document_frequency += 1;
    }

    groups.into_values().collect()
}

fn lexical(a: &VocabularyAggregate, b: &VocabularyAggregate) -> Ordering {
    a.normalized_text.cmp(&b.normalized_text)
}

// total_cmp orders -0.0 below 0.0; both must tie
fn rarity(a: &VocabularyAggregate, b: &VocabularyAggregate) -> Ordering {
    (a.corpus_frequency + 0.0).total_cmp(&(b.corpus_frequency + 0.0))
}

/// Rarest words in the reference corpus, below the rarity threshold
pub fn novel_extract(
    aggregates: &[VocabularyAggregate],
    options: &ClassifierOptions,
) -> VocabularyExtract {
    let mut candidates: Vec<&VocabularyAggregate> = aggregates
        .iter()
        .filter(|a| a.corpus_frequency < options.rarity_threshold)
        .collect();

    candidates.sort_by(|a, b| rarity(a, b).then_with(|| lexical(a, b)));

    let rows = candidates
        .into_iter()
        .take(options.top_k)
        .map(|a| ExtractRow {
            normalized_text: a.normalized_text.clone(),
            document_frequency: a.document_frequency,
            corpus_frequency: a.corpus_frequency,
            frequency_per_million: Some(a.corpus_frequency * options.per_million_scale),
        })
        .collect();

    VocabularyExtract {
        criterion: RankingCriterion::RarestFirst,
        rows,
    }
}

/// Most repeated content words within the document
pub fn salient_extract(
    aggregates: &[VocabularyAggregate],
    options: &ClassifierOptions,
) -> VocabularyExtract {
    let mut candidates: Vec<&VocabularyAggregate> = aggregates.iter().collect();

    candidates.sort_by(|a, b| {
        b.document_frequency
            .cmp(&a.document_frequency)
            .then_with(|| lexical(a, b))
    });

    let rows = candidates
        .into_iter()
        .take(options.top_k)
        .map(|a| ExtractRow {
            normalized_text: a.normalized_text.clone(),
            document_frequency: a.document_frequency,
            corpus_frequency: a.corpus_frequency,
            frequency_per_million: None,
        })
        .collect();

    VocabularyExtract {
        criterion: RankingCriterion::MostFrequentFirst,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str, is_alpha: bool, is_stop: bool, freq: f64) -> TokenRecord {
        TokenRecord {
            index: 0,
            text: text.to_string(),
            normalized_text: text.to_lowercase(),
            lemma: text.to_lowercase(),
            source: "doc".to_string(),
            pos: "X".to_string(),
            tag: "X".to_string(),
            dep: "dep".to_string(),
            shape: "xxx".to_string(),
            is_alpha,
            is_stop,
            length: text.chars().count(),
            corpus_frequency: freq,
            form_cumulative_count: 0,
            lemma_cumulative_count: 0,
            form_total_count: 0,
        }
    }

    fn agg(text: &str, doc: usize, corpus: f64) -> VocabularyAggregate {
        VocabularyAggregate {
            normalized_text: text.to_string(),
            document_frequency: doc,
            corpus_frequency: corpus,
        }
    }

    #[test]
    fn test_content_filter_and_grouping() {
        let records = vec![
            record("The", true, true, 0.0),
            record("Cat", true, false, 50.0),
            record("ox", true, false, 1.0),
            record("cat", true, false, 50.0),
            record("42nd", false, false, 3.0),
            record(".", false, false, 0.0),
        ];
        let aggregates = aggregate(&records, &ClassifierOptions::default());
        assert_eq!(aggregates, vec![agg("cat", 2, 50.0)]);
    }

    #[test]
    fn test_novel_extract_threshold_and_scaling() {
        let aggregates = vec![
            agg("cat", 2, 50.0),
            agg("ran", 1, 0.2),
            agg("house", 3, 100.0),
            agg("sat", 1, 120.0),
        ];
        let extract = novel_extract(&aggregates, &ClassifierOptions::default());

        assert_eq!(extract.criterion, RankingCriterion::RarestFirst);
        assert_eq!(extract.words(), vec!["ran", "cat"]);
        assert_eq!(extract.rows[0].frequency_per_million, Some(200.0));
        assert_eq!(extract.rows[1].frequency_per_million, Some(50_000.0));
    }

    #[test]
    fn test_salient_extract_ordering() {
        let aggregates = vec![
            agg("apple", 1, 10.0),
            agg("zebra", 4, 500.0),
            agg("mango", 4, 1.0),
            agg("kiwi", 2, 1000.0),
        ];
        let extract = salient_extract(&aggregates, &ClassifierOptions::default());

        assert_eq!(extract.criterion, RankingCriterion::MostFrequentFirst);
        assert_eq!(extract.words(), vec!["mango", "zebra", "kiwi", "apple"]);
        assert!(extract.rows.iter().all(|r| r.frequency_per_million.is_none()));
    }

    #[test]
    fn test_ties_break_lexically_regardless_of_input_order() {
        let forward = vec![agg("beta", 1, 0.0), agg("alpha", 1, 0.0), agg("gamma", 1, 0.0)];
        let mut backward = forward.clone();
        backward.reverse();

        let options = ClassifierOptions::default();
        for input in [&forward, &backward] {
            assert_eq!(novel_extract(input, &options).words(), vec!["alpha", "beta", "gamma"]);
            assert_eq!(salient_extract(input, &options).words(), vec!["alpha", "beta", "gamma"]);
        }
    }

    #[test]
    fn test_signed_zero_frequencies_tie_lexically() {
        let table = crate::frequency::FrequencyTable::parse("zebra -0");
        let aggregates = vec![
            agg("zebra", 1, table.lookup("zebra")),
            agg("apple", 1, table.lookup("apple")),
        ];
        let options = ClassifierOptions::default();
        assert_eq!(novel_extract(&aggregates, &options).words(), vec!["apple", "zebra"]);

        // aggregates built by hand can still carry a negative zero
        let raw = vec![agg("zebra", 1, -0.0), agg("apple", 1, 0.0)];
        assert_eq!(novel_extract(&raw, &options).words(), vec!["apple", "zebra"]);
    }

    #[test]
    fn test_extracts_are_capped_at_top_k() {
        let aggregates: Vec<_> = (0..40)
            .map(|i| agg(&format!("word{:02}", i), i % 5 + 1, i as f64))
            .collect();
        let options = ClassifierOptions::default();

        let novel = novel_extract(&aggregates, &options);
        let salient = salient_extract(&aggregates, &options);

        assert_eq!(novel.len(), 25);
        assert_eq!(salient.len(), 25);
        assert_eq!(novel.rows[0].normalized_text, "word00");
        assert!(novel
            .rows
            .windows(2)
            .all(|w| w[0].corpus_frequency <= w[1].corpus_frequency));
        assert!(salient
            .rows
            .windows(2)
            .all(|w| w[0].document_frequency >= w[1].document_frequency));
    }

    #[test]
    fn test_no_content_words_gives_empty_extracts() {
        let records = vec![record("the", true, true, 0.0), record(",", false, false, 0.0)];
        let options = ClassifierOptions::default();
        let aggregates = aggregate(&records, &options);

        assert!(aggregates.is_empty());
        assert!(novel_extract(&aggregates, &options).is_empty());
        assert!(salient_extract(&aggregates, &options).is_empty());
    }
}
