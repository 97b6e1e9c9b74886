use crate::chapters::{extract_chapter_headers, ChapterHeader};
use crate::document::{enrich, TokenRecord};
use crate::error::{AnalysisError, AnalysisResult};
use crate::export::{chapters_table, extract_table, tokens_table, Table};
use crate::frequency::FrequencyTable;
use crate::stats::{compute_running_stats, form_tally};
use crate::tokenizer::{normalize_line_breaks, Annotator, RuleAnnotator};
use crate::vocabulary::{
    aggregate, novel_extract, salient_extract, ClassifierOptions, VocabularyExtract,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Source label extensions the analyzer accepts; labels without one pass too
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["txt", "text", "md"];

/// Export names of the tables in [`AnalysisTables`]
pub const TABLE_NAMES: [&str; 4] = ["tokens", "novel", "salient", "chapters"];

/// Result of analysing one document
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub source: String,
    pub records: Vec<TokenRecord>,
    pub novel: VocabularyExtract,
    pub salient: VocabularyExtract,
    pub chapters: Vec<ChapterHeader>,
}

/// The exportable tables of an analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisTables {
    pub tokens: Table,
    pub novel: Table,
    pub salient: Table,
    pub chapters: Table,
}

impl AnalysisTables {
    /// Look a table up by its export name
    pub fn get(&self, name: &str) -> Option<&Table> {
        match name {
            "tokens" => Some(&self.tokens),
            "novel" => Some(&self.novel),
            "salient" => Some(&self.salient),
            "chapters" => Some(&self.chapters),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        [&self.tokens, &self.novel, &self.salient, &self.chapters].into_iter()
    }
}

impl Analysis {
    pub fn tables(&self) -> AnalysisTables {
        AnalysisTables {
            tokens: tokens_table(&self.records),
            novel: extract_table(&self.novel),
            salient: extract_table(&self.salient),
            chapters: chapters_table(&self.chapters),
        }
    }
}

/// Per-document vocabulary analysis over a shared reference table.
///
/// The analyzer holds no per-document state, so one instance can serve
/// concurrent requests.
pub struct Analyzer {
    frequencies: Arc<FrequencyTable>,
    annotator: Box<dyn Annotator>,
    options: ClassifierOptions,
}

impl Analyzer {
    pub fn new(frequencies: Arc<FrequencyTable>, annotator: Box<dyn Annotator>) -> Self {
        Self {
            frequencies,
            annotator,
            options: ClassifierOptions::default(),
        }
    }

    /// Analyzer using the built-in rule annotator
    pub fn with_rule_annotator(frequencies: Arc<FrequencyTable>) -> Self {
        Self::new(frequencies, Box::new(RuleAnnotator::new()))
    }

    pub fn with_options(mut self, options: ClassifierOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate raw upload bytes, then analyse them.
    pub fn analyze_bytes(&self, bytes: &[u8], source: &str) -> AnalysisResult<Analysis> {
        check_format(source)?;
        let text = std::str::from_utf8(bytes).map_err(|_| AnalysisError::InvalidEncoding {
            source_label: source.to_string(),
        })?;
        self.run(text, source)
    }

    /// Run the full pipeline over one document.
    pub fn analyze(&self, text: &str, source: &str) -> AnalysisResult<Analysis> {
        check_format(source)?;
        self.run(text, source)
    }

    fn run(&self, text: &str, source: &str) -> AnalysisResult<Analysis> {
        let _span = tracing::info_span!("analyze", source = %source).entered();
        let start = Instant::now();

        // headings are matched on the raw text, before line breaks collapse
        let chapters = extract_chapter_headers(text);

        let shaped = normalize_line_breaks(text);
        let tokens = self.annotator.annotate(&shaped)?;

        let mut records = enrich(tokens, source, &self.frequencies);
        compute_running_stats(&mut records);

        let aggregates = aggregate(&records, &self.options);
        let novel = novel_extract(&aggregates, &self.options);
        let salient = salient_extract(&aggregates, &self.options);

        tracing::info!(
            tokens = records.len(),
            distinct_forms = form_tally(&records).len(),
            content_forms = aggregates.len(),
            novel = novel.len(),
            salient = salient.len(),
            chapters = chapters.len(),
            "Analyzed document in {:?}",
            start.elapsed()
        );

        Ok(Analysis {
            source: source.to_string(),
            records,
            novel,
            salient,
            chapters,
        })
    }
}

fn check_format(source: &str) -> AnalysisResult<()> {
    let Some(ext) = Path::new(source).extension() else {
        return Ok(());
    };
    let ext = ext.to_string_lossy().to_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(AnalysisError::UnsupportedFormat {
            source_label: source.to_string(),
            extension: ext,
        })
    }
}
