pub mod api;
pub mod chapters;
pub mod document;
pub mod engine;
pub mod error;
pub mod export;
pub mod frequency;
pub mod stats;
pub mod tokenizer;
pub mod vocabulary;

// Re-export commonly used types
pub use chapters::ChapterHeader;
pub use document::TokenRecord;
pub use engine::{Analysis, AnalysisTables, Analyzer};
pub use error::{AnalysisError, AnalysisResult};
pub use export::Table;
pub use frequency::{FrequencySource, FrequencyTable};
pub use tokenizer::{AnnotatedToken, Annotator, RuleAnnotator};
pub use vocabulary::{ClassifierOptions, VocabularyAggregate, VocabularyExtract};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
