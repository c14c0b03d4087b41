//! contentrank-rubric — deterministic, weighted content-quality rubric.
//!
//! Pure functions only: no IO, no logging, no clock. The same document and
//! keyword always produce an identical [`AnalysisResult`].

pub mod extract;
pub mod keyword;
pub mod scorer;
pub mod terms;

pub use contentrank_common::{AnalysisResult, CheckKind, CheckResult, ContentDocument, FocusKeyword};
pub use extract::{contains_image, extract, ExtractedText};
pub use keyword::{measure, word_count, KeywordStats};
pub use scorer::{analyze, slugify, RubricScorer, RubricThresholds};
pub use terms::{top_terms, TOP_TERMS_LIMIT};
