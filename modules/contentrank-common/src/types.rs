use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::ContentRankError;

// =============================================================================
// Documents
// =============================================================================

/// A piece of publishable content and its search metadata.
///
/// Owned by the caller. The optimizer takes it by value and hands back a new
/// merged copy per revision; the caller's value is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentDocument {
    pub title: String,
    /// HTML-like markup: headings, paragraphs, lists, images.
    pub body_markup: String,
    pub meta_title: String,
    pub meta_description: String,
    pub slug: String,
    /// True when a cover asset exists outside the body markup.
    pub has_external_media: bool,
}

impl ContentDocument {
    /// Read a document from a camelCase JSON file.
    pub fn load(path: &Path) -> Result<Self, ContentRankError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the document as pretty-printed camelCase JSON.
    pub fn save(&self, path: &Path) -> Result<(), ContentRankError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ContentRankError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Focus keyword
// =============================================================================

/// Lower-case `s` the way the rubric compares text.
///
/// Turkish dotted capital `İ` folds to plain `i` (Unicode lower-casing would
/// otherwise yield `i` + U+0307, which never matches a typed keyword).
pub fn fold_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == 'İ' {
            out.push('i');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// The phrase a document is optimized for: case-folded, trimmed, with inner
/// whitespace collapsed to single spaces. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FocusKeyword(String);

impl FocusKeyword {
    pub fn new(raw: &str) -> Self {
        let folded = fold_case(raw);
        Self(folded.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_multi_word(&self) -> bool {
        self.0.contains(' ')
    }
}

impl From<&str> for FocusKeyword {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for FocusKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Rubric checks
// =============================================================================

/// The ten rubric checks, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    KeywordInTitle,
    KeywordInMetaTitle,
    KeywordInMetaDescription,
    KeywordInSlug,
    KeywordDensity,
    MetaTitleLength,
    MetaDescriptionLength,
    BodyWordCount,
    KeywordInHeading,
    HasMedia,
}

impl CheckKind {
    pub const ALL: [CheckKind; 10] = [
        CheckKind::KeywordInTitle,
        CheckKind::KeywordInMetaTitle,
        CheckKind::KeywordInMetaDescription,
        CheckKind::KeywordInSlug,
        CheckKind::KeywordDensity,
        CheckKind::MetaTitleLength,
        CheckKind::MetaDescriptionLength,
        CheckKind::BodyWordCount,
        CheckKind::KeywordInHeading,
        CheckKind::HasMedia,
    ];

    pub const fn weight(self) -> u32 {
        match self {
            CheckKind::KeywordInTitle => 15,
            CheckKind::KeywordInMetaTitle => 10,
            CheckKind::KeywordInMetaDescription => 10,
            CheckKind::KeywordInSlug => 10,
            CheckKind::KeywordDensity => 10,
            CheckKind::MetaTitleLength => 10,
            CheckKind::MetaDescriptionLength => 10,
            CheckKind::BodyWordCount => 5,
            CheckKind::KeywordInHeading => 10,
            CheckKind::HasMedia => 10,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CheckKind::KeywordInTitle => "Keyword in title",
            CheckKind::KeywordInMetaTitle => "Keyword in meta title",
            CheckKind::KeywordInMetaDescription => "Keyword in meta description",
            CheckKind::KeywordInSlug => "Keyword in slug",
            CheckKind::KeywordDensity => "Keyword density",
            CheckKind::MetaTitleLength => "Meta title length",
            CheckKind::MetaDescriptionLength => "Meta description length",
            CheckKind::BodyWordCount => "Body word count",
            CheckKind::KeywordInHeading => "Keyword in headings",
            CheckKind::HasMedia => "Has media",
        }
    }
}

/// Sum of all check weights. Must be exactly 100.
pub const fn total_weight() -> u32 {
    let mut total = 0;
    let mut i = 0;
    while i < CheckKind::ALL.len() {
        total += CheckKind::ALL[i].weight();
        i += 1;
    }
    total
}

const _: () = assert!(total_weight() == 100, "rubric weights must sum to 100");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub kind: CheckKind,
    pub label: String,
    pub passed: bool,
    /// Measured value, phrased so a reviser can act on it.
    pub detail: String,
    pub weight: u32,
}

impl CheckResult {
    pub fn new(kind: CheckKind, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            passed,
            detail: detail.into(),
            weight: kind.weight(),
        }
    }

    /// `"label: detail"`, the form handed to the revision client.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.label, self.detail)
    }
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStat {
    pub term: String,
    pub count: usize,
    /// Percentage of all body tokens.
    pub density: f64,
}

/// Result of one rubric pass. Recomputed on every call, never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Sum of the weights of passed checks, 0-100.
    pub score: u32,
    pub checks: Vec<CheckResult>,
    /// Keyword occurrences as a percentage of body words.
    pub keyword_density: f64,
    pub keyword_occurrences: usize,
    pub word_count: usize,
    pub top_terms: Vec<TermStat>,
}

impl AnalysisResult {
    /// The degenerate analysis returned for a blank focus keyword.
    pub fn zero() -> Self {
        Self {
            score: 0,
            checks: vec![],
            keyword_density: 0.0,
            keyword_occurrences: 0,
            word_count: 0,
            top_terms: vec![],
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.score == total_weight()
    }

    /// Failing checks in rubric order.
    pub fn failing_checks(&self) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.kind == kind)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}/{}", self.score, total_weight())?;
        for check in &self.checks {
            let status = if check.passed { "PASS" } else { "FAIL" };
            writeln!(
                f,
                "  [{status}] {} ({}): {}",
                check.label, check.weight, check.detail
            )?;
        }
        writeln!(
            f,
            "Keyword density: {:.2}% ({} of {} words)",
            self.keyword_density, self.keyword_occurrences, self.word_count
        )?;
        if !self.top_terms.is_empty() {
            writeln!(f, "Top terms:")?;
            for term in &self.top_terms {
                writeln!(f, "  {} x{} ({:.2}%)", term.term, term.count, term.density)?;
            }
        }
        Ok(())
    }
}
