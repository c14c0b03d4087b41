// The revision collaborator seam.
//
// ContentRevisionClient is the only thing the optimizer knows about the
// generator. Requests carry the current fields and what failed; responses are
// a partial field set where an absent field means "unchanged".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use contentrank_common::{AnalysisResult, ContentDocument, FocusKeyword};
use contentrank_rubric::RubricThresholds;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Malformed revision response: {0}")]
    MalformedResponse(String),

    #[error("Revision timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for RevisionError {
    fn from(e: reqwest::Error) -> Self {
        RevisionError::Generation(e.to_string())
    }
}

impl From<serde_json::Error> for RevisionError {
    fn from(e: serde_json::Error) -> Self {
        RevisionError::MalformedResponse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionRequest {
    pub title: String,
    pub body_markup: String,
    pub focus_keyword: String,
    pub meta_title: String,
    pub meta_description: String,
    pub slug: String,
    /// `"label: detail"` for each failing check, rubric order.
    pub failing_checks: Vec<String>,
    /// Pass ranges of the scorer that produced `failing_checks`.
    pub thresholds: RubricThresholds,
}

impl RevisionRequest {
    pub fn new(
        document: &ContentDocument,
        keyword: &FocusKeyword,
        analysis: &AnalysisResult,
        thresholds: &RubricThresholds,
    ) -> Self {
        Self {
            title: document.title.clone(),
            body_markup: document.body_markup.clone(),
            focus_keyword: keyword.as_str().to_string(),
            meta_title: document.meta_title.clone(),
            meta_description: document.meta_description.clone(),
            slug: document.slug.clone(),
            failing_checks: analysis.failing_checks().map(|c| c.summary()).collect(),
            thresholds: thresholds.clone(),
        }
    }
}

/// Revised fields. Only fields that should change are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevisionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_markup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl RevisionPatch {
    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.is_none())
    }

    /// Reject present-but-blank fields: a revision may change a field, never
    /// erase it.
    pub fn validate(&self) -> Result<(), RevisionError> {
        let blank: Vec<&str> = self
            .fields()
            .filter(|(_, value)| value.is_some_and(|v| v.trim().is_empty()))
            .map(|(name, _)| name)
            .collect();
        if blank.is_empty() {
            Ok(())
        } else {
            Err(RevisionError::MalformedResponse(format!(
                "blank value for {}",
                blank.join(", ")
            )))
        }
    }

    /// Merge present fields over `document`, returning a new document.
    pub fn apply_to(&self, document: &ContentDocument) -> ContentDocument {
        let pick = |patched: &Option<String>, current: &String| {
            patched.clone().unwrap_or_else(|| current.clone())
        };
        ContentDocument {
            title: pick(&self.title, &document.title),
            body_markup: pick(&self.body_markup, &document.body_markup),
            meta_title: pick(&self.meta_title, &document.meta_title),
            meta_description: pick(&self.meta_description, &document.meta_description),
            slug: pick(&self.slug, &document.slug),
            has_external_media: document.has_external_media,
        }
    }

    /// Names of the fields this patch changes.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.fields()
            .filter(|(_, value)| value.is_some())
            .map(|(name, _)| name)
            .collect()
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&String>)> {
        [
            ("title", self.title.as_ref()),
            ("bodyMarkup", self.body_markup.as_ref()),
            ("metaTitle", self.meta_title.as_ref()),
            ("metaDescription", self.meta_description.as_ref()),
            ("slug", self.slug.as_ref()),
        ]
        .into_iter()
    }
}

// ---------------------------------------------------------------------------
// ContentRevisionClient
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ContentRevisionClient: Send + Sync {
    /// Propose field edits that address `request.failing_checks`.
    async fn revise(&self, request: &RevisionRequest) -> Result<RevisionPatch, RevisionError>;
}

#[async_trait]
impl<T: ContentRevisionClient + ?Sized> ContentRevisionClient for Arc<T> {
    async fn revise(&self, request: &RevisionRequest) -> Result<RevisionPatch, RevisionError> {
        (**self).revise(request).await
    }
}
