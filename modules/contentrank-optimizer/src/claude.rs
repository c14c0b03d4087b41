//! Anthropic-backed [`ContentRevisionClient`].
//!
//! Forces a single `revised_fields` tool call whose input schema is
//! [`RevisionPatch`], so the reply is structured JSON rather than prose.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use contentrank_common::Config;

use crate::prompt;
use crate::traits::{ContentRevisionClient, RevisionError, RevisionPatch, RevisionRequest};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const TOOL_NAME: &str = "revised_fields";
const MAX_TOKENS: u32 = 8192;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<WireMessage>,
    temperature: f32,
    tools: Vec<ToolDefinitionWire>,
    tool_choice: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ToolDefinitionWire {
    name: &'static str,
    description: &'static str,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse { input: serde_json::Value },
    #[serde(other)]
    Other,
}

// =============================================================================
// ClaudeReviser
// =============================================================================

#[derive(Clone)]
pub struct ClaudeReviser {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
}

impl ClaudeReviser {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, contentrank_common::ContentRankError> {
        let reviser = Self::new(config.require_api_key()?, config.model.clone());
        Ok(match config.anthropic_base_url {
            Some(ref url) => reviser.with_base_url(url),
            None => reviser,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap, RevisionError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| RevisionError::Generation(format!("invalid API key header: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_request(&self, request: &RevisionRequest) -> Result<ChatRequest, RevisionError> {
        let schema = serde_json::to_value(schemars::schema_for!(RevisionPatch))
            .map_err(|e| RevisionError::Generation(format!("schema: {e}")))?;

        Ok(ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system: prompt::revision_system(&request.thresholds),
            messages: vec![WireMessage {
                role: "user",
                content: prompt::revision_user(request),
            }],
            temperature: 0.0,
            tools: vec![ToolDefinitionWire {
                name: TOOL_NAME,
                description: "Return only the document fields you revised.",
                input_schema: schema,
            }],
            tool_choice: serde_json::json!({ "type": "tool", "name": TOOL_NAME }),
        })
    }
}

#[async_trait]
impl ContentRevisionClient for ClaudeReviser {
    async fn revise(&self, request: &RevisionRequest) -> Result<RevisionPatch, RevisionError> {
        let url = format!("{}/messages", self.base_url);
        let body = self.build_request(request)?;

        debug!(model = %self.model, failing = request.failing_checks.len(), "Claude revision request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RevisionError::Generation(format!(
                "Claude API error ({status}): {error_text}"
            )));
        }

        let raw = response.text().await?;
        parse_patch(&raw)
    }
}

/// Pull the patch out of a messages API response body.
///
/// Prefers the forced tool call; falls back to a JSON text block.
fn parse_patch(raw: &str) -> Result<RevisionPatch, RevisionError> {
    let response: ChatResponse = serde_json::from_str(raw)?;

    let mut text_reply = None;
    for block in response.content {
        match block {
            ContentBlock::ToolUse { input } => return Ok(serde_json::from_value(input)?),
            ContentBlock::Text { text } if text_reply.is_none() => text_reply = Some(text),
            _ => {}
        }
    }

    match text_reply {
        Some(text) => Ok(serde_json::from_str(strip_code_fence(&text))?),
        None => Err(RevisionError::MalformedResponse(
            "no tool call or text in Claude response".to_string(),
        )),
    }
}

fn strip_code_fence(s: &str) -> &str {
    let s = s.trim();
    let s = s
        .strip_prefix("```json")
        .or_else(|| s.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(s);
    s.trim()
}
