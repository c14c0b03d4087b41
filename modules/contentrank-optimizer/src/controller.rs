//! Optimizer — bounded score → revise → apply → re-score loop.
//!
//! Every pass threads an immutable [`RunState`] forward: the document, its
//! analysis and the number of revisions applied so far. The only suspension
//! point is the call to the revision client, which is bounded by
//! `revision_timeout`. A failed call ends the run; nothing is retried within
//! a run and a revision is applied whole or not at all.
//!
//! Two runs for the same document must be serialized by the caller. The
//! optimizer owns its copy of the document for the duration of a run and
//! holds no identity lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use contentrank_common::{AnalysisResult, Config, ContentDocument, FocusKeyword};
use contentrank_rubric::RubricScorer;

use crate::traits::{ContentRevisionClient, RevisionError, RevisionPatch, RevisionRequest};

// =============================================================================
// Configuration
// =============================================================================

/// Which pass to hand back when the budget runs out without converging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// The result of the final revision, even if an earlier pass scored higher.
    #[default]
    KeepLast,
    /// The highest-scoring pass; the earliest one wins ties.
    KeepBest,
}

#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    pub max_attempts: u32,
    pub revision_timeout: Duration,
    pub retention: RetentionPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            revision_timeout: Duration::from_secs(60),
            retention: RetentionPolicy::KeepLast,
        }
    }
}

impl From<&Config> for OptimizerConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.max_attempts,
            revision_timeout: config.revision_timeout,
            retention: RetentionPolicy::default(),
        }
    }
}

// =============================================================================
// Outcomes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Score reached 100.
    Converged,
    /// All revision attempts were used without reaching 100.
    ExhaustedBudget,
    /// The cancellation flag was raised between passes.
    Cancelled,
    /// The focus keyword was blank; nothing was scored or revised.
    InvalidKeyword,
}

/// Score after each scoring pass. Pass 0 is the initial document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRecord {
    pub attempts_used: u32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    pub run_id: Uuid,
    pub final_document: ContentDocument,
    pub final_analysis: AnalysisResult,
    /// Revisions applied during the run, `0..=max_attempts`.
    pub attempts_used: u32,
    pub converged: bool,
    pub stop_reason: StopReason,
    pub history: Vec<PassRecord>,
}

/// A revision call failed. Carries the last successfully scored state.
#[derive(Debug, Error)]
#[error("revision failed after {attempts_used} applied revision(s): {error}")]
pub struct OptimizationFailure {
    #[source]
    pub error: RevisionError,
    pub run_id: Uuid,
    pub last_document: ContentDocument,
    pub last_analysis: AnalysisResult,
    pub attempts_used: u32,
    pub history: Vec<PassRecord>,
}

// =============================================================================
// Run state
// =============================================================================

#[derive(Debug, Clone)]
struct RunState {
    document: ContentDocument,
    analysis: AnalysisResult,
    attempts_used: u32,
}

impl RunState {
    fn initial(document: ContentDocument, scorer: &RubricScorer, keyword: &FocusKeyword) -> Self {
        let analysis = scorer.analyze(&document, keyword);
        Self {
            document,
            analysis,
            attempts_used: 0,
        }
    }

    /// The next state: patch merged over this document, then re-scored.
    fn revised(&self, patch: &RevisionPatch, scorer: &RubricScorer, keyword: &FocusKeyword) -> Self {
        let document = patch.apply_to(&self.document);
        let analysis = scorer.analyze(&document, keyword);
        Self {
            document,
            analysis,
            attempts_used: self.attempts_used + 1,
        }
    }

    fn record(&self) -> PassRecord {
        PassRecord {
            attempts_used: self.attempts_used,
            score: self.analysis.score,
        }
    }
}

// =============================================================================
// Optimizer
// =============================================================================

pub struct Optimizer<C> {
    client: C,
    scorer: RubricScorer,
    config: OptimizerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<C: ContentRevisionClient> Optimizer<C> {
    pub fn new(client: C, config: OptimizerConfig) -> Self {
        Self {
            client,
            scorer: RubricScorer::default(),
            config,
            cancel: None,
        }
    }

    pub fn with_scorer(mut self, scorer: RubricScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Checked before each revision request. Raising it mid-call does not
    /// abort the call in flight.
    pub fn with_cancellation(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Run the loop to a terminal state.
    ///
    /// `Ok` for converged, exhausted, cancelled and blank-keyword runs; `Err`
    /// when the revision client fails, with the last scored state attached.
    pub async fn run(
        &self,
        document: ContentDocument,
        keyword: &FocusKeyword,
    ) -> Result<OptimizationOutcome, OptimizationFailure> {
        let run_id = Uuid::new_v4();

        if keyword.is_empty() {
            warn!(%run_id, "Blank focus keyword, skipping optimization");
            return Ok(OptimizationOutcome {
                run_id,
                final_document: document,
                final_analysis: AnalysisResult::zero(),
                attempts_used: 0,
                converged: false,
                stop_reason: StopReason::InvalidKeyword,
                history: vec![],
            });
        }

        let mut state = RunState::initial(document, &self.scorer, keyword);
        let mut history = vec![state.record()];
        let mut best = state.clone();

        info!(
            %run_id,
            keyword = keyword.as_str(),
            score = state.analysis.score,
            max_attempts = self.config.max_attempts,
            "Initial score"
        );

        let stop_reason = loop {
            if state.analysis.is_perfect() {
                break StopReason::Converged;
            }
            if state.attempts_used >= self.config.max_attempts {
                break StopReason::ExhaustedBudget;
            }
            if self.is_cancelled() {
                info!(%run_id, attempts_used = state.attempts_used, "Optimization cancelled");
                break StopReason::Cancelled;
            }

            let request = RevisionRequest::new(
                &state.document,
                keyword,
                &state.analysis,
                self.scorer.thresholds(),
            );
            let attempt = state.attempts_used + 1;
            info!(
                %run_id,
                attempt,
                failing = request.failing_checks.len(),
                "Requesting revision"
            );

            let patch = match self.request_revision(&request).await {
                Ok(patch) => patch,
                Err(error) => {
                    warn!(%run_id, attempt, error = %error, "Revision failed, stopping");
                    return Err(OptimizationFailure {
                        error,
                        run_id,
                        last_document: state.document,
                        last_analysis: state.analysis,
                        attempts_used: state.attempts_used,
                        history,
                    });
                }
            };

            let previous = state.analysis.score;
            state = state.revised(&patch, &self.scorer, keyword);
            history.push(state.record());

            info!(
                %run_id,
                attempt,
                fields = ?patch.changed_fields(),
                previous_score = previous,
                score = state.analysis.score,
                "Revision applied"
            );
            if state.analysis.score < previous {
                warn!(%run_id, attempt, previous_score = previous, score = state.analysis.score, "Revision lowered the score");
            }

            if state.analysis.score > best.analysis.score {
                best = state.clone();
            }
        };

        let attempts_used = state.attempts_used;
        let kept = match (stop_reason, self.config.retention) {
            (StopReason::ExhaustedBudget | StopReason::Cancelled, RetentionPolicy::KeepBest) => best,
            _ => state,
        };
        let converged = stop_reason == StopReason::Converged;

        info!(
            %run_id,
            ?stop_reason,
            attempts_used,
            score = kept.analysis.score,
            converged,
            "Optimization finished"
        );

        Ok(OptimizationOutcome {
            run_id,
            final_document: kept.document,
            final_analysis: kept.analysis,
            attempts_used,
            converged,
            stop_reason,
            history,
        })
    }

    async fn request_revision(&self, request: &RevisionRequest) -> Result<RevisionPatch, RevisionError> {
        let timeout = self.config.revision_timeout;
        let patch = tokio::time::timeout(timeout, self.client.revise(request))
            .await
            .map_err(|_| RevisionError::Timeout(timeout))??;
        patch.validate()?;
        Ok(patch)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
