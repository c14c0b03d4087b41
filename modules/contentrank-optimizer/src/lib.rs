//! contentrank-optimizer — drives a revision collaborator until a document
//! passes the rubric or the attempt budget runs out.
//!
//! The collaborator sits behind [`ContentRevisionClient`]; production wiring
//! uses [`ClaudeReviser`], tests use `testing::ScriptedReviser`.

pub mod claude;
pub mod controller;
pub mod prompt;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use claude::ClaudeReviser;
pub use controller::{
    OptimizationFailure, OptimizationOutcome, Optimizer, OptimizerConfig, PassRecord,
    RetentionPolicy, StopReason,
};
pub use traits::{ContentRevisionClient, RevisionError, RevisionPatch, RevisionRequest};
