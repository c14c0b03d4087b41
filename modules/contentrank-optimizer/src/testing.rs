// Test fake for the revision seam.
//
// ScriptedReviser (ContentRevisionClient) replays a queue of scripted
// responses in order and records every request it receives. Once the queue is
// empty it fails with a Generation error, or keeps failing with a fixed
// message when built with `always_failing`.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::traits::{ContentRevisionClient, RevisionError, RevisionPatch, RevisionRequest};

// ---------------------------------------------------------------------------
// ScriptedReviser
// ---------------------------------------------------------------------------

pub struct ScriptedReviser {
    script: Mutex<VecDeque<Result<RevisionPatch, RevisionError>>>,
    repeat_error: Option<String>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RevisionRequest>>,
}

impl ScriptedReviser {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            repeat_error: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with `RevisionError::Generation(message)`.
    pub fn always_failing(message: &str) -> Self {
        Self {
            repeat_error: Some(message.to_string()),
            ..Self::new()
        }
    }

    pub fn then_patch(self, patch: RevisionPatch) -> Self {
        self.script.lock().unwrap().push_back(Ok(patch));
        self
    }

    pub fn then_error(self, error: RevisionError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Sleep before answering, for timeout tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RevisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for ScriptedReviser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRevisionClient for ScriptedReviser {
    async fn revise(&self, request: &RevisionRequest) -> Result<RevisionPatch, RevisionError> {
        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref message) = self.repeat_error {
            return Err(RevisionError::Generation(message.clone()));
        }

        // Bind before matching so the guard is dropped here.
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(scripted) => scripted,
            None => Err(RevisionError::Generation("no scripted response left".to_string())),
        }
    }
}
