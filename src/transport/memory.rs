//! In-memory transport replaying canned responses.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{QuerierError, Result};
use crate::query::request::NativeRequest;
use crate::response::NativeResponse;
use crate::transport::Transport;

/// Answers requests from a queue of canned results and records every request
/// it receives.
///
/// Used for offline normalization, dry runs and tests. An exhausted queue
/// answers with a transport error.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<NativeResponse>>>,
    requests: Mutex<Vec<NativeRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn push_response(&self, response: NativeResponse) -> &Self {
        self.lock_responses().push_back(Ok(response));
        self
    }

    /// Queue a failure.
    pub fn push_error(&self, code: i32, message: &str) -> &Self {
        self.lock_responses()
            .push_back(Err(QuerierError::transport(code, message)));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<NativeRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<NativeResponse>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &NativeRequest) -> Result<NativeResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        self.lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(QuerierError::transport(0, "no response queued")))
    }
}
