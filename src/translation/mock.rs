/*!
 * Mock provider for exercising the translator without a network.
 *
 * - `MockProvider::working()` tags every line with the target code
 * - `MockProvider::intermittent(n)` fails every n-th request
 * - `MockProvider::failing()` always errors
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::translation::provider::TranslationProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with `[code] text`
    Working,
    /// Fails every Nth request (1-based)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Answers with an empty string
    Empty,
}

/// Mock provider for testing translation behavior
#[derive(Debug, Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of translate calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(format!("[{}] {}", target_code, text)),
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => Err(
                TranslationError::RequestFailed(format!("Simulated intermittent failure on request {}", count)),
            ),
            MockBehavior::Intermittent { .. } => Ok(format!("[{}] {}", target_code, text)),
            MockBehavior::Failing => Err(TranslationError::ApiError {
                status_code: 503,
                message: "Simulated service outage".to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
        }
    }
}
