/*!
 * Common interface for translation backends.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::TranslationError;

/// A service that translates a single English line into a target language
///
/// Implementations are shared across concurrent requests, so they must be
/// `Send + Sync`.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate `text` into the language identified by `target_code`
    ///
    /// # Arguments
    /// * `text` - A single non-blank subtitle line
    /// * `target_code` - Service language code such as `ko` or `zh-CN`
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, TranslationError>;
}
