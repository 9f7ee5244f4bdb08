/*!
 * Provider implementations for the completion endpoint.
 *
 * - DeepSeek: OpenAI-compatible chat completions API
 * - Mock: in-process provider for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One text to translate into one target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Source text, sent verbatim
    pub text: String,

    /// Target language as given by the user (name or ISO code)
    pub target_language: String,
}

impl TranslationRequest {
    /// Create a new translation request
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
        }
    }
}

/// Common trait for completion providers
///
/// Implementations perform exactly one remote call per `complete` and
/// return the raw translated content; trimming and blank-text handling
/// belong to the caller.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate a single request
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated content or the reason the call failed
    async fn complete(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Short provider name for log output
    fn name(&self) -> &str;
}

pub mod deepseek;
pub mod mock;
