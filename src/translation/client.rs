/*!
 * Concurrent translation of many cell texts over one provider session.
 *
 * At most `max_concurrent` requests run at any moment. Results come back in
 * completion order and are put back into input order before returning.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use crate::app_config::FailurePolicy;
use crate::errors::{ConfigError, ProviderError, TranslationError};
use crate::providers::{Provider, TranslationRequest};

/// One cell that could not be translated
#[derive(Debug)]
pub struct ItemFailure {
    /// Position in the input slice
    pub index: usize,
    /// Why the remote call failed
    pub error: ProviderError,
}

/// Result of a batch run, `translations[i]` belongs to `texts[i]`
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Translated texts; failed items keep their original text
    pub translations: Vec<String>,
    /// Items that fell back to their original text
    pub failures: Vec<ItemFailure>,
}

/// Translation client owning one provider session
///
/// The provider, and with it any open connections, is released when the
/// client is dropped.
#[derive(Debug)]
pub struct CompletionClient<P: Provider> {
    provider: P,
    failure_policy: FailurePolicy,
}

impl<P: Provider> CompletionClient<P> {
    /// Create a client that isolates per-cell failures
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            failure_policy: FailurePolicy::Isolate,
        }
    }

    /// Set how a failed cell affects the batch
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Translate one text.
    ///
    /// Blank input is returned unchanged without a remote call. The remote
    /// answer is trimmed of surrounding whitespace.
    pub async fn translate_one(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let request = TranslationRequest::new(text, target_language);
        let translated = self.provider.complete(&request).await?;
        Ok(translated.trim().to_string())
    }

    /// Translate every text with at most `max_concurrent` calls in flight.
    ///
    /// `on_item_done` receives the number of finished items after each one
    /// completes, successful or not; the values go 1, 2, ..., `texts.len()`.
    /// Under `FailurePolicy::Abort` the first failed item ends the batch with
    /// an error and the remaining items are cancelled.
    pub async fn batch_translate<F>(
        &self,
        texts: &[String],
        target_language: &str,
        max_concurrent: usize,
        on_item_done: F,
    ) -> Result<BatchOutcome, TranslationError>
    where
        F: Fn(usize) + Send + Sync,
    {
        if max_concurrent == 0 {
            return Err(ConfigError::InvalidConcurrency(max_concurrent).into());
        }
        if texts.is_empty() {
            return Ok(BatchOutcome::default());
        }

        let limit = max_concurrent.min(Semaphore::MAX_PERMITS);
        let semaphore = Semaphore::new(limit);
        let completed = AtomicUsize::new(0);

        debug!(
            "Translating {} texts with {} via {} concurrent requests",
            texts.len(),
            self.provider.name(),
            limit
        );

        let semaphore = &semaphore;
        let completed = &completed;
        let on_item_done = &on_item_done;

        let mut results = stream::iter(texts.iter().enumerate())
            .map(|(index, text)| async move {
                let _permit = semaphore
                    .acquire()
                    .await
                    .map_err(|e| TranslationError::Internal(format!("semaphore closed: {}", e)))?;

                let result = self.translate_one(text, target_language).await;

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                on_item_done(done);

                Ok::<_, TranslationError>((index, result))
            })
            .buffer_unordered(limit);

        let mut slots: Vec<Option<String>> = vec![None; texts.len()];
        let mut failures = Vec::new();

        while let Some(item) = results.next().await {
            let (index, result) = item?;
            match result {
                Ok(translated) => slots[index] = Some(translated),
                Err(e) => match self.failure_policy {
                    FailurePolicy::Abort => {
                        error!("Translation of item {} failed, aborting batch: {}", index, e);
                        return Err(TranslationError::RemoteCall(e));
                    }
                    FailurePolicy::Isolate => {
                        warn!("Translation of item {} failed, keeping original text: {}", index, e);
                        slots[index] = Some(texts[index].clone());
                        failures.push(ItemFailure { index, error: e });
                    }
                },
            }
        }

        let actual = slots.iter().filter(|slot| slot.is_some()).count();
        let translations: Vec<String> = slots.into_iter().flatten().collect();
        if actual != texts.len() {
            return Err(TranslationError::ResultCountMismatch {
                expected: texts.len(),
                actual,
            });
        }

        failures.sort_by_key(|failure| failure.index);

        Ok(BatchOutcome { translations, failures })
    }
}
