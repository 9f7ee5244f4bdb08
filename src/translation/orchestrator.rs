/*!
 * End-to-end workbook translation.
 *
 * One run loads the workbook, extracts text cells, translates them through
 * a freshly connected provider, writes the results back and saves the copy
 * next to the input as `{stem}_translated_{language}.xlsx`.
 */

use log::{error, info, warn};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::{FailurePolicy, ProviderConfig};
use crate::errors::{ConfigError, TranslationError};
use crate::file_utils::FileManager;
use crate::providers::deepseek::DeepSeek;
use crate::providers::Provider;
use crate::workbook::{CellRef, Workbook};

use super::client::CompletionClient;
use super::progress::ProgressObserver;

/// Stage of a translation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    Loading,
    Extracting,
    Translating,
    Writing,
    Saving,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::Loading => "loading",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Translating => "translating",
            PipelineStage::Writing => "writing",
            PipelineStage::Saving => "saving",
            PipelineStage::Done => "done",
            PipelineStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A cell that kept its original text
#[derive(Debug, Clone)]
pub struct FailedCell {
    pub cell_ref: CellRef,
    pub original_text: String,
    pub error: String,
}

/// Summary of one run
#[derive(Debug, Clone)]
pub struct TranslationReport {
    /// Workbook that was read
    pub input_path: PathBuf,

    /// Saved workbook, or the input path when nothing needed translating
    pub output_path: PathBuf,

    /// Number of text cells found
    pub total_cells: usize,

    /// Cells whose translation failed and kept the source text
    pub failed_cells: Vec<FailedCell>,

    /// Whether an output file was written
    pub written: bool,
}

impl TranslationReport {
    /// Cells that received a translation
    pub fn translated_cells(&self) -> usize {
        self.total_cells - self.failed_cells.len()
    }
}

/// Translates xlsx workbooks
///
/// `connect` builds the provider session for one run. It is only called
/// once the workbook is known to contain text, and the session is dropped
/// before the output is written.
pub struct XlsxTranslator<P, C>
where
    P: Provider,
    C: Fn() -> Result<P, TranslationError> + Send + Sync,
{
    connect: C,
    failure_policy: FailurePolicy,
}

impl XlsxTranslator<DeepSeek, Box<dyn Fn() -> Result<DeepSeek, TranslationError> + Send + Sync>> {
    /// Translator backed by the DeepSeek endpoint described by `config`
    pub fn deepseek(config: ProviderConfig) -> Self {
        let connect: Box<dyn Fn() -> Result<DeepSeek, TranslationError> + Send + Sync> =
            Box::new(move || Ok(DeepSeek::from_config(&config)?));
        Self::new(connect)
    }
}

impl<P, C> XlsxTranslator<P, C>
where
    P: Provider,
    C: Fn() -> Result<P, TranslationError> + Send + Sync,
{
    /// Create a translator from a provider factory
    pub fn new(connect: C) -> Self {
        Self {
            connect,
            failure_policy: FailurePolicy::Isolate,
        }
    }

    /// Set how a failed cell affects the run
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    /// Translate the workbook at `file_path` and return the output path.
    ///
    /// When the workbook has no text cells nothing is written and the input
    /// path itself is returned.
    pub async fn translate(
        &self,
        file_path: &Path,
        target_language: &str,
        max_concurrent: usize,
        observer: &dyn ProgressObserver,
    ) -> Result<PathBuf, TranslationError> {
        self.translate_with_report(file_path, target_language, max_concurrent, observer)
            .await
            .map(|report| report.output_path)
    }

    /// Translate the workbook and return a full report
    pub async fn translate_with_report(
        &self,
        file_path: &Path,
        target_language: &str,
        max_concurrent: usize,
        observer: &dyn ProgressObserver,
    ) -> Result<TranslationReport, TranslationError> {
        let mut stage = PipelineStage::Idle;
        let result = self
            .run(file_path, target_language, max_concurrent, observer, &mut stage)
            .await;

        if let Err(e) = &result {
            error!("Translation of {} failed while {}: {}", file_path.display(), stage, e);
            observer.on_stage(PipelineStage::Failed);
        }

        result
    }

    async fn run(
        &self,
        file_path: &Path,
        target_language: &str,
        max_concurrent: usize,
        observer: &dyn ProgressObserver,
        stage: &mut PipelineStage,
    ) -> Result<TranslationReport, TranslationError> {
        if max_concurrent == 0 {
            return Err(ConfigError::InvalidConcurrency(max_concurrent).into());
        }
        if target_language.trim().is_empty() {
            return Err(ConfigError::EmptyTargetLanguage.into());
        }

        enter(stage, PipelineStage::Loading, observer);
        emit(observer, "Loading Excel file...");
        let mut workbook = Workbook::open(file_path).map_err(TranslationError::DocumentLoad)?;

        enter(stage, PipelineStage::Extracting, observer);
        let cells = workbook.extract_text_cells();

        if cells.is_empty() {
            emit(observer, "No text content found in file");
            enter(stage, PipelineStage::Done, observer);
            return Ok(TranslationReport {
                input_path: file_path.to_path_buf(),
                output_path: file_path.to_path_buf(),
                total_cells: 0,
                failed_cells: Vec::new(),
                written: false,
            });
        }

        let total = cells.len();
        emit(observer, &format!("Found {} text cells, starting translation...", total));

        enter(stage, PipelineStage::Translating, observer);
        emit(observer, "Connecting to translation API...");
        let client = CompletionClient::new((self.connect)()?).with_failure_policy(self.failure_policy);

        let texts: Vec<String> = cells.iter().map(|cell| cell.text.clone()).collect();
        let outcome = client
            .batch_translate(&texts, target_language, max_concurrent, |done| {
                observer.on_progress(done, total);
                emit(observer, &format!("Translated {}/{} cells", done, total));
            })
            .await?;
        drop(client);

        if outcome.translations.len() != total {
            return Err(TranslationError::ResultCountMismatch {
                expected: total,
                actual: outcome.translations.len(),
            });
        }

        enter(stage, PipelineStage::Writing, observer);
        emit(observer, "Updating Excel file...");
        // Failed cells are left untouched so rich text runs survive
        let failed_indices: HashSet<usize> = outcome.failures.iter().map(|f| f.index).collect();
        for (index, (cell, translated)) in cells.iter().zip(&outcome.translations).enumerate() {
            if failed_indices.contains(&index) {
                continue;
            }
            workbook
                .write_text(&cell.cell_ref, translated)
                .map_err(|e| TranslationError::Internal(e.to_string()))?;
        }

        let failed_cells: Vec<FailedCell> = outcome
            .failures
            .iter()
            .map(|failure| {
                let cell = &cells[failure.index];
                FailedCell {
                    cell_ref: cell.cell_ref.clone(),
                    original_text: cell.text.clone(),
                    error: failure.error.to_string(),
                }
            })
            .collect();
        for failed in &failed_cells {
            warn!("Cell {} kept its original text: {}", failed.cell_ref, failed.error);
            emit(observer, &format!("Failed to translate {}: {}", failed.cell_ref, failed.error));
        }

        enter(stage, PipelineStage::Saving, observer);
        let output_path = FileManager::translated_output_path(file_path, target_language);
        workbook
            .save_as(&output_path)
            .map_err(TranslationError::DocumentSave)?;

        enter(stage, PipelineStage::Done, observer);
        emit(
            observer,
            &format!("Translation completed! File saved: {}", output_path.display()),
        );

        Ok(TranslationReport {
            input_path: file_path.to_path_buf(),
            output_path,
            total_cells: total,
            failed_cells,
            written: true,
        })
    }
}

fn enter(stage: &mut PipelineStage, next: PipelineStage, observer: &dyn ProgressObserver) {
    *stage = next;
    observer.on_stage(next);
}

fn emit(observer: &dyn ProgressObserver, message: &str) {
    info!("{}", message);
    observer.on_log(message);
}
