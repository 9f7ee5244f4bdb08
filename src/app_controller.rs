use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::providers::Provider;
use crate::translation::{PipelineStage, ProgressObserver, TranslationReport, XlsxTranslator};

// @module: Application controller for workbook translation

/// Name of the issues log written next to translated workbooks
pub const ISSUES_LOG_FILE: &str = "xlsxwai.issues.log";

/// Outcome of translating one input file
#[derive(Debug)]
pub enum FileOutcome {
    /// A translated workbook was written
    Translated(TranslationReport),
    /// The workbook had no text cells
    NothingToTranslate,
    /// The output already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counts for a folder run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for workbook translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

/// Renders pipeline progress on an `indicatif` bar
struct BarObserver {
    bar: ProgressBar,
}

impl BarObserver {
    fn new(multi_progress: &MultiProgress, file_name: &str) -> Self {
        let bar = multi_progress.add(ProgressBar::new(0));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cells ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_message(file_name.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl ProgressObserver for BarObserver {
    fn on_progress(&self, current: usize, total: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
        }
        self.bar.set_position(current as u64);
    }

    fn on_log(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn on_stage(&self, stage: PipelineStage) {
        match stage {
            PipelineStage::Done => self.bar.finish(),
            PipelineStage::Failed => self.bar.abandon_with_message("Failed"),
            _ => {}
        }
    }
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.provider.api_key = "test-key".to_string();
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate one workbook through the configured DeepSeek endpoint
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        debug!("Using endpoint {}", self.config.provider.endpoint);
        let translator = XlsxTranslator::deepseek(self.config.provider.clone())
            .with_failure_policy(self.config.failure_policy);
        let multi_progress = MultiProgress::new();
        self.run_with_translator(&translator, &input_file, force_overwrite, &multi_progress)
            .await
    }

    /// Translate one workbook with the given translator
    pub async fn run_with_translator<P, C>(
        &self,
        translator: &XlsxTranslator<P, C>,
        input_file: &Path,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
    ) -> Result<FileOutcome>
    where
        P: Provider,
        C: Fn() -> Result<P, TranslationError> + Send + Sync,
    {
        let start_time = std::time::Instant::now();

        if !input_file.is_file() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let target_language = &self.config.target_language;
        let output_path = FileManager::translated_output_path(input_file, target_language);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping {}, translation already exists (use -f to force overwrite)",
                input_file.display()
            );
            return Ok(FileOutcome::Skipped(output_path));
        }

        let file_name = input_file
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let observer = BarObserver::new(multi_progress, &file_name);

        let report = translator
            .translate_with_report(
                input_file,
                target_language,
                self.config.max_concurrent_requests,
                &observer,
            )
            .await
            .with_context(|| format!("Failed to translate {}", input_file.display()))?;

        if !report.written {
            return Ok(FileOutcome::NothingToTranslate);
        }

        if !report.failed_cells.is_empty() {
            let log_dir = report.output_path.parent().unwrap_or_else(|| Path::new("."));
            let log_path = log_dir.join(ISSUES_LOG_FILE);
            match Self::write_issues_log(&report, &log_path) {
                Ok(()) => warn!(
                    "{} cell(s) kept their original text, see {}",
                    report.failed_cells.len(),
                    log_path.display()
                ),
                Err(e) => warn!("Failed to write issues log: {}", e),
            }
        }

        info!(
            "Success: {} ({} cells in {})",
            report.output_path.display(),
            report.translated_cells(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(FileOutcome::Translated(report))
    }

    /// Translate every workbook below `input_dir` through the configured endpoint
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<FolderSummary> {
        let translator = XlsxTranslator::deepseek(self.config.provider.clone())
            .with_failure_policy(self.config.failure_policy);
        self.run_folder_with_translator(&translator, &input_dir, force_overwrite)
            .await
    }

    /// Run the workflow in folder mode with the given translator
    ///
    /// Earlier outputs and Excel lock files are never treated as inputs.
    pub async fn run_folder_with_translator<P, C>(
        &self,
        translator: &XlsxTranslator<P, C>,
        input_dir: &Path,
        force_overwrite: bool,
    ) -> Result<FolderSummary>
    where
        P: Provider,
        C: Fn() -> Result<P, TranslationError> + Send + Sync,
    {
        let start_time = std::time::Instant::now();

        if !input_dir.is_dir() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let workbooks = FileManager::find_workbooks(input_dir)?;
        if workbooks.is_empty() {
            return Err(anyhow!("No xlsx files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(workbooks.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(style.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for workbook in &workbooks {
            let file_name = workbook
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            match self
                .run_with_translator(translator, workbook, force_overwrite, &multi_progress)
                .await
            {
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    error!("Error processing file {}: {:#}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} processed, {} skipped, {} errors",
            summary.processed, summary.skipped, summary.errors
        );
        info!("{}", summary_message);

        let log_path = input_dir.join(ISSUES_LOG_FILE);
        let entry = format!(
            "Folder Processing: {} - {} - Duration: {}",
            input_dir.display(),
            summary_message,
            Self::format_duration(start_time.elapsed())
        );
        if let Err(e) = FileManager::append_to_log_file(&log_path, &entry) {
            warn!("Failed to write folder logs to file: {}", e);
        }

        Ok(summary)
    }

    /// Append one line per failed cell to the issues log
    fn write_issues_log(report: &TranslationReport, log_path: &Path) -> Result<()> {
        FileManager::append_to_log_file(
            log_path,
            &format!(
                "Translation of {} -> {}: {} of {} cells failed",
                report.input_path.display(),
                report.output_path.display(),
                report.failed_cells.len(),
                report.total_cells
            ),
        )?;

        for failed in &report.failed_cells {
            FileManager::append_to_log_file(
                log_path,
                &format!("[WARN] {} kept original text: {}", failed.cell_ref, failed.error),
            )?;
        }

        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
