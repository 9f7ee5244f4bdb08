/*!
 * # xlsxwai - Excel workbook translation with AI
 *
 * A Rust library for translating every text cell of an xlsx workbook
 * through a chat completions API.
 *
 * ## Features
 *
 * - Extract literal text cells in sheet, row, column order
 * - Translate them through DeepSeek (or any OpenAI-compatible endpoint)
 *   with a fixed cap on concurrent requests
 * - Progress and log callbacks for the caller
 * - Write translations back in place, keeping numbers, formulas and styles
 * - Per-cell failure isolation, or abort on first failure
 * - ISO 639 language code support in prompts
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `workbook`: Loading, cell extraction and saving of xlsx files
 * - `providers`: Completion providers:
 *   - `providers::deepseek`: DeepSeek chat completions client
 *   - `providers::mock`: In-process provider for tests
 * - `translation`: The translation pipeline:
 *   - `translation::client`: Single and bounded-concurrency batch translation
 *   - `translation::orchestrator`: Load, extract, translate, write back, save
 *   - `translation::progress`: Progress observers
 *   - `translation::prompts`: Prompt template
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod translation;
pub mod workbook;

// Re-export main types for easier usage
pub use app_config::{Config, FailurePolicy, ProviderConfig};
pub use errors::{ConfigError, ProviderError, TranslationError, WorkbookError};
pub use language_utils::{get_language_name, normalize_to_part2t};
pub use translation::{
    CallbackObserver, CompletionClient, NoopObserver, ProgressObserver, TranslationReport,
    XlsxTranslator,
};
pub use workbook::{CellRef, TextCell, Workbook};
