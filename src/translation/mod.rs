/*!
 * Workbook translation through a chat completions provider.
 *
 * - `prompts`: the per-cell prompt
 * - `client`: one provider session, single and bounded-concurrency batch translation
 * - `progress`: observers for progress counts and log lines
 * - `orchestrator`: load, extract, translate, write back, save
 */

pub use self::client::{BatchOutcome, CompletionClient, ItemFailure};
pub use self::orchestrator::{FailedCell, PipelineStage, TranslationReport, XlsxTranslator};
pub use self::progress::{CallbackObserver, NoopObserver, ProgressObserver};
pub use self::prompts::PromptTemplate;

pub mod client;
pub mod orchestrator;
pub mod progress;
pub mod prompts;
