// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use xlsxwai::app_config::{self, API_KEY_ENV, BASE_URL_ENV, Config, FailurePolicy};
use xlsxwai::app_controller::{Controller, FileOutcome};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate xlsx workbooks (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for xlsxwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct TranslateArgs {
    /// Input xlsx file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: TranslateOptions,
}

/// Options shared by the default command and `translate`
#[derive(clap::Args, Debug, Clone)]
struct TranslateOptions {
    /// Target language, a name ("Japanese") or an ISO code ("ja")
    #[arg(short, long)]
    target_language: Option<String>,

    /// Maximum number of concurrent API requests
    #[arg(short = 'j', long)]
    max_concurrent: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the completion endpoint
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the completion endpoint
    #[arg(long, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Stop at the first failed cell instead of keeping its original text
    #[arg(long)]
    fail_fast: bool,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// xlsxwai - translate Excel workbooks with AI
///
/// Every text cell of every sheet is sent to a DeepSeek-compatible chat
/// completions endpoint and the translated workbook is saved next to the input.
#[derive(Parser, Debug)]
#[command(name = "xlsxwai")]
#[command(version)]
#[command(about = "AI-powered Excel workbook translation tool")]
#[command(long_about = "xlsxwai translates every text cell of an xlsx workbook through a chat completions API.

EXAMPLES:
    xlsxwai report.xlsx                        # Translate to the configured language
    xlsxwai -t Japanese report.xlsx            # Translate to Japanese
    xlsxwai -t fr -j 10 report.xlsx            # French, at most 10 requests at once
    xlsxwai -f --log-level debug /workbooks/   # Process a directory, overwrite outputs
    xlsxwai completions bash > xlsxwai.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. DEEPSEEK_API_KEY and DEEPSEEK_BASE_URL override
    the file; command line flags override both.

OUTPUT:
    report.xlsx is translated to report_translated_<language>.xlsx in the same
    directory. Cells that could not be translated keep their text and are listed
    in xlsxwai.issues.log.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input xlsx file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Filter is lowered again once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "xlsxwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;
            run_translate(TranslateArgs {
                input_path,
                options: cli.options,
            })
            .await
        }
    }
}

/// Layer CLI flags over the loaded config
fn apply_cli_overrides(config: &mut Config, options: &TranslateOptions) {
    if let Some(target_language) = &options.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(max_concurrent) = options.max_concurrent {
        config.max_concurrent_requests = max_concurrent;
    }
    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.provider.api_key = api_key.clone();
    }
    if let Some(base_url) = &options.base_url {
        config.provider.endpoint = base_url.clone();
    }
    if options.fail_fast {
        config.failure_policy = FailurePolicy::Abort;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    let options = &args.options;

    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)
        .with_context(|| format!("Failed to load config file: {}", options.config_path.display()))?;
    config.apply_env_overrides(|name| std::env::var(name).ok());
    apply_cli_overrides(&mut config, options);

    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;

    if args.input_path.is_file() {
        match controller.run(args.input_path.clone(), options.force_overwrite).await? {
            FileOutcome::Translated(report) if !report.failed_cells.is_empty() => {
                info!(
                    "{} of {} cells kept their original text",
                    report.failed_cells.len(),
                    report.total_cells
                );
            }
            FileOutcome::NothingToTranslate => info!("Nothing to translate, no file written"),
            _ => {}
        }
    } else if args.input_path.is_dir() {
        controller
            .run_folder(args.input_path.clone(), options.force_overwrite)
            .await?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", args.input_path));
    }

    Ok(())
}
