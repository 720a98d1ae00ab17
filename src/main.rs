// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use yamt::app_config::{self, Config, TranslationProvider};
use yamt::errors::PipelineError;
use yamt::file_utils::FileManager;
use yamt::formats::KeyValuePolicy;
use yamt::language_utils::{self, COMMON_LANGUAGES};
use yamt::providers::ConfiguredProviderFactory;
use yamt::translation::{Pipeline, ProgressSink, RunSummary};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

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

/// CLI Wrapper for KeyValuePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliPolicy {
    /// Translate every value
    Values,
    /// Translate only `Text: Text` lines
    SymmetricEntries,
}

impl From<CliPolicy> for KeyValuePolicy {
    fn from(policy: CliPolicy) -> Self {
        match policy {
            CliPolicy::Values => KeyValuePolicy::Values,
            CliPolicy::SymmetricEntries => KeyValuePolicy::SymmetricEntries,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a mod file (default command)
    Translate(TranslateArgs),

    /// List commonly used language codes
    Languages,

    /// Generate shell completions for yamt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    #[command(flatten)]
    options: TranslateOptions,
}

#[derive(Args, Debug)]
struct TranslateOptions {
    /// Output file (default: <stem>_translated.<ext> next to the input)
    #[arg(short, long, value_name = "OUTPUT_PATH")]
    output: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'zh-CN')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt', 'fr', 'zh-TW')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use with Ollama
    #[arg(short, long)]
    model: Option<String>,

    /// Which key/value lines to translate in YAML files
    #[arg(long, value_enum)]
    policy: Option<CliPolicy>,

    /// Maximum texts per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Maximum concurrently running batches
    #[arg(long)]
    workers: Option<usize>,

    /// Translation cache file
    #[arg(long, value_name = "CACHE_PATH")]
    cache: Option<PathBuf>,

    /// Do not seed the cache from an existing output file
    #[arg(long)]
    no_merge_output: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// yamt - Yet Another Mod Translator
///
/// Translates the text inside game-mod data files (YAML, JSON, XML, TOML, CSV,
/// INI, TXT) while keeping ids, numbers, paths and the file layout intact.
#[derive(Parser, Debug)]
#[command(name = "yamt")]
#[command(version)]
#[command(about = "Game-mod file translation tool")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "yamt translates the human-readable text of game-mod files and writes a file with the same structure.

EXAMPLES:
    yamt English.yml                            # Translate using default config
    yamt translate English.yml -t fr            # Translate from English to French
    yamt translate items.json -o items_pt.json  # Choose the output file
    yamt translate dump.yaml --policy symmetric-entries
    yamt languages                              # List common language codes
    yamt completions bash > yamt.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    google - Google web translate (default, no key required)
    ollama - Local Ollama server (default model: llama3.2)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    #[command(flatten)]
    options: TranslateOptions,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger, filtering through log::max_level
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌",
            Level::Warn => "🚧",
            Level::Info => " ",
            Level::Debug => "🔍",
            Level::Trace => "📋",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Progress bar fed by the batch scheduler
struct ProgressBarSink {
    bar: ProgressBar,
}

impl ProgressBarSink {
    fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%) {per_sec} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        Self { bar }
    }
}

impl ProgressSink for ProgressBarSink {
    fn begin(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn tick(&self) {
        self.bar.inc(1);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Every record goes through log::max_level, adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yamt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            print_languages();
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - translate the top-level input
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

fn print_languages() {
    println!("Common language codes:");
    for (code, name) in COMMON_LANGUAGES {
        println!("  {:<6} {}", code, name);
    }
    println!();
    println!("Any ISO 639-1/639-3 code is accepted, optionally with a region (e.g. pt-BR).");
}

/// Load the configuration file and apply command line overrides
fn load_config(options: &TranslateOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(provider) = &options.provider {
        config.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.ollama.model = model.clone();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(policy) = &options.policy {
        config.key_value_policy = policy.clone().into();
    }
    if let Some(batch_size) = options.batch_size {
        config.scheduler.batch_size = batch_size;
    }
    if let Some(workers) = options.workers {
        config.scheduler.max_workers = workers;
    }
    if let Some(cache) = &options.cache {
        config.cache.path = cache.clone();
    }
    if options.no_merge_output {
        config.cache.merge_existing_output = false;
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_translate(args: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &args.options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&args.options)?;
    log::set_max_level(config.log_level.to_level_filter());

    if language_utils::language_codes_match(&config.source_language, &config.target_language) {
        warn!(
            "Source and target language are both '{}', translations will mostly come back unchanged",
            config.target_language
        );
    }

    let output_path = args
        .options
        .output
        .clone()
        .unwrap_or_else(|| FileManager::generate_output_path(&args.input_path));

    info!(
        "Translating {:?} with {} ({} -> {})",
        args.input_path,
        config.provider.display_name(),
        config.source_language,
        config.target_language
    );

    let factory = Arc::new(ConfiguredProviderFactory::new(&config));
    let source_language = config.source_language.clone();
    let target_language = config.target_language.clone();
    let pipeline = Pipeline::new(config, factory)?;

    let progress = ProgressBarSink::new();
    let result = pipeline
        .run(&args.input_path, &output_path, &source_language, &target_language, &progress)
        .await;
    progress.bar.finish_and_clear();

    match result {
        Ok(summary) => {
            print_summary(&summary);
            Ok(())
        }
        Err(PipelineError::CacheWrite { summary, source }) => {
            print_summary(&summary);
            error!("Output written, but the translation cache was not saved: {}", source);
            Err(anyhow!("Failed to save translation cache: {}", source))
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}

fn print_summary(summary: &RunSummary) {
    let (total, translated) = summary.counts();
    println!();
    println!("{}", "=".repeat(60));
    println!("Translation summary ({} -> {})", summary.source_language, summary.target_language);
    println!("{}", "=".repeat(60));
    println!("  Output file:        {}", summary.output_path.display());
    println!("  Format:             {}", summary.format);
    println!("  Units:              {} ({} translatable)", total, summary.translatable_units);
    println!("  Units translated:   {}", translated);
    println!("  Unique texts:       {}", summary.unique_texts);
    println!("  From cache:         {}", summary.cache_hits);
    println!("  Newly translated:   {}", summary.newly_translated);
    println!("  Unchanged:          {}", summary.unchanged);
    println!("  Failed:             {}", summary.failed);
    println!("  Skipped:            {}", summary.skipped);
    if summary.seeded_from_output > 0 {
        println!("  Seeded from output: {}", summary.seeded_from_output);
    }
    println!("  Elapsed:            {:.1}s", summary.elapsed.as_secs_f64());
    println!("  Rate:               {:.1} texts/s", summary.translation_rate());
    println!("  Cache size:         {}", summary.cache_size);
    println!("{}", "=".repeat(60));
}
