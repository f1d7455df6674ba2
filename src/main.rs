// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use i18n_contrib::app_config::{self, Config, TranslationProvider};
use i18n_contrib::app_controller::Controller;
use i18n_contrib::export::ExportFormat;
use i18n_contrib::language_utils;
use i18n_contrib::session::{EntryFilter, StatusFilter};
use i18n_contrib::TranslationError;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Libretranslate,
    Deepl,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Libretranslate => TranslationProvider::LibreTranslate,
            CliTranslationProvider::Deepl => TranslationProvider::DeepL,
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

/// CLI Wrapper for StatusFilter to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStatus {
    All,
    Pending,
    Translated,
    Auto,
}

impl From<CliStatus> for StatusFilter {
    fn from(status: CliStatus) -> Self {
        match status {
            CliStatus::All => StatusFilter::All,
            CliStatus::Pending => StatusFilter::Pending,
            CliStatus::Translated => StatusFilter::Translated,
            CliStatus::Auto => StatusFilter::Auto,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load the source strings, auto-translate pending entries and export
    Translate(TranslateArgs),

    /// Show completion statistics of a translation
    Stats(SessionArgs),

    /// List entries, optionally filtered
    List(ListArgs),

    /// List suggested languages that have no translation yet
    Languages,

    /// Test the connection to the translation provider
    Check(ProviderArgs),

    /// Generate shell completions for i18n-contrib
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// English source strings (flat JSON object)
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Existing translation to start from (flat JSON object)
    #[arg(short, long)]
    existing: Option<PathBuf>,

    /// Target language code (e.g., 'de', 'zh-CN', 'pt-BR')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Display name of the target language
    #[arg(long)]
    language_name: Option<String>,
}

#[derive(Args, Debug)]
struct ProviderArgs {
    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Provider endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// DeepL API key
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Number of strings per batch
    #[arg(short, long)]
    batch_size: Option<usize>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    session: SessionArgs,

    #[command(flatten)]
    provider: ProviderArgs,

    /// Directory the exports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Export formats
    #[arg(short, long, value_delimiter = ',', default_value = "json,csv")]
    format: Vec<String>,

    /// Skip auto-translation and only export
    #[arg(long)]
    no_auto: bool,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Case-insensitive search in keys and English text
    #[arg(short, long)]
    search: Option<String>,

    /// Only entries of this category
    #[arg(short, long)]
    category: Option<String>,

    /// Only entries with this status
    #[arg(long, value_enum, default_value = "all")]
    status: CliStatus,
}

/// i18n-contrib - Community translation contribution tool
///
/// Translates the English UI strings of an application into another
/// language, by hand or through an external translation service.
#[derive(Parser, Debug)]
#[command(name = "i18n-contrib")]
#[command(version)]
#[command(about = "Translation contribution tool")]
#[command(long_about = "i18n-contrib turns a set of English UI strings into a translation for another language.

EXAMPLES:
    i18n-contrib translate en.json -t de                    # Auto-translate to German, export de.json and de.csv
    i18n-contrib translate en.json -t de -e de.json         # Continue an existing translation
    i18n-contrib translate en.json -t ja -p deepl           # Use DeepL (reads DEEPL_API_KEY)
    i18n-contrib stats en.json -t de -e de.json             # Show completion statistics
    i18n-contrib list en.json -e de.json --status pending   # List untranslated strings
    i18n-contrib languages                                  # Languages that still need a translation
    i18n-contrib completions bash > i18n-contrib.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    libretranslate - LibreTranslate server (default: https://translate.bambuddy.cool)
    deepl          - DeepL API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let color = Self::get_color_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "{}{} {:<5} {}\x1B[0m",
                color, now, record.level(), record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger with trace and narrow it down once the level is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "i18n-contrib", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = load_or_create_config(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Translate(args) => run_translate(config, args).await,
        Commands::Stats(args) => run_stats(config, args),
        Commands::List(args) => run_list(config, args),
        Commands::Languages => run_languages(&config),
        Commands::Check(args) => run_check(config, args).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// @loads: Configuration file, creating a default one when missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        return Config::load(config_path);
    }

    warn!("Config file not found at '{}', creating default config.", config_path);
    let config = Config::default();
    config.save(config_path)?;
    Ok(config)
}

// @applies: Session overrides from the command line
fn apply_session_args(config: &mut Config, args: &SessionArgs) -> Result<()> {
    if let Some(target_language) = &args.target_language {
        let (code, name) =
            language_utils::resolve_target_language(target_language, args.language_name.as_deref())?;
        config.target_language = code;
        config.language_name = name;
    } else if let Some(language_name) = &args.language_name {
        config.language_name = language_name.clone();
    }
    Ok(())
}

// @applies: Provider overrides from the command line
fn apply_provider_args(config: &mut Config, args: &ProviderArgs) {
    if let Some(provider) = &args.provider {
        config.translation.provider = provider.clone().into();
    }

    let provider_config = config.translation.active_provider_config_mut();
    if let Some(endpoint) = &args.endpoint {
        provider_config.endpoint = endpoint.clone();
    }
    if let Some(batch_size) = args.batch_size {
        provider_config.batch_size = batch_size;
    }
}

// @prompts: API key on the terminal when the provider needs one
fn prompt_api_key(provider: &TranslationProvider) -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    eprint!("Enter your {} API key: ", provider.display_name());
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).context("Failed to read API key")?;

    let key = line.trim().to_string();
    Ok(if key.is_empty() { None } else { Some(key) })
}

async fn run_translate(mut config: Config, args: TranslateArgs) -> Result<()> {
    apply_session_args(&mut config, &args.session)?;
    apply_provider_args(&mut config, &args.provider);

    let formats = args.format
        .iter()
        .map(|f| f.parse::<ExportFormat>())
        .collect::<Result<Vec<_>>>()?;

    let mut controller = Controller::with_config(config)?.with_api_key(args.provider.api_key.clone());
    let mut session = controller.start_session(&args.session.source, args.session.existing.as_deref())?;

    if !args.no_auto {
        if !controller.credential_known() {
            let provider = controller.config().translation.provider;
            match prompt_api_key(&provider)? {
                Some(key) => controller = controller.with_api_key(Some(key)),
                None => {
                    return Err(TranslationError::MissingCredential {
                        provider: provider.display_name().to_string(),
                    }
                    .into());
                }
            }
        }

        controller.auto_translate(&mut session).await?;
    }

    for path in controller.export(&session, &args.output_dir, &formats)? {
        info!("Success: {}", path.display());
    }
    controller.summary(&session);

    Ok(())
}

fn run_stats(mut config: Config, args: SessionArgs) -> Result<()> {
    apply_session_args(&mut config, &args)?;
    let controller = Controller::with_config(config)?;
    let session = controller.start_session(&args.source, args.existing.as_deref())?;

    controller.summary(&session);
    for category in session.categories() {
        let filter = EntryFilter {
            category: Some(category.clone()),
            ..EntryFilter::default()
        };
        let entries: Vec<_> = session.filter(&filter).collect();
        let done = entries.iter().filter(|e| !e.is_pending()).count();
        println!("{:<24} {:>4}/{:<4}", category, done, entries.len());
    }

    Ok(())
}

fn run_list(mut config: Config, args: ListArgs) -> Result<()> {
    apply_session_args(&mut config, &args.session)?;
    let controller = Controller::with_config(config)?;
    let session = controller.start_session(&args.session.source, args.session.existing.as_deref())?;

    let filter = EntryFilter {
        search: args.search,
        category: args.category,
        status: args.status.into(),
    };

    let mut count = 0;
    for entry in session.filter(&filter) {
        let marker = if entry.is_pending() {
            " "
        } else if entry.is_auto {
            "A"
        } else {
            "*"
        };
        println!("{} {}\t{}\t{}", marker, entry.key, entry.english, entry.translated);
        count += 1;
    }
    info!("{} of {} entries shown", count, session.entries().len());

    Ok(())
}

fn run_languages(config: &Config) -> Result<()> {
    let available = &config.available_languages;
    if !available.is_empty() {
        println!("Available:");
        for language in available {
            println!("  {:<6} {:<24} {:<16} {:>3}%", language.code, language.name, language.native, language.completion);
        }
    }

    println!("Suggested:");
    for language in language_utils::suggested_languages(available) {
        println!("  {:<6} {:<24} {}", language.code, language.name, language.native);
    }

    Ok(())
}

async fn run_check(mut config: Config, args: ProviderArgs) -> Result<()> {
    apply_provider_args(&mut config, &args);
    let controller = Controller::with_config(config)?.with_api_key(args.api_key.clone());

    if !controller.credential_known() {
        return Err(anyhow!(
            "{} needs an API key (--api-key or DEEPL_API_KEY)",
            controller.config().translation.provider.display_name()
        ));
    }

    controller.check_connection().await
}
