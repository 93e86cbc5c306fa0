#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use srtinterp::app_config::{self, Config, ConfigMode};
use srtinterp::app_controller::{Controller, RunOptions};
use srtinterp::errors::ExecutionError;
use srtinterp::export::ExportFormat;
use srtinterp::language_utils::TargetLanguage;

/// CLI wrapper for the playback mode
#[derive(Debug, Clone, ValueEnum)]
enum CliMode {
    Sequential,
    #[value(name = "real_time")]
    RealTime,
    Accelerated,
}

impl From<CliMode> for ConfigMode {
    fn from(mode: CliMode) -> Self {
        match mode {
            CliMode::Sequential => ConfigMode::Sequential,
            CliMode::RealTime => ConfigMode::RealTime,
            CliMode::Accelerated => ConfigMode::Accelerated,
        }
    }
}

/// CLI wrapper for the target language
#[derive(Debug, Clone, ValueEnum)]
enum CliLanguage {
    English,
    Filipino,
    Tagalog,
    Korean,
    Chinese,
    Japanese,
}

impl From<CliLanguage> for TargetLanguage {
    fn from(lang: CliLanguage) -> Self {
        match lang {
            CliLanguage::English => TargetLanguage::English,
            CliLanguage::Filipino => TargetLanguage::Filipino,
            CliLanguage::Tagalog => TargetLanguage::Tagalog,
            CliLanguage::Korean => TargetLanguage::Korean,
            CliLanguage::Chinese => TargetLanguage::Chinese,
            CliLanguage::Japanese => TargetLanguage::Japanese,
        }
    }
}

/// CLI wrapper for the export format
#[derive(Debug, Clone, ValueEnum)]
enum CliExportFormat {
    Plain,
    Numbered,
    Separated,
    Srt,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(format: CliExportFormat) -> Self {
        match format {
            CliExportFormat::Plain => ExportFormat::Plain,
            CliExportFormat::Numbered => ExportFormat::Numbered,
            CliExportFormat::Separated => ExportFormat::Separated,
            CliExportFormat::Srt => ExportFormat::Srt,
        }
    }
}

/// CLI wrapper for LogLevel
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
    /// Generate shell completions for srtinterp
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtinterp - SRT subtitle interpreter
///
/// Lexes, parses and plays a SubRip subtitle file in the terminal,
/// optionally translating it first.
#[derive(Parser, Debug)]
#[command(name = "srtinterp")]
#[command(version)]
#[command(about = "Interpret SRT subtitle files as timed display programs")]
#[command(long_about = "srtinterp validates an .srt file and plays it as a stream of DISPLAY/CLEAR events.

EXAMPLES:
    srtinterp movie.srt                               # Sequential playback, 500 ms steps
    srtinterp movie.srt --mode real_time              # Honour the subtitle timing
    srtinterp movie.srt --mode accelerated --speed 10 # Ten times faster
    srtinterp movie.srt --lang korean                 # Translate before playback
    srtinterp movie.srt --export-format srt --export-path out.srt
    srtinterp completions bash > srtinterp.bash

CONFIGURATION:
    Defaults are read from conf.json (see --config-path). A default file is
    created when none exists. Command line flags override the file.")]
#[command(args_conflicts_with_subcommands = true)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file to interpret
    #[arg(value_name = "FILE")]
    input_file: Option<PathBuf>,

    /// Playback mode
    #[arg(short, long, value_enum)]
    mode: Option<CliMode>,

    /// Speed factor for accelerated mode
    #[arg(short, long)]
    speed: Option<f64>,

    /// Target language for translation
    #[arg(long, value_enum)]
    lang: Option<CliLanguage>,

    /// Export the subtitles in this format
    #[arg(long, value_enum, requires = "export_path")]
    export_format: Option<CliExportFormat>,

    /// Export destination
    #[arg(long, requires = "export_format")]
    export_path: Option<PathBuf>,

    /// Print subtitle statistics before playback
    #[arg(long)]
    stats: bool,

    /// Strip formatting tags instead of rendering them
    #[arg(long)]
    no_format: bool,

    /// Do not read or write the translation cache
    #[arg(long)]
    no_cache: bool,

    /// Print every event immediately instead of waiting
    #[arg(long)]
    dry_run: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
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

    // @returns: ANSI colour and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", " "),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
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
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(std::io::stderr(), "{}{} {} {}\x1B[0m", colour, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Everything is let through here; the effective level is set once the
    // config is loaded.
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialise logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "srtinterp", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run(cli).await {
        let interrupted = e
            .downcast_ref::<ExecutionError>()
            .is_some_and(|e| *e == ExecutionError::Interrupted);
        if interrupted {
            error!("Interrupted by user");
            std::process::exit(130);
        }
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_file = options
        .input_file
        .clone()
        .context("FILE is required when no subcommand is given")?;

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);
    config.validate().context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    let run_options = RunOptions {
        export: options
            .export_format
            .clone()
            .zip(options.export_path.clone())
            .map(|(format, path)| (format.into(), path)),
        show_stats: options.stats,
        dry_run: options.dry_run,
        skip_playback: false,
    };

    // The signal is raced against the whole run so ctrl-c during loading or
    // translation is honoured too. Interrupting also releases a blocked
    // playback thread.
    let handle = controller.interrupt_handle();
    tokio::select! {
        result = controller.run(&input_file, &run_options) => {
            result?;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for ctrl-c")?;
            handle.interrupt();
            return Err(ExecutionError::Interrupted.into());
        }
    }
    info!("Playback complete");
    Ok(())
}

fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(mode) = &options.mode {
        config.mode = mode.clone().into();
    }
    if let Some(speed) = options.speed {
        config.speed_factor = speed;
    }
    if let Some(lang) = &options.lang {
        config.target_language = lang.clone().into();
    }
    if options.no_format {
        config.enable_formatting = false;
    }
    if options.no_cache {
        config.translation.use_cache = false;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    }
}
