// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{debug, error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use trimsubs::app_config::{self, Config};
use trimsubs::app_controller::{Controller, OptionalPath, TrimRequest};
use trimsubs::trims::ScanDirection;

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
    /// Generate shell completions for trimsubs
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// TrimSubs - cut and resync text subtitles according to Avisynth Trims
#[derive(Parser, Debug)]
#[command(name = "trimsubs")]
#[command(version)]
#[command(about = "Cut and resync text subtitle files according to Trims in an existing Avisynth script")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "Cut and resync text subtitle files according to Trims in an existing Avisynth script.

Reads the Trims of one line of the script, joins contiguous ones, and drops,
clips and shifts every subtitle line to the trimmed timeline. Supported
inputs: ASS, SSA, SRT and MicroDVD (.sub). Either --input or --otc is required.

EXAMPLES:
    trimsubs movie.avs -i                      # Cut movie.ass/.ssa/.srt/.sub next to the script
    trimsubs movie.avs -i subs.srt -o out.srt  # Explicit input and output
    trimsubs movie.avs -f 30000/1001 -i        # Constant frame rate
    trimsubs movie.avs -f movie.tc.txt -i -t   # Timecodes, also write movie.otc.txt
    trimsubs movie.avs -l ep01 -i              # Use the line ending in '# ep01'
    trimsubs completions bash > trimsubs.bash  # Generate bash completions")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Avisynth script containing Trims
    #[arg(value_name = "SCRIPT.AVS")]
    script: Option<PathBuf>,

    /// Show detailed info
    #[arg(short, long)]
    verbose: bool,

    /// Parse the script from bottom to top
    #[arg(short, long)]
    reversed: bool,

    /// Use the Trims from the line that ends in a comment with LABEL
    #[arg(short, long)]
    label: Option<String>,

    /// Use the Trims from line number LINE
    #[arg(short = 'g', long = "line", value_name = "LINE")]
    line: Option<usize>,

    /// Frame rate or timecode file (v1 or v2). If omitted, search for a
    /// timecode file or use the configured default
    #[arg(short, long, value_name = "FPS|TIMECODES")]
    fps: Option<String>,

    /// Output a new timecode file. Path optional
    #[arg(short = 't', long = "otc", value_name = "OTC", num_args = 0..=1)]
    otc: Option<Option<PathBuf>>,

    /// Input subtitle file. If INPUT is omitted, search next to the script
    #[arg(short, long, value_name = "INPUT", num_args = 0..=1)]
    input: Option<Option<PathBuf>>,

    /// Input subtitle file encoding
    #[arg(short = 'c', long)]
    encoding: Option<String>,

    /// Custom path for the output subtitle file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file path
    #[arg(long = "config", value_name = "PATH", env = "TRIMSUBS_CONFIG")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
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

    // @returns: ANSI color and tag for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> ExitCode {
    // Everything is filtered by the max level, set once the config is known
    if CustomLogger::init(LevelFilter::Trace).is_err() {
        eprintln!("Failed to initialize logger");
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "trimsubs", &mut std::io::stdout());
        return ExitCode::SUCCESS;
    }

    match run_trim(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_trim(options: CommandLineOptions) -> Result<()> {
    let Some(script) = options.script else {
        let mut cmd = CommandLineOptions::command();
        let _ = cmd.print_help();
        return Err(anyhow::anyhow!("SCRIPT.AVS is required when no subcommand is specified"));
    };

    let mut config = Config::load_or_default(options.config_path.as_ref())?;

    // Command line wins over the config file, --verbose over both
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
    if options.verbose && config.log_level.to_level_filter() < LevelFilter::Debug {
        config.log_level = app_config::LogLevel::Debug;
    }
    log::set_max_level(config.log_level.to_level_filter());
    debug!("Configuration: {:?}", config);

    let request = TrimRequest {
        script,
        scan_direction: options.reversed.then_some(ScanDirection::BottomToTop),
        label: options.label,
        line_number: options.line,
        fps: options.fps,
        timecode_output: OptionalPath::from_flag(options.otc),
        input: OptionalPath::from_flag(options.input),
        encoding: options.encoding,
        output: options.output,
    };

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&request)?;

    if options.verbose {
        info!("\n{}", summary);
    }

    Ok(())
}
