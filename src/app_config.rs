use anyhow::{anyhow, Context, Result};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::timecodes::FrameRate;
use crate::trims::ScanDirection;

/// Application configuration module
/// Preferences that used to be process-wide constants: timecode discovery,
/// the fallback frame rate, the script scan order and logging.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Suffixes appended to the script path (minus `.avs`) when looking
    /// for a timecode file, tried in order
    #[serde(default = "default_timecode_suffixes")]
    pub timecode_suffixes: Vec<String>,

    /// Frame rate used when neither `--fps` nor a timecode file is found
    #[serde(default = "default_fps")]
    pub default_fps: String,

    /// Order in which script lines are searched for Trims
    #[serde(default)]
    pub scan_direction: ScanDirection,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_timecode_suffixes() -> Vec<String> {
    [".tc.txt", ".timecode.txt", ".timecodes.txt", "timecode", "timecodes", ".txt"]
        .iter()
        .map(|suffix| suffix.to_string())
        .collect()
}

fn default_fps() -> String {
    "24000/1001".to_string()
}

impl Config {
    /// Load the configuration file, or the defaults when `path` is `None`
    /// or does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let path = path.as_ref();

        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Fallback frame rate, parsed
    pub fn default_frame_rate(&self) -> Result<FrameRate> {
        Ok(FrameRate::parse(&self.default_fps)?)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        self.default_frame_rate()
            .with_context(|| format!("Invalid default FPS: {}", self.default_fps))?;

        if self.timecode_suffixes.is_empty() {
            return Err(anyhow!("At least one timecode suffix is required"));
        }

        if self.timecode_suffixes.iter().any(|suffix| suffix.trim().is_empty()) {
            return Err(anyhow!("Timecode suffixes must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            timecode_suffixes: default_timecode_suffixes(),
            default_fps: default_fps(),
            scan_direction: ScanDirection::default(),
            log_level: LogLevel::default(),
        }
    }
}
