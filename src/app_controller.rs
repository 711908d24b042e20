use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::cutter::{cut_events, cut_frame_indexed_lines};
use crate::errors::TrimError;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{AssDocument, SubtitleCollection, SubtitleFormat};
use crate::timecodes::{FrameRate, TimecodeTable};
use crate::trims::{
    map_to_time, merge_adjacent, read_edit_points, FrameInterval, ScanDirection, TimeBase, TrimInterval,
};

// @module: Application controller for subtitle cutting

/// A path option that may be absent, requested without a value, or given
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OptionalPath {
    /// Option not given
    #[default]
    Absent,
    /// Option given without a value, derive the path
    Auto,
    /// Option given with a path
    Explicit(PathBuf),
}

impl OptionalPath {
    /// Map a clap `Option<Option<PathBuf>>` (flag with optional value)
    pub fn from_flag(value: Option<Option<PathBuf>>) -> Self {
        match value {
            None => Self::Absent,
            Some(None) => Self::Auto,
            Some(Some(path)) => Self::Explicit(path),
        }
    }
}

/// Where frame timing comes from
#[derive(Debug, Clone, PartialEq)]
pub enum FpsSource {
    /// Constant frame rate
    Rate(FrameRate),
    /// Timecode v1 or v2 file
    Timecodes(PathBuf),
}

impl fmt::Display for FpsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FpsSource::Rate(rate) => {
                // Eleven significant digits, no trailing zeros
                let fps = rate.fps();
                let int_digits = (fps.log10().floor() as i64 + 1).max(1) as usize;
                let text = format!("{:.*}", 11usize.saturating_sub(int_digits), fps);
                let shown = if text.contains('.') {
                    text.trim_end_matches('0').trim_end_matches('.')
                } else {
                    text.as_str()
                };
                f.write_str(shown)
            }
            FpsSource::Timecodes(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One cutting job, as given on the command line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrimRequest {
    /// Avisynth script holding the Trims
    pub script: PathBuf,
    /// Scan order override; the configured one when `None`
    pub scan_direction: Option<ScanDirection>,
    /// Only use a line ending in a comment equal to this label
    pub label: Option<String>,
    /// Only use this 1-based line
    pub line_number: Option<usize>,
    /// Frame rate or timecode file path
    pub fps: Option<String>,
    /// Output timecode file
    pub timecode_output: OptionalPath,
    /// Input subtitle file
    pub input: OptionalPath,
    /// Input subtitle encoding label
    pub encoding: Option<String>,
    /// Output subtitle path
    pub output: Option<PathBuf>,
}

impl TrimRequest {
    /// Request for `script` with every option absent
    pub fn new<P: Into<PathBuf>>(script: P) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }
}

/// What a run resolved and produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub script: PathBuf,
    pub scan_direction: ScanDirection,
    pub fps_source: FpsSource,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub timecode_output: Option<PathBuf>,
    /// Trims as written in the script
    pub trims: Vec<FrameInterval>,
    /// Trims after joining contiguous ones
    pub merged_trims: Vec<FrameInterval>,
    /// Kept ranges in time
    pub time_trims: Vec<TrimInterval>,
    /// Number of subtitle events or lines written
    pub events_written: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |trims: &[FrameInterval]| trims.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ");

        writeln!(f, "Avisynth script:  {}", self.script.display())?;
        writeln!(f, "FPS/timecodes:    {}", self.fps_source)?;
        if let Some(otc) = &self.timecode_output {
            writeln!(f, "Output timecodes: {}", otc.display())?;
        }
        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            writeln!(f, "Input file:       {}", input.display())?;
            writeln!(f, "Output file:      {}", output.display())?;
        }
        writeln!(f, "Trims:            {}", join(&self.trims))?;
        write!(f, "Joined Trims:     {}", join(&self.merged_trims))
    }
}

/// Main application controller for subtitle cutting
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    /// Run the whole pipeline.
    ///
    /// Files are written only once every step has succeeded: the output
    /// timecode file first, then the cut subtitle file.
    pub fn run(&self, request: &TrimRequest) -> Result<RunSummary> {
        if !FileManager::file_exists(&request.script) {
            return Err(TrimError::ScriptNotFound(request.script.clone()).into());
        }

        let input = self.resolve_input(request)?;
        let output = input
            .as_ref()
            .map(|input| request.output.clone().unwrap_or_else(|| FileManager::default_output_path(input)));
        let fps_source = self.resolve_fps_source(request)?;
        let timecode_output = match &request.timecode_output {
            OptionalPath::Absent => None,
            OptionalPath::Auto => {
                let timecodes = match &fps_source {
                    FpsSource::Timecodes(path) => Some(path.as_path()),
                    FpsSource::Rate(_) => None,
                };
                Some(FileManager::default_timecode_output(timecodes, &request.script))
            }
            OptionalPath::Explicit(path) => Some(path.clone()),
        };

        if input.is_none() && timecode_output.is_none() {
            return Err(anyhow!("Please specify an input subtitle or an output timecode file"));
        }

        let scan_direction = request.scan_direction.unwrap_or(self.config.scan_direction);
        let trims = read_edit_points(
            &request.script,
            scan_direction,
            request.label.as_deref(),
            request.line_number,
        )?;
        debug!("Trims from {:?}: {:?}", request.script, trims);

        let merged_trims = merge_adjacent(&trims)?;
        let time_base = self.load_time_base(&fps_source, &merged_trims)?;
        let mapping = map_to_time(&merged_trims, &time_base, timecode_output.is_some())?;

        let cut = match &input {
            Some(input) => Some(Self::cut_subtitle(input, request.encoding.as_deref(), &merged_trims, &mapping.intervals)?),
            None => None,
        };

        // Everything is computed, write the results
        if let (Some(path), Some(lines)) = (&timecode_output, &mapping.timecodes) {
            let mut content = lines.join("\n");
            content.push('\n');
            FileManager::write_to_file(path, &content)?;
            info!("New timecode file written: {}", path.display());
        }

        let mut events_written = 0;
        if let (Some(path), Some((content, count))) = (&output, cut) {
            FileManager::write_subtitle(path, &content)?;
            events_written = count;
            info!("New subtitle file written: {} ({} events)", path.display(), count);
        }

        Ok(RunSummary {
            script: request.script.clone(),
            scan_direction,
            fps_source,
            input,
            output,
            timecode_output,
            trims,
            merged_trims,
            time_trims: mapping.intervals,
            events_written,
        })
    }

    fn resolve_input(&self, request: &TrimRequest) -> Result<Option<PathBuf>> {
        match &request.input {
            OptionalPath::Absent => Ok(None),
            OptionalPath::Auto => FileManager::find_sibling_subtitle(&request.script)
                .map(Some)
                .ok_or_else(|| anyhow!("No subtitle file found next to {}", request.script.display())),
            OptionalPath::Explicit(path) if FileManager::file_exists(path) => Ok(Some(path.clone())),
            OptionalPath::Explicit(path) => Err(anyhow!("Invalid subtitle file path: {}", path.display())),
        }
    }

    fn resolve_fps_source(&self, request: &TrimRequest) -> Result<FpsSource> {
        match &request.fps {
            Some(value) if FileManager::file_exists(value) => Ok(FpsSource::Timecodes(PathBuf::from(value))),
            Some(value) => Ok(FpsSource::Rate(
                FrameRate::parse(value).context("Invalid FPS value or timecode file path")?,
            )),
            None => match FileManager::find_timecode_file(&request.script, &self.config.timecode_suffixes) {
                Some(path) => {
                    debug!("Using timecode file {:?}", path);
                    Ok(FpsSource::Timecodes(path))
                }
                None => Ok(FpsSource::Rate(self.config.default_frame_rate()?)),
            },
        }
    }

    fn load_time_base(&self, source: &FpsSource, trims: &[FrameInterval]) -> Result<TimeBase> {
        match source {
            FpsSource::Rate(rate) => Ok(TimeBase::Constant(*rate)),
            FpsSource::Timecodes(path) => {
                let content = FileManager::read_to_string(path)?;
                let lines: Vec<&str> = content.lines().collect();
                let last_frame = trims.last().map_or(0, |trim| trim.end);
                let table = TimecodeTable::parse(&lines, self.config.default_frame_rate()?, last_frame)
                    .with_context(|| format!("Failed to read timecode file: {}", path.display()))?;
                Ok(TimeBase::Table(table))
            }
        }
    }

    /// Decode, cut and re-serialize one subtitle file
    fn cut_subtitle(
        input: &Path,
        encoding: Option<&str>,
        frames: &[FrameInterval],
        times: &[TrimInterval],
    ) -> Result<(String, usize)> {
        let format = SubtitleFormat::from_path(input)?;
        let content = FileManager::read_subtitle(input, encoding)?;
        debug!("Cutting {} file {:?}", format, input);

        match format {
            SubtitleFormat::MicroDvd => {
                let lines: Vec<&str> = content.lines().collect();
                let cut = cut_frame_indexed_lines(frames, &lines)?;
                Ok((cut.concat(), cut.len()))
            }
            SubtitleFormat::Srt => {
                let mut collection = SubtitleCollection::from_srt_string(input.to_path_buf(), &content)?;
                collection.entries = cut_events(times, &collection.entries);
                Ok((collection.to_srt_string(), collection.entries.len()))
            }
            SubtitleFormat::Ass | SubtitleFormat::Ssa => {
                let document = AssDocument::parse(&content)?;
                let events = cut_events(times, &document.events);
                Ok((document.render_with(&events), events.len()))
            }
        }
    }
}
