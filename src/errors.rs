/*!
 * Error types for the trimsubs application.
 *
 * The cutting engine reports `TrimError`, the subtitle readers and the
 * text decoder report `SubtitleError`. The controller and the CLI carry
 * both inside `anyhow::Error`, so callers can downcast to either.
 */

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which line selector was active when no Trim line could be found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchContext {
    /// Whole script, first match in scan order
    Unrestricted,
    /// Only lines ending in a comment equal to the label
    Label(String),
    /// Only the given 1-based line
    LineNumber(usize),
}

impl fmt::Display for MatchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchContext::Unrestricted => write!(f, "in the script"),
            MatchContext::Label(label) => write!(f, "with label '{}'", label),
            MatchContext::LineNumber(line) => write!(f, "in the specified line: {}", line),
        }
    }
}

/// Errors produced while extracting, mapping and cutting Trims
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrimError {
    /// The editing script does not exist
    #[error("Avisynth script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// No line with Trims matched the active selector
    #[error("No Trims found {context}")]
    NoMatchingLine {
        /// Selector in use
        context: MatchContext,
    },

    /// Line numbers start at 1
    #[error("Invalid line number: {0} (line numbers start at 1)")]
    InvalidLineNumber(usize),

    /// A Trim pair resolves to a frame range ending before it starts
    #[error("Invalid Trim({start}, {end}): computed end frame {computed_end} is before the start frame")]
    InvalidEditPoint {
        /// First member of the pair
        start: i64,
        /// Second member of the pair, as written
        end: i64,
        /// End frame after applying the negative-count rule
        computed_end: i64,
    },

    /// Two frame intervals overlap or are out of order
    #[error("Overlapping Trims: ({first_start}, {first_end}) and ({second_start}, {second_end})")]
    OverlappingIntervals {
        first_start: u64,
        first_end: u64,
        second_start: u64,
        second_end: u64,
    },

    /// Header line is neither v1 nor v2
    #[error("Invalid timecode file header: '{0}'")]
    InvalidTimecodeHeader(String),

    /// A timecode line could not be understood
    #[error("Malformed timecode line {line_number}: '{content}' ({reason})")]
    MalformedTimecodeLine {
        /// 1-based line number in the timecode file
        line_number: usize,
        /// Offending line
        content: String,
        /// What was wrong with it
        reason: String,
    },

    /// Frame rate is not a positive number or fraction
    #[error("Invalid FPS value: '{0}'")]
    InvalidFpsValue(String),

    /// A Trim references a frame the timecode table does not cover
    #[error("Frame {frame} is out of range for a timecode table with {len} entries")]
    TimecodeFrameOutOfRange {
        frame: u64,
        len: usize,
    },

    /// A frame-indexed subtitle line without the `{start}{end}` prefix
    #[error("Malformed subtitle line {line_number}: '{content}'")]
    MalformedSubtitleLine {
        line_number: usize,
        content: String,
    },
}

/// Errors that can occur while reading or writing subtitle files
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Bytes could not be decoded with the requested or detected encoding
    #[error("Cannot decode {} with {encoding}, please specify the correct encoding", path.display())]
    EncodingDecodeFailure {
        path: PathBuf,
        encoding: String,
    },

    /// The encoding label is not known
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    /// The file extension is not a supported subtitle format
    #[error("Unsupported subtitle format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An event line could not be parsed
    #[error("Malformed subtitle event at line {line_number}: {reason}")]
    MalformedEvent {
        line_number: usize,
        reason: String,
    },
}
