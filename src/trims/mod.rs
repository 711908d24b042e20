/*!
 * Trim extraction and conversion.
 *
 * - `parser`: reads `Trim(a, b)` pairs from one line of an Avisynth script
 * - `merge`: joins Trims that are perfectly contiguous
 * - `mapper`: turns frame ranges into time ranges with a shift per range
 */

pub mod mapper;
pub mod merge;
pub mod parser;

use std::fmt;

use crate::timecodes::FrameRate;

pub use mapper::{map_to_time, TimeBase, TrimMapping};
pub use merge::merge_adjacent;
pub use parser::{parse_edit_points, read_edit_points, ScanDirection};

/// Inclusive range of source frames to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameInterval {
    /// First kept frame
    pub start: u64,
    /// Last kept frame
    pub end: u64,
}

#[allow(clippy::len_without_is_empty)]
impl FrameInterval {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(end >= start, "frame interval must not end before it starts");
        Self { start, end }
    }

    /// Number of frames kept
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for FrameInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.start, self.end)
    }
}

/// How a kept range is moved onto the output timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimShift {
    /// Source frames removed before the range (constant frame rate)
    Frames { frames: i64, rate: FrameRate },
    /// Milliseconds removed before the range (timecode table)
    Time(f64),
}

/// Time-domain counterpart of a `FrameInterval`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimInterval {
    /// Start of the first kept frame, in ms
    pub start_ms: f64,
    /// End of the last kept frame, in ms (exclusive)
    pub end_ms: f64,
    /// Gap closed before this range
    pub shift: TrimShift,
}

impl TrimShift {
    /// Amount to subtract from every timestamp inside the range, in ms
    pub fn as_ms(&self) -> f64 {
        match *self {
            TrimShift::Frames { frames, rate } => rate.frames_to_ms(frames),
            TrimShift::Time(ms) => ms,
        }
    }
}

impl fmt::Display for TrimInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3} ms, {:.3} ms, ", self.start_ms, self.end_ms)?;
        match self.shift {
            TrimShift::Frames { frames, .. } => write!(f, "frame shift: -{})", frames),
            TrimShift::Time(ms) => write!(f, "time shift: -{:.3} ms)", ms),
        }
    }
}
