/*!
 * Frame timing tables.
 *
 * A `TimecodeTable` maps frame numbers to cumulative presentation times in
 * milliseconds. Tables come from timecode v2 files (one value per frame),
 * from timecode v1 files (sparse per-range frame rates, expanded here), or
 * are synthesized from a constant `FrameRate`.
 */

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TrimError;

/// Header of a timecode v1 file
pub const TIMECODE_V1_HEADER: &str = "# timecode format v1";

/// Header of a timecode v2 file
pub const TIMECODE_V2_HEADER: &str = "# timecode format v2";

static ASSUME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*assume\s+(\S+)\s*$").unwrap()
});

/// A constant frame rate in frames per second
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Create a frame rate, rejecting zero, negative and non-finite values
    pub fn new(fps: f64) -> Result<Self, TrimError> {
        if fps.is_finite() && fps > 0.0 {
            Ok(Self(fps))
        } else {
            Err(TrimError::InvalidFpsValue(fps.to_string()))
        }
    }

    /// Parse a float (`23.976`) or a fraction (`24000/1001`, `30000:1001`)
    pub fn parse(value: &str) -> Result<Self, TrimError> {
        let invalid = || TrimError::InvalidFpsValue(value.to_string());

        let parts = value
            .split(['/', ':'])
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        let fps = match parts.as_slice() {
            [fps] => *fps,
            [numerator, denominator] if *denominator != 0.0 => numerator / denominator,
            _ => return Err(invalid()),
        };

        Self::new(fps).map_err(|_| invalid())
    }

    /// Frames per second
    pub fn fps(&self) -> f64 {
        self.0
    }

    /// Duration of one frame in milliseconds
    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / self.0
    }

    /// Start time of `frame` in milliseconds
    pub fn frame_to_ms(&self, frame: u64) -> f64 {
        frame as f64 * 1000.0 / self.0
    }

    /// Length of `frames` frames in milliseconds (may be negative)
    pub fn frames_to_ms(&self, frames: i64) -> f64 {
        frames as f64 * 1000.0 / self.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-frame cumulative timestamps in milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct TimecodeTable {
    times: Vec<f64>,
}

/// Version of a timecode file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimecodeFormat {
    V1,
    V2,
}

impl TimecodeFormat {
    /// Recognize a header line
    pub fn from_header(header: &str) -> Result<Self, TrimError> {
        let normalized = header.trim().trim_start_matches('\u{feff}').to_lowercase();
        match normalized.as_str() {
            TIMECODE_V1_HEADER => Ok(Self::V1),
            TIMECODE_V2_HEADER => Ok(Self::V2),
            _ => Err(TrimError::InvalidTimecodeHeader(header.trim().to_string())),
        }
    }
}

/// One `start,end,fps` range of a v1 file
#[derive(Debug, Clone, Copy, PartialEq)]
struct RateRange {
    start: u64,
    end: u64,
    fps: f64,
    line_number: usize,
}

impl TimecodeTable {
    /// Wrap already computed times
    pub fn from_times(times: Vec<f64>) -> Self {
        Self { times }
    }

    /// Synthesize the table of `frames` frames at a constant rate.
    ///
    /// The result has `frames + 1` entries: the start of every frame plus
    /// the end boundary of the last one.
    pub fn from_fps(rate: FrameRate, frames: u64) -> Self {
        let step = rate.frame_duration_ms();
        let times = (0..=frames).map(|i| step * i as f64).collect();
        Self { times }
    }

    /// Build a table from the full contents of a timecode file.
    ///
    /// `fallback_fps` fills v1 gaps when the file has no `Assume` line and
    /// `last_frame` is the last frame a caller will ask for.
    pub fn parse<S: AsRef<str>>(
        lines: &[S],
        fallback_fps: FrameRate,
        last_frame: u64,
    ) -> Result<Self, TrimError> {
        let header = lines
            .first()
            .map(|line| line.as_ref())
            .unwrap_or_default();

        match TimecodeFormat::from_header(header)? {
            TimecodeFormat::V1 => Self::from_v1_lines(&lines[1..], fallback_fps, last_frame),
            TimecodeFormat::V2 => Self::from_v2_lines(&lines[1..]),
        }
    }

    /// Build a table from the body (header excluded) of a v2 file
    pub fn from_v2_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, TrimError> {
        let mut times = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let value: f64 = trimmed.parse().map_err(|_| TrimError::MalformedTimecodeLine {
                line_number: index + 2,
                content: trimmed.to_string(),
                reason: "expected a timestamp in milliseconds".to_string(),
            })?;

            if let Some(previous) = times.last() {
                if value < *previous {
                    return Err(TrimError::MalformedTimecodeLine {
                        line_number: index + 2,
                        content: trimmed.to_string(),
                        reason: format!("timestamp decreases from {:.3}", previous),
                    });
                }
            }

            times.push(value);
        }

        debug!("Read {} timecode v2 entries", times.len());
        Ok(Self { times })
    }

    /// Build the v2-equivalent table from the body (header excluded) of a v1 file
    pub fn from_v1_lines<S: AsRef<str>>(
        lines: &[S],
        fallback_fps: FrameRate,
        last_frame: u64,
    ) -> Result<Self, TrimError> {
        let mut default_fps = fallback_fps.fps();
        let mut declared = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 2;
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(caps) = ASSUME_REGEX.captures(trimmed) {
                default_fps = FrameRate::parse(&caps[1])
                    .map_err(|_| malformed_v1(line_number, trimmed, "invalid Assume frame rate"))?
                    .fps();
                continue;
            }

            declared.push(parse_rate_range(line_number, trimmed)?);
        }

        declared.sort_by_key(|range| range.start);
        for pair in declared.windows(2) {
            if pair[1].start <= pair[0].end {
                return Err(TrimError::MalformedTimecodeLine {
                    line_number: pair[1].line_number,
                    content: format!("{},{},{}", pair[1].start, pair[1].end, pair[1].fps),
                    reason: format!(
                        "range overlaps {},{} from line {}",
                        pair[0].start, pair[0].end, pair[0].line_number
                    ),
                });
            }
        }

        // Frames past the last kept one never reach the table
        let needed: Vec<RateRange> = declared
            .iter()
            .filter(|range| range.start <= last_frame)
            .map(|range| RateRange { end: range.end.min(last_frame), ..*range })
            .collect();

        let ranges = fill_gaps(&needed, default_fps, last_frame)?;
        debug!(
            "Timecode v1: {} declared ranges, {} after filling gaps at {} fps",
            declared.len(),
            ranges.len(),
            default_fps
        );

        let too_large = || TrimError::TimecodeFrameOutOfRange { frame: last_frame, len: 0 };
        let frame_count = ranges
            .iter()
            .try_fold(1u64, |total, r| (r.end - r.start).checked_add(1).and_then(|n| total.checked_add(n)))
            .and_then(|total| usize::try_from(total).ok())
            .ok_or_else(too_large)?;
        let mut times = Vec::new();
        times.try_reserve_exact(frame_count).map_err(|_| too_large())?;
        times.push(0.0);

        let mut offset = 0.0;
        for range in &ranges {
            let step = 1000.0 / range.fps;
            for k in 1..=(range.end - range.start + 1) {
                times.push(offset + step * k as f64);
            }
            offset = times[times.len() - 1];
        }

        Ok(Self { times })
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// All entries in frame order
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Cumulative time of `frame` in milliseconds.
    ///
    /// One past the last entry is extrapolated so that the last frame lasts
    /// as long as the one before it.
    pub fn time_at(&self, frame: u64) -> Result<f64, TrimError> {
        let len = self.times.len();
        let out_of_range = TrimError::TimecodeFrameOutOfRange { frame, len };

        let index = usize::try_from(frame).map_err(|_| out_of_range.clone())?;
        if index < len {
            return Ok(self.times[index]);
        }

        if index == len && len >= 2 {
            let last = self.times[len - 1];
            let second_to_last = self.times[len - 2];
            return Ok(2.0 * last - second_to_last);
        }

        Err(out_of_range)
    }

    /// Render as a timecode v2 file, one line per entry, header first
    pub fn to_v2_lines(&self) -> Vec<String> {
        std::iter::once(TIMECODE_V2_HEADER.to_string())
            .chain(self.times.iter().map(|time| format!("{:.3}", time)))
            .collect()
    }
}

fn malformed_v1(line_number: usize, content: &str, reason: &str) -> TrimError {
    TrimError::MalformedTimecodeLine {
        line_number,
        content: content.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_rate_range(line_number: usize, line: &str) -> Result<RateRange, TrimError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [start, end, fps] = fields.as_slice() else {
        return Err(malformed_v1(line_number, line, "expected start,end,fps"));
    };

    let start: u64 = start
        .parse()
        .map_err(|_| malformed_v1(line_number, line, "invalid start frame"))?;
    let end: u64 = end
        .parse()
        .map_err(|_| malformed_v1(line_number, line, "invalid end frame"))?;
    let fps = FrameRate::parse(fps)
        .map_err(|_| malformed_v1(line_number, line, "invalid frame rate"))?
        .fps();

    if end < start {
        return Err(malformed_v1(line_number, line, "end frame before start frame"));
    }

    Ok(RateRange { start, end, fps, line_number })
}

/// Cover `0..=last_frame` (and every declared range) with ranges, using
/// `default_fps` wherever nothing was declared
fn fill_gaps(declared: &[RateRange], default_fps: f64, last_frame: u64) -> Result<Vec<RateRange>, TrimError> {
    let mut ranges = Vec::with_capacity(declared.len() * 2 + 1);
    let mut next_frame = Some(0);

    for range in declared {
        let Some(start) = next_frame else {
            return Err(malformed_v1(
                range.line_number,
                &format!("{},{},{}", range.start, range.end, range.fps),
                "range starts past the last representable frame",
            ));
        };
        if range.start > start {
            ranges.push(RateRange {
                start,
                end: range.start - 1,
                fps: default_fps,
                line_number: 0,
            });
        }
        ranges.push(*range);
        next_frame = range.end.checked_add(1);
    }

    if let Some(start) = next_frame.filter(|start| last_frame >= *start) {
        ranges.push(RateRange {
            start,
            end: last_frame,
            fps: default_fps,
            line_number: 0,
        });
    }

    Ok(ranges)
}
