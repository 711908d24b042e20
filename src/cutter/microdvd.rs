use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TrimError;
use crate::trims::FrameInterval;

// @const: MicroDVD frame prefix
static FRAMES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\{(\d+)\}\{(\d+)\}").unwrap());

/// One `{start}{end}payload` line
#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameLine<'a> {
    start: i64,
    end: i64,
    payload: &'a str,
}

impl<'a> FrameLine<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let caps = FRAMES_REGEX.captures(line)?;
        let start = caps[1].parse().ok()?;
        let end = caps[2].parse().ok()?;
        let prefix_len = caps.get(0)?.end();

        Some(Self {
            start,
            end,
            payload: &line[prefix_len..],
        })
    }

    /// `{1}{1}` on the first line holds the frame rate, not a subtitle
    fn is_header(&self) -> bool {
        self.start == 1 && self.end == 1
    }
}

/// Cut MicroDVD lines directly in frame space.
///
/// A first line `{1}{1}...` is copied verbatim and never cut. For every kept
/// range, lines with `start < range.end` and `end > range.start` are clipped
/// to the range and moved back by the frames removed so far. Every output
/// line ends with a newline.
pub fn cut_frame_indexed_lines<S: AsRef<str>>(
    intervals: &[FrameInterval],
    lines: &[S],
) -> Result<Vec<String>, TrimError> {
    let mut output = Vec::new();
    let mut parsed = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        let frame_line = FrameLine::parse(line).ok_or_else(|| TrimError::MalformedSubtitleLine {
            line_number: index + 1,
            content: line.to_string(),
        })?;

        if index == 0 && frame_line.is_header() {
            output.push(format!("{}\n", line));
            continue;
        }
        parsed.push(frame_line);
    }

    let mut previous_end: i64 = -1;
    for interval in intervals {
        let range_start = interval.start as i64;
        let range_end = interval.end as i64;
        let offset = range_start - previous_end - 1;
        previous_end = range_end - offset;

        for line in &parsed {
            if line.start >= range_end || line.end <= range_start {
                continue;
            }

            let start = line.start.max(range_start) - offset;
            let end = line.end.min(range_end) - offset;
            output.push(format!("{{{}}}{{{}}}{}\n", start, end, line.payload));
        }
    }

    debug!("Kept {} MicroDVD lines of {}", output.len(), lines.len());
    Ok(output)
}
