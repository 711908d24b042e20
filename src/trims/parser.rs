use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::errors::{MatchContext, TrimError};
use crate::trims::FrameInterval;

// @module: Trim extraction from Avisynth scripts

// @const: One Trim call, case-insensitive
static TRIM_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bTrim\s*\(\s*(\d+)\s*,\s*(-?\d+)\s*\)").unwrap()
});

/// Order in which script lines are searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDirection {
    #[default]
    TopToBottom,
    BottomToTop,
}

/// Read a script file and extract the Trims of the selected line
pub fn read_edit_points<P: AsRef<Path>>(
    script: P,
    direction: ScanDirection,
    label: Option<&str>,
    line_number: Option<usize>,
) -> Result<Vec<FrameInterval>, TrimError> {
    let script = script.as_ref();
    let bytes = fs::read(script).map_err(|_| TrimError::ScriptNotFound(script.to_path_buf()))?;
    let content = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = content.lines().collect();

    parse_edit_points(&lines, direction, label, line_number)
}

/// Extract the Trims of the first matching line.
///
/// With `line_number` (1-based) only that line is examined and `label` is
/// ignored. Otherwise lines are searched in `direction` and, with a label,
/// only lines ending in a `#` comment equal to it are accepted.
pub fn parse_edit_points<S: AsRef<str>>(
    lines: &[S],
    direction: ScanDirection,
    label: Option<&str>,
    line_number: Option<usize>,
) -> Result<Vec<FrameInterval>, TrimError> {
    if let Some(number) = line_number {
        if number == 0 {
            return Err(TrimError::InvalidLineNumber(number));
        }

        let no_match = || TrimError::NoMatchingLine {
            context: MatchContext::LineNumber(number),
        };
        let line = lines.get(number - 1).ok_or_else(no_match)?.as_ref();
        if !has_trims(line) {
            return Err(no_match());
        }

        debug!("Using Trims from line {}", number);
        return scan_pairs(code_part(line));
    }

    let label = label.map(str::trim).filter(|label| !label.is_empty());
    let matches = |line: &&S| {
        let line = line.as_ref();
        has_trims(line) && label.is_none_or(|label| comment_matches(line, label))
    };

    let found = match direction {
        ScanDirection::TopToBottom => lines.iter().find(matches),
        ScanDirection::BottomToTop => lines.iter().rev().find(matches),
    };

    match found {
        Some(line) => scan_pairs(code_part(line.as_ref())),
        None => Err(TrimError::NoMatchingLine {
            context: label.map_or(MatchContext::Unrestricted, |l| MatchContext::Label(l.to_string())),
        }),
    }
}

/// Text before the first `#`
fn code_part(line: &str) -> &str {
    line.split_once('#').map_or(line, |(code, _)| code)
}

fn has_trims(line: &str) -> bool {
    TRIM_REGEX.is_match(code_part(line))
}

fn comment_matches(line: &str, label: &str) -> bool {
    line.split_once('#')
        .is_some_and(|(_, comment)| comment.trim().eq_ignore_ascii_case(label))
}

/// Collect every pair of `code`, right to left, then restore source order.
///
/// Each step looks for the last match before the current boundary and moves
/// the boundary to that match's start; the scan ends when nothing is left.
fn scan_pairs(code: &str) -> Result<Vec<FrameInterval>, TrimError> {
    let mut pairs = Vec::new();
    let mut boundary = code.len();

    while let Some(caps) = TRIM_REGEX.captures_iter(&code[..boundary]).last() {
        pairs.push(resolve_pair(&caps)?);
        boundary = caps.get(0).map_or(0, |m| m.start());
    }

    pairs.reverse();
    debug!(
        "Found {} Trims: {}",
        pairs.len(),
        pairs.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(", ")
    );
    Ok(pairs)
}

/// Apply Avisynth's pair semantics: a non-positive second member is a
/// negative frame count starting at the first one
fn resolve_pair(caps: &Captures) -> Result<FrameInterval, TrimError> {
    let start: i64 = caps[1].parse().map_err(|_| overflow(&caps[1], &caps[2]))?;
    let end: i64 = caps[2].parse().map_err(|_| overflow(&caps[1], &caps[2]))?;

    let computed_end = if end > 0 {
        end
    } else {
        start
            .checked_sub(end)
            .and_then(|v| v.checked_sub(1))
            .ok_or_else(|| overflow(&caps[1], &caps[2]))?
    };

    if computed_end < start {
        return Err(TrimError::InvalidEditPoint { start, end, computed_end });
    }

    Ok(FrameInterval::new(start as u64, computed_end as u64))
}

fn overflow(start: &str, end: &str) -> TrimError {
    TrimError::InvalidEditPoint {
        start: start.parse().unwrap_or(i64::MAX),
        end: end.parse().unwrap_or(i64::MIN),
        computed_end: i64::MIN,
    }
}
