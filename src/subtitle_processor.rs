use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cutter::TimedEvent;
use crate::errors::SubtitleError;

// @module: Subtitle reading and writing

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})\s*-->\s*(\d{1,2}):(\d{2}):(\d{2})[,.](\d{1,3})").unwrap()
});

// @const: ASS/SSA timestamp regex (H:MM:SS.cc)
static ASS_TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+):(\d{1,2}):(\d{1,2})[.:](\d{1,3})\s*$").unwrap()
});

/// Text subtitle formats the tool can cut
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Ass,
    Ssa,
    Srt,
    MicroDvd,
}

impl SubtitleFormat {
    /// Every supported format, in sibling-search order
    pub const ALL: [SubtitleFormat; 4] = [Self::Ass, Self::Ssa, Self::Srt, Self::MicroDvd];

    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ass => "ass",
            Self::Ssa => "ssa",
            Self::Srt => "srt",
            Self::MicroDvd => "sub",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
            .ok_or_else(|| SubtitleError::UnsupportedFormat(path.to_path_buf()))
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ass => "ASS",
            Self::Ssa => "SSA",
            Self::Srt => "SRT",
            Self::MicroDvd => "MicroDVD",
        };
        write!(f, "{}", name)
    }
}

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self> {
        if end_time_ms < start_time_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_time_ms, start_time_ms
            ));
        }

        let trimmed_text = text.trim_end();
        if trimmed_text.trim_start().is_empty() {
            return Err(anyhow!("Empty subtitle text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text: trimmed_text.to_string(),
        })
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_time_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_time_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

impl TimedEvent for SubtitleEntry {
    fn start_ms(&self) -> i64 {
        self.start_time_ms as i64
    }

    fn end_ms(&self) -> i64 {
        self.end_time_ms as i64
    }

    fn set_timing(&mut self, start_ms: i64, end_ms: i64) {
        self.start_time_ms = start_ms.max(0) as u64;
        self.end_time_ms = end_ms.max(0) as u64;
    }
}

/// Collection of SRT entries with their source file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of subtitle entries
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Parse SRT content read from `source_file`
    pub fn from_srt_string(source_file: PathBuf, content: &str) -> Result<Self> {
        let entries = Self::parse_srt_string(content)
            .with_context(|| format!("Failed to parse SRT file: {}", source_file.display()))?;
        Ok(SubtitleCollection { source_file, entries })
    }

    /// Render all entries as SRT, renumbered from 1
    pub fn to_srt_string(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| SubtitleEntry { seq_num: i + 1, ..entry.clone() }.to_string())
            .collect()
    }

    /// Parse SRT format string into subtitle entries, keeping file order
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();

        // State variables for parsing
        let mut current_seq_num: Option<usize> = None;
        let mut current_start_time_ms: Option<u64> = None;
        let mut current_end_time_ms: Option<u64> = None;
        let mut current_text = String::new();

        let mut add_current_entry = |seq_num: usize, start_ms: u64, end_ms: u64, text: &str| {
            match SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text.to_string()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping invalid subtitle entry {}: {}", seq_num, e),
            }
        };

        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end().trim_start_matches('\u{feff}');
            let trimmed = line.trim_start();

            // Blank lines close the current entry once its timing is known
            if trimmed.is_empty() {
                if let (Some(seq_num), Some(start_ms), Some(end_ms)) =
                    (current_seq_num, current_start_time_ms, current_end_time_ms)
                {
                    if current_text.is_empty() {
                        debug!("Dropping subtitle entry {} without text", seq_num);
                    } else {
                        add_current_entry(seq_num, start_ms, end_ms, &current_text);
                    }

                    current_seq_num = None;
                    current_start_time_ms = None;
                    current_end_time_ms = None;
                    current_text.clear();
                }
                continue;
            }

            if current_seq_num.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_seq_num = Some(num);
                    continue;
                }
            }

            if current_seq_num.is_some() && current_start_time_ms.is_none() {
                if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                    current_start_time_ms = Some(Self::parse_timestamp_to_ms(&caps, 1));
                    current_end_time_ms = Some(Self::parse_timestamp_to_ms(&caps, 5));
                    continue;
                }
            }

            if current_start_time_ms.is_some() && current_end_time_ms.is_some() {
                if !current_text.is_empty() {
                    current_text.push('\n');
                }
                current_text.push_str(line);
            } else {
                warn!("Unexpected text at line {} before sequence number or timestamp: {}", index + 1, trimmed);
            }
        }

        // Add the last entry if there is one
        if let (Some(seq_num), Some(start_ms), Some(end_ms)) =
            (current_seq_num, current_start_time_ms, current_end_time_ms)
        {
            if !current_text.is_empty() {
                add_current_entry(seq_num, start_ms, end_ms, &current_text);
            }
        }

        if entries.is_empty() {
            warn!("No valid subtitle entries found in content");
        }

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            debug!("Found {} overlapping subtitle entries", overlap_count);
        }

        Ok(entries)
    }

    /// Parse timestamp captures to milliseconds
    fn parse_timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
        let field = |offset: usize| -> u64 {
            caps.get(start_idx + offset)
                .map_or(0, |m| m.as_str().parse().unwrap_or(0))
        };
        let fraction = caps.get(start_idx + 3).map_or("0", |m| m.as_str());

        (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + fraction_to_ms(fraction)
    }
}

/// Decimal fraction digits (`5`, `50`, `500`) to milliseconds
fn fraction_to_ms(digits: &str) -> u64 {
    let value: u64 = digits.parse().unwrap_or(0);
    match digits.len() {
        1 => value * 100,
        2 => value * 10,
        _ => value,
    }
}

/// A `Dialogue:` or `Comment:` line of an ASS/SSA `[Events]` section
#[derive(Debug, Clone, PartialEq)]
pub struct AssEvent {
    /// Line descriptor, e.g. `Dialogue`
    pub kind: String,
    /// Comma separated fields, text last
    pub fields: Vec<String>,
    /// Start time in ms
    pub start_time_ms: u64,
    /// End time in ms
    pub end_time_ms: u64,
    start_field: usize,
    end_field: usize,
}

impl AssEvent {
    /// Parse `H:MM:SS.cc` to milliseconds
    pub fn parse_time(value: &str) -> Option<u64> {
        let caps = ASS_TIME_REGEX.captures(value)?;
        let hours: u64 = caps[1].parse().ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;

        Some((hours * 3600 + minutes * 60 + seconds) * 1000 + fraction_to_ms(&caps[4]))
    }

    /// Format milliseconds as `H:MM:SS.cc`, rounding to centiseconds
    pub fn format_time(ms: u64) -> String {
        let centis = (ms + 5) / 10;
        let hours = centis / 360_000;
        let minutes = (centis % 360_000) / 6_000;
        let seconds = (centis % 6_000) / 100;
        let cs = centis % 100;

        format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs)
    }
}

impl fmt::Display for AssEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.kind)?;
        for (index, field) in self.fields.iter().enumerate() {
            if index > 0 {
                write!(f, ",")?;
            }
            if index == self.start_field {
                write!(f, "{}", Self::format_time(self.start_time_ms))?;
            } else if index == self.end_field {
                write!(f, "{}", Self::format_time(self.end_time_ms))?;
            } else {
                write!(f, "{}", field)?;
            }
        }
        Ok(())
    }
}

impl TimedEvent for AssEvent {
    fn start_ms(&self) -> i64 {
        self.start_time_ms as i64
    }

    fn end_ms(&self) -> i64 {
        self.end_time_ms as i64
    }

    fn set_timing(&mut self, start_ms: i64, end_ms: i64) {
        self.start_time_ms = start_ms.max(0) as u64;
        self.end_time_ms = end_ms.max(0) as u64;
    }
}

/// An ASS/SSA script split around its events.
///
/// Only event timing is interpreted; every other line is written back as
/// it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct AssDocument {
    /// Lines before the first event, `[Events]` and `Format:` included
    pub head: Vec<String>,
    /// Events in file order
    pub events: Vec<AssEvent>,
    /// Lines after the last event
    pub tail: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssSection {
    Head,
    Events,
    Tail,
}

impl AssDocument {
    /// Number of fields in a v4/v4+ event line
    const DEFAULT_FIELD_COUNT: usize = 10;

    /// Split an ASS/SSA script into head, events and tail
    pub fn parse(content: &str) -> Result<Self, SubtitleError> {
        let mut head = Vec::new();
        let mut events = Vec::new();
        let mut tail = Vec::new();
        let mut pending = Vec::new();

        let mut state = AssSection::Head;
        let mut in_events = false;
        let mut field_count = Self::DEFAULT_FIELD_COUNT;
        let mut start_field = 1;
        let mut end_field = 2;

        for (index, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim_start_matches('\u{feff}');
            let trimmed = line.trim();

            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                in_events = trimmed.eq_ignore_ascii_case("[events]");
                if state == AssSection::Events {
                    tail.append(&mut pending);
                    state = AssSection::Tail;
                }
            }

            let event = if in_events && state != AssSection::Tail {
                Self::split_descriptor(trimmed)
            } else {
                None
            };

            match event {
                Some((kind, value)) if kind.eq_ignore_ascii_case("format") && state == AssSection::Head => {
                    let names: Vec<String> = value.split(',').map(|name| name.trim().to_lowercase()).collect();
                    field_count = names.len();
                    start_field = Self::field_index(&names, "start", index)?;
                    end_field = Self::field_index(&names, "end", index)?;
                    head.push(line.to_string());
                }
                Some((kind, value))
                    if kind.eq_ignore_ascii_case("dialogue") || kind.eq_ignore_ascii_case("comment") =>
                {
                    let fields: Vec<String> = value.splitn(field_count, ',').map(str::to_string).collect();
                    if fields.len() <= start_field.max(end_field) {
                        return Err(SubtitleError::MalformedEvent {
                            line_number: index + 1,
                            reason: format!("expected {} fields, found {}", field_count, fields.len()),
                        });
                    }

                    let time = |field: usize| {
                        AssEvent::parse_time(&fields[field]).ok_or_else(|| SubtitleError::MalformedEvent {
                            line_number: index + 1,
                            reason: format!("invalid time '{}'", fields[field].trim()),
                        })
                    };
                    let start_time_ms = time(start_field)?;
                    let end_time_ms = time(end_field)?;

                    if !pending.is_empty() {
                        debug!("Dropping {} non-event lines between events", pending.len());
                        pending.clear();
                    }

                    events.push(AssEvent {
                        kind: kind.to_string(),
                        fields,
                        start_time_ms,
                        end_time_ms,
                        start_field,
                        end_field,
                    });
                    state = AssSection::Events;
                }
                _ => match state {
                    AssSection::Head => head.push(line.to_string()),
                    AssSection::Events => pending.push(line.to_string()),
                    AssSection::Tail => tail.push(line.to_string()),
                },
            }
        }

        tail.splice(0..0, pending);
        debug!("Read {} ASS/SSA events", events.len());

        Ok(Self { head, events, tail })
    }

    /// Render the script with the given events in place of the original ones
    pub fn render_with(&self, events: &[AssEvent]) -> String {
        let mut output = String::new();
        let lines = self
            .head
            .iter()
            .cloned()
            .chain(events.iter().map(|event| event.to_string()))
            .chain(self.tail.iter().cloned());

        for line in lines {
            output.push_str(&line);
            output.push('\n');
        }
        output
    }

    fn split_descriptor(line: &str) -> Option<(&str, &str)> {
        let (kind, value) = line.split_once(':')?;
        Some((kind.trim(), value.trim_start()))
    }

    fn field_index(names: &[String], name: &str, index: usize) -> Result<usize, SubtitleError> {
        names
            .iter()
            .position(|field| field == name)
            .ok_or_else(|| SubtitleError::MalformedEvent {
                line_number: index + 1,
                reason: format!("Format line has no '{}' field", name),
            })
    }
}
