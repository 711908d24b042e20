use log::debug;

use crate::errors::TrimError;
use crate::timecodes::{FrameRate, TimecodeTable, TIMECODE_V2_HEADER};
use crate::trims::{FrameInterval, TrimInterval, TrimShift};

/// Source of frame timing for the conversion
#[derive(Debug, Clone, PartialEq)]
pub enum TimeBase {
    /// Constant frame rate
    Constant(FrameRate),
    /// Per-frame timestamps from a timecode file
    Table(TimecodeTable),
}

/// Result of converting Trims to the time domain
#[derive(Debug, Clone, PartialEq)]
pub struct TrimMapping {
    /// One time range per input Trim, same order
    pub intervals: Vec<TrimInterval>,
    /// Timecode v2 file for the trimmed video, when requested
    pub timecodes: Option<Vec<String>>,
}

/// Convert frame ranges into time ranges plus the shift that makes the
/// output timeline contiguous.
///
/// With a constant rate the shift is a frame count; with a timecode table
/// it is a duration. `emit_timecode` also produces the v2 timecode file of
/// the trimmed video.
pub fn map_to_time(
    intervals: &[FrameInterval],
    base: &TimeBase,
    emit_timecode: bool,
) -> Result<TrimMapping, TrimError> {
    let mapping = match base {
        TimeBase::Constant(rate) => map_constant(intervals, *rate, emit_timecode),
        TimeBase::Table(table) => map_table(intervals, table, emit_timecode)?,
    };

    debug!(
        "Trims in time: {}",
        mapping.intervals.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
    );
    Ok(mapping)
}

fn map_constant(intervals: &[FrameInterval], rate: FrameRate, emit_timecode: bool) -> TrimMapping {
    let mut trims = Vec::with_capacity(intervals.len());
    // Next output frame
    let mut cursor: i64 = 0;

    for interval in intervals {
        let start = interval.start as i64;
        let end = interval.end as i64;
        let gap = start - cursor;

        trims.push(TrimInterval {
            start_ms: rate.frame_to_ms(interval.start),
            end_ms: rate.frame_to_ms(interval.end + 1),
            shift: TrimShift::Frames { frames: gap, rate },
        });
        cursor = end + 1 - gap;
    }

    let timecodes = emit_timecode.then(|| {
        TimecodeTable::from_fps(rate, cursor.max(0) as u64).to_v2_lines()
    });

    TrimMapping { intervals: trims, timecodes }
}

fn map_table(
    intervals: &[FrameInterval],
    table: &TimecodeTable,
    emit_timecode: bool,
) -> Result<TrimMapping, TrimError> {
    let mut trims = Vec::with_capacity(intervals.len());
    let mut timecodes = emit_timecode.then(|| vec![TIMECODE_V2_HEADER.to_string(), format!("{:.3}", 0.0)]);
    // Output time reached so far
    let mut cursor = 0.0;

    for interval in intervals {
        let start_ms = table.time_at(interval.start)?;
        let end_ms = table.time_at(interval.end + 1)?;
        let gap = start_ms - cursor;

        if let Some(lines) = timecodes.as_mut() {
            for frame in interval.start + 1..=interval.end + 1 {
                lines.push(format!("{:.3}", table.time_at(frame)? - gap));
            }
        }

        trims.push(TrimInterval {
            start_ms,
            end_ms,
            shift: TrimShift::Time(gap),
        });
        cursor = end_ms - gap;
    }

    Ok(TrimMapping { intervals: trims, timecodes })
}
