use log::debug;

use crate::errors::TrimError;
use crate::trims::FrameInterval;

/// Join Trims that follow each other without a gap.
///
/// `(0,99),(100,199),(200,299)` becomes `(0,299)`; `(0,99),(101,199)` is
/// left alone. Input must be ascending and non-overlapping.
pub fn merge_adjacent(intervals: &[FrameInterval]) -> Result<Vec<FrameInterval>, TrimError> {
    let mut merged: Vec<FrameInterval> = Vec::with_capacity(intervals.len());

    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                return Err(TrimError::OverlappingIntervals {
                    first_start: last.start,
                    first_end: last.end,
                    second_start: interval.start,
                    second_end: interval.end,
                });
            }
            if interval.start - last.end == 1 {
                last.end = interval.end;
                continue;
            }
        }
        merged.push(*interval);
    }

    if merged.len() != intervals.len() {
        debug!("Joined {} Trims into {}", intervals.len(), merged.len());
    }

    Ok(merged)
}
