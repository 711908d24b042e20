use log::debug;

use crate::cutter::TimedEvent;
use crate::trims::TrimInterval;

/// Clip and shift time-based events against the kept ranges.
///
/// Ranges are visited in order and, for each range, every event that
/// strictly overlaps it is copied, clipped to the range and moved back by
/// the range's shift. An event overlapping two ranges yields two events;
/// events touching a range only at a boundary are not kept for it.
pub fn cut_events<E: TimedEvent>(intervals: &[TrimInterval], events: &[E]) -> Vec<E> {
    let mut cut = Vec::with_capacity(events.len());

    for interval in intervals {
        let range_start = interval.start_ms.round() as i64;
        let range_end = interval.end_ms.round() as i64;
        let shift = interval.shift.as_ms();

        for event in events {
            if event.end_ms() <= range_start || event.start_ms() >= range_end {
                continue;
            }

            // Round once, after the shift; split halves meet on the same ms
            let start = if event.start_ms() < range_start {
                interval.start_ms
            } else {
                event.start_ms() as f64
            };
            let end = if event.end_ms() > range_end {
                interval.end_ms
            } else {
                event.end_ms() as f64
            };

            let mut copy = event.clone();
            copy.set_timing(
                ((start - shift).round() as i64).max(0),
                ((end - shift).round() as i64).max(0),
            );
            cut.push(copy);
        }
    }

    debug!("Kept {} of {} subtitle events", cut.len(), events.len());
    cut
}
