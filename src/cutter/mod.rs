/*!
 * Subtitle cutting.
 *
 * Both cutters drop what falls outside the kept ranges, clip what straddles
 * a range boundary and shift the rest onto the contiguous output timeline:
 * - `events`: time-based events (SRT, ASS/SSA) against `TrimInterval`s
 * - `microdvd`: `{start}{end}` lines against `FrameInterval`s
 */

pub mod events;
pub mod microdvd;

pub use events::cut_events;
pub use microdvd::cut_frame_indexed_lines;

/// A subtitle event with a start and an end time in milliseconds.
///
/// The cutter only reads and rewrites the timing; everything else an
/// event carries is cloned untouched.
pub trait TimedEvent: Clone {
    /// Start time in ms
    fn start_ms(&self) -> i64;

    /// End time in ms
    fn end_ms(&self) -> i64;

    /// Replace both timestamps
    fn set_timing(&mut self, start_ms: i64, end_ms: i64);
}
