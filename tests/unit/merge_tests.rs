/*!
 * Tests for joining contiguous Trims
 */

use trimsubs::errors::TrimError;
use trimsubs::trims::{merge_adjacent, FrameInterval};

fn frames(pairs: &[(u64, u64)]) -> Vec<FrameInterval> {
    pairs.iter().map(|&(s, e)| FrameInterval::new(s, e)).collect()
}

#[test]
fn test_mergeAdjacent_withContiguousPair_shouldJoin() {
    let merged = merge_adjacent(&frames(&[(0, 99), (100, 199)])).unwrap();
    assert_eq!(merged, frames(&[(0, 199)]));
}

#[test]
fn test_mergeAdjacent_withOneFrameGap_shouldKeepApart() {
    let input = frames(&[(0, 99), (101, 199)]);
    assert_eq!(merge_adjacent(&input).unwrap(), input);
}

#[test]
fn test_mergeAdjacent_onOwnOutput_shouldBeIdempotent() {
    let once = merge_adjacent(&frames(&[(0, 9), (10, 19), (30, 39), (40, 49), (60, 60)])).unwrap();
    let twice = merge_adjacent(&once).unwrap();

    assert_eq!(once, frames(&[(0, 19), (30, 49), (60, 60)]));
    assert_eq!(once, twice);
}

#[test]
fn test_mergeAdjacent_withSingleInterval_shouldReturnIt() {
    let input = frames(&[(5, 5)]);
    assert_eq!(merge_adjacent(&input).unwrap(), input);
}

#[test]
fn test_mergeAdjacent_withOverlap_shouldReportBothIntervals() {
    let result = merge_adjacent(&frames(&[(0, 99), (50, 149)]));

    assert_eq!(
        result,
        Err(TrimError::OverlappingIntervals {
            first_start: 0,
            first_end: 99,
            second_start: 50,
            second_end: 149,
        })
    );
}

/// Overlap is checked against the joined run, not the original Trim
#[test]
fn test_mergeAdjacent_withOverlapAfterJoin_shouldFail() {
    let result = merge_adjacent(&frames(&[(0, 9), (10, 19), (15, 30)]));
    assert!(matches!(
        result,
        Err(TrimError::OverlappingIntervals { first_start: 0, first_end: 19, .. })
    ));
}
