/*!
 * Tests for Trim extraction from Avisynth scripts
 */

use anyhow::Result;
use trimsubs::errors::{MatchContext, TrimError};
use trimsubs::trims::{parse_edit_points, read_edit_points, FrameInterval, ScanDirection};
use crate::common;

fn frames(pairs: &[(u64, u64)]) -> Vec<FrameInterval> {
    pairs.iter().map(|&(s, e)| FrameInterval::new(s, e)).collect()
}

/// Chained Trims on a labelled line come back left to right
#[test]
fn test_parseEditPoints_withLabel_shouldReturnPairsInSourceOrder() {
    let lines = [
        "Trim(5,10)",
        "Trim(0,99)++Trim(200,499)  # cuts",
        "Trim(1000,2000) # other",
    ];

    let trims = parse_edit_points(&lines, ScanDirection::TopToBottom, Some("cuts"), None).unwrap();

    assert_eq!(trims, frames(&[(0, 99), (200, 499)]));
}

/// A non-positive second member counts frames from the first
#[test]
fn test_parseEditPoints_withNegativeEnd_shouldComputeEndFrame() {
    let trims = parse_edit_points(&["Trim(10,-5)"], ScanDirection::TopToBottom, None, None).unwrap();
    assert_eq!(trims, frames(&[(10, 14)]));

    let single = parse_edit_points(&["Trim(10,-1)"], ScanDirection::TopToBottom, None, None).unwrap();
    assert_eq!(single, frames(&[(10, 10)]));
}

/// `Trim(10,0)` would end before it starts
#[test]
fn test_parseEditPoints_withZeroEnd_shouldRejectEditPoint() {
    let result = parse_edit_points(&["Trim(10,0)"], ScanDirection::TopToBottom, None, None);

    assert_eq!(
        result,
        Err(TrimError::InvalidEditPoint { start: 10, end: 0, computed_end: 9 })
    );
}

/// A later pair with an end before its start is also rejected
#[test]
fn test_parseEditPoints_withEndBeforeStart_shouldRejectEditPoint() {
    let result = parse_edit_points(&["Trim(0,5)++Trim(50,20)"], ScanDirection::TopToBottom, None, None);
    assert!(matches!(result, Err(TrimError::InvalidEditPoint { start: 50, end: 20, .. })));
}

#[test]
fn test_parseEditPoints_withDirections_shouldPickFirstInScanOrder() {
    let lines = ["Trim(0,10)", "x = 1", "Trim(20,30)"];

    let top = parse_edit_points(&lines, ScanDirection::TopToBottom, None, None).unwrap();
    let bottom = parse_edit_points(&lines, ScanDirection::BottomToTop, None, None).unwrap();

    assert_eq!(top, frames(&[(0, 10)]));
    assert_eq!(bottom, frames(&[(20, 30)]));
}

#[test]
fn test_parseEditPoints_withCaseAndSpacing_shouldMatch() {
    let lines = ["TRIM ( 3 , 7 ) ++ trim(9,-2)"];
    let trims = parse_edit_points(&lines, ScanDirection::TopToBottom, None, None).unwrap();
    assert_eq!(trims, frames(&[(3, 7), (9, 10)]));
}

/// Trims inside the trailing comment are not part of the line
#[test]
fn test_parseEditPoints_withTrimsInComment_shouldIgnoreThem() {
    let lines = ["Trim(0,10) # Trim(50,60)"];
    let trims = parse_edit_points(&lines, ScanDirection::TopToBottom, None, None).unwrap();
    assert_eq!(trims, frames(&[(0, 10)]));
}

/// A line number wins over the label
#[test]
fn test_parseEditPoints_withLineNumber_shouldIgnoreLabel() {
    let lines = ["Trim(0,10) # a", "Trim(20,30) # b"];

    let trims = parse_edit_points(&lines, ScanDirection::TopToBottom, Some("a"), Some(2)).unwrap();

    assert_eq!(trims, frames(&[(20, 30)]));
}

#[test]
fn test_parseEditPoints_withLineZero_shouldFail() {
    let result = parse_edit_points(&["Trim(0,10)"], ScanDirection::TopToBottom, None, Some(0));
    assert_eq!(result, Err(TrimError::InvalidLineNumber(0)));
}

#[test]
fn test_parseEditPoints_withLineOutOfRangeOrWithoutTrims_shouldReportLine() {
    let lines = ["x = 1", "Trim(0,10)"];

    for number in [1, 3] {
        let result = parse_edit_points(&lines, ScanDirection::TopToBottom, None, Some(number));
        assert_eq!(
            result,
            Err(TrimError::NoMatchingLine { context: MatchContext::LineNumber(number) })
        );
    }
}

#[test]
fn test_parseEditPoints_withoutMatches_shouldReportContext() {
    let lines = ["x = 1", "Trim(0,10) # other"];

    let unlabelled = parse_edit_points(&["x = 1"], ScanDirection::TopToBottom, None, None);
    let labelled = parse_edit_points(&lines, ScanDirection::TopToBottom, Some("cuts"), None);

    assert_eq!(
        unlabelled,
        Err(TrimError::NoMatchingLine { context: MatchContext::Unrestricted })
    );
    assert_eq!(
        labelled,
        Err(TrimError::NoMatchingLine { context: MatchContext::Label("cuts".to_string()) })
    );
}

#[test]
fn test_readEditPoints_withScriptFile_shouldUseLastUncommentedLine() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = common::create_test_script(temp_dir.path(), "movie.avs")?;

    let trims = read_edit_points(&script, ScanDirection::TopToBottom, None, None)?;

    assert_eq!(trims, frames(&[(0, 23), (48, 71)]));
    Ok(())
}

#[test]
fn test_readEditPoints_withMissingScript_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = temp_dir.path().join("missing.avs");

    let result = read_edit_points(&script, ScanDirection::TopToBottom, None, None);

    assert_eq!(result, Err(TrimError::ScriptNotFound(script)));
    Ok(())
}
