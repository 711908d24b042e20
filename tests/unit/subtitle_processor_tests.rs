/*!
 * Tests for subtitle processing functionality
 */

use std::fmt::Write;
use std::path::PathBuf;
use anyhow::Result;
use trimsubs::cutter::TimedEvent;
use trimsubs::errors::SubtitleError;
use trimsubs::subtitle_processor::{AssDocument, AssEvent, SubtitleCollection, SubtitleEntry, SubtitleFormat};

const ASS_SCRIPT: &str = "[Script Info]
Title: Sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize
Style: Default,Arial,20

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:02.50,Default,,0,0,0,,Hello, world
Comment: 0,0:00:03.00,0:00:04.00,Default,,0,0,0,,note
Dialogue: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,{\\i1}Bye{\\i0}

[Fonts]
fontname: x.ttf
";

#[test]
fn test_formatTimestamp_shouldPadEveryField() {
    assert_eq!(SubtitleEntry::format_timestamp(5_025_678), "01:23:45,678");
    assert_eq!(SubtitleEntry::format_timestamp(0), "00:00:00,000");
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatCorrectly() {
    let entry = SubtitleEntry::new(1, 5000, 10000, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

#[test]
fn test_subtitle_entry_setTiming_withNegative_shouldClampToZero() {
    let mut entry = SubtitleEntry::new(1, 5000, 10000, "x".to_string());
    entry.set_timing(-20, 30);

    assert_eq!(entry.start_ms(), 0);
    assert_eq!(entry.end_ms(), 30);
}

/// Multi-line entries, CRLF input and dotted milliseconds
#[test]
fn test_parse_srt_string_withMultilineEntries_shouldParse() -> Result<()> {
    let content = "1\r\n00:00:01,000 --> 00:00:02,000\r\nLine one\r\nLine two\r\n\r\n2\r\n00:00:03.500 --> 00:00:04.000\r\nThird\r\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].text, "Line one\nLine two");
    assert_eq!(entries[1].start_time_ms, 3500);
    Ok(())
}

#[test]
fn test_to_srt_string_afterCut_shouldRenumberFromOne() {
    let collection = SubtitleCollection {
        source_file: PathBuf::from("movie.srt"),
        entries: vec![
            SubtitleEntry::new(7, 0, 1000, "First".to_string()),
            SubtitleEntry::new(9, 1000, 2000, "Second".to_string()),
        ],
    };

    let output = collection.to_srt_string();

    assert!(output.starts_with("1\n00:00:00,000 --> 00:00:01,000\nFirst\n\n2\n"));
}

/// A cue with a timestamp but no text must not swallow the following cue
#[test]
fn test_parse_srt_string_withEmptyCue_shouldKeepFollowingCue() -> Result<()> {
    let content = "1\n00:00:01,000 --> 00:00:02,000\n\n2\n00:00:03,000 --> 00:00:04,000\nHello\n";

    let entries = SubtitleCollection::parse_srt_string(content)?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].seq_num, 2);
    assert_eq!(entries[0].start_time_ms, 3000);
    assert_eq!(entries[0].end_time_ms, 4000);
    assert_eq!(entries[0].text, "Hello");
    Ok(())
}

#[test]
fn test_from_srt_string_withIndentedText_shouldRenderPayloadUnchanged() -> Result<()> {
    let content = "1\n00:00:00,500 --> 00:00:00,900\n   - Who's there?\n\t- Me.   \n";

    let collection = SubtitleCollection::from_srt_string(PathBuf::from("movie.srt"), content)?;

    assert_eq!(collection.entries[0].text, "   - Who's there?\n\t- Me.");
    assert_eq!(
        collection.to_srt_string(),
        "1\n00:00:00,500 --> 00:00:00,900\n   - Who's there?\n\t- Me.\n\n"
    );
    Ok(())
}

#[test]
fn test_subtitleFormat_fromPath_shouldRejectUnknownExtension() {
    assert_eq!(SubtitleFormat::from_path("movie.ssa").unwrap(), SubtitleFormat::Ssa);
    assert_eq!(SubtitleFormat::from_path("movie.sub").unwrap(), SubtitleFormat::MicroDvd);
    assert!(matches!(
        SubtitleFormat::from_path("movie"),
        Err(SubtitleError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_assDocument_parse_shouldSplitHeadEventsAndTail() -> Result<()> {
    let document = AssDocument::parse(ASS_SCRIPT)?;

    assert_eq!(document.events.len(), 3);
    assert_eq!(document.events[0].kind, "Dialogue");
    assert_eq!(document.events[0].start_time_ms, 1000);
    assert_eq!(document.events[0].end_time_ms, 2500);
    assert_eq!(document.events[0].fields[9], "Hello, world");
    assert_eq!(document.events[1].kind, "Comment");
    assert_eq!(document.head.last().map(String::as_str), Some("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text"));
    assert_eq!(document.tail, vec!["", "[Fonts]", "fontname: x.ttf"]);
    Ok(())
}

#[test]
fn test_assDocument_renderWith_sameEvents_shouldReproduceScript() -> Result<()> {
    let document = AssDocument::parse(ASS_SCRIPT)?;

    let rendered = document.render_with(&document.events);

    assert_eq!(rendered, ASS_SCRIPT);
    Ok(())
}

#[test]
fn test_assDocument_renderWith_retimedEvent_shouldRewriteOnlyTimes() -> Result<()> {
    let document = AssDocument::parse(ASS_SCRIPT)?;
    let mut event = document.events[2].clone();
    event.set_timing(1234, 2345);

    let rendered = document.render_with(&[event]);

    assert!(rendered.contains("Dialogue: 0,0:00:01.23,0:00:02.35,Default,,0,0,0,,{\\i1}Bye{\\i0}\n"));
    assert!(!rendered.contains("Hello, world"));
    assert!(rendered.contains("[V4+ Styles]"));
    Ok(())
}

/// SSA Format lines may order Start and End differently
#[test]
fn test_assDocument_parse_withCustomFormat_shouldLocateTimes() -> Result<()> {
    let content = "[Events]\nFormat: Marked, End, Start, Text\nDialogue: Marked=0,0:00:02.00,0:00:01.00,Hi\n";

    let document = AssDocument::parse(content)?;

    assert_eq!(document.events[0].start_time_ms, 1000);
    assert_eq!(document.events[0].end_time_ms, 2000);
    assert_eq!(document.render_with(&document.events), content);
    Ok(())
}

#[test]
fn test_assDocument_parse_withBadTime_shouldReportLine() {
    let content = "[Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\nDialogue: 0,soon,0:00:02.00,Default,,0,0,0,,x\n";

    let result = AssDocument::parse(content);

    assert!(matches!(result, Err(SubtitleError::MalformedEvent { line_number: 3, .. })));
}

#[test]
fn test_assEvent_formatTime_withHours_shouldNotPadHours() {
    assert_eq!(AssEvent::format_time(36_000_000), "10:00:00.00");
}
