//! `.an` record extraction
//!
//! The decompressed container is split on `#`-only delimiter lines.
//! Section 0 names the book file; every later section is one
//! highlight/annotation record with a fixed ten-line header followed
//! by padding and a content block.
//!
//! The format is not self-describing. The header positions below and
//! the gap rule were recovered from files produced by the app and are
//! the contract to reproduce, not a schema to reinterpret.

use chrono::DateTime;

use super::strip_suffix_ignore_ascii_case;
use crate::note::{SourceApp, UnifiedNote};

/// Line 0: seed for the record id.
const LINE_NOTE_ID: usize = 0;
/// Line 4: numeric chapter index (chapter names are not stored).
const LINE_CHAPTER_INDEX: usize = 4;
/// Line 6: character offset of the highlight start within the book.
const LINE_START_OFFSET: usize = 6;
/// Line 9: creation time in epoch milliseconds.
const LINE_CREATED_AT: usize = 9;
/// The header occupies lines 0..=9; padding and content follow.
const CONTENT_START: usize = 10;
/// Sections shorter than the fixed header cannot hold a record.
const MIN_SECTION_LINES: usize = 10;
/// Exactly one padding line before the content block marks a record
/// whose first content line is a typed annotation. Any other gap means
/// the whole block is highlighted text. Observed app behavior; keep
/// the threshold exact.
const NOTE_GAP: usize = 1;
/// Page estimate divisor: the app treats ~1000 characters as a page.
const CHARS_PER_PAGE: i64 = 1000;

/// Result of decoding one `.an` container
#[derive(Debug, Clone)]
pub struct ParsedAnFile {
    /// Title derived from the section-0 book path. Already applied to
    /// every note; kept so callers can tell fallback from enrichment.
    pub book_title: String,
    /// Extracted records, in source order
    pub notes: Vec<UnifiedNote>,
}

/// Extracts note records from decompressed `.an` text.
///
/// Malformed input never fails: unusable sections are skipped and
/// unparseable numeric fields default to zero. A container with no
/// extractable notes is a valid, empty result.
pub fn parse_an_text(text: &str) -> ParsedAnFile {
    let sections = split_sections(text);
    let book_title = fallback_title(sections.first().copied().unwrap_or(""));

    let mut notes = Vec::new();
    for section in sections.iter().skip(1) {
        if let Some(note) = parse_section(section, &book_title) {
            notes.push(note);
        }
    }

    ParsedAnFile { book_title, notes }
}

/// Splits on delimiter lines: a `#` alone on a line, preceded by a
/// newline (`\n#\n` or `\n#\r\n`). A `#` line at the very start of the
/// text is part of section 0, not a delimiter.
fn split_sections(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sections = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' && i + 2 < bytes.len() && bytes[i + 1] == b'#' {
            if bytes[i + 2] == b'\n' {
                sections.push(&text[start..i]);
                start = i + 3;
                i = start;
                continue;
            }
            if bytes[i + 2] == b'\r' && i + 3 < bytes.len() && bytes[i + 3] == b'\n' {
                sections.push(&text[start..i]);
                start = i + 4;
                i = start;
                continue;
            }
        }
        i += 1;
    }
    sections.push(&text[start..]);
    sections
}

/// Derives the fallback title from the section-0 book path (line 1).
/// The metadata sidecar, when available, supersedes this.
fn fallback_title(meta_section: &str) -> String {
    let path_line = meta_section.trim().lines().nth(1).unwrap_or("");
    let last = path_line.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return "Unknown Book".to_string();
    }
    strip_suffix_ignore_ascii_case(last, ".epub")
        .unwrap_or(last)
        .to_string()
}

fn parse_section(section: &str, book_title: &str) -> Option<UnifiedNote> {
    let trimmed = section.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lines: Vec<String> = trimmed
        .split('\n')
        .map(|l| l.trim_end().to_string())
        .collect();
    if lines.len() < MIN_SECTION_LINES {
        return None;
    }

    let id_seed = &lines[LINE_NOTE_ID];
    let chapter_index = parse_line_int(&lines[LINE_CHAPTER_INDEX]);
    let start_offset = parse_line_int(&lines[LINE_START_OFFSET]);
    let created_millis = parse_line_int(&lines[LINE_CREATED_AT]);

    let (note, highlight) = split_content(&lines);
    if note.is_none() && highlight.is_empty() {
        return None;
    }

    Some(UnifiedNote {
        id: format!("moon-{id_seed}-{created_millis}"),
        book_title: book_title.to_string(),
        chapter: Some(format!("Chapter {chapter_index}")),
        highlight,
        note,
        page: Some((start_offset / CHARS_PER_PAGE).max(0) as u32),
        author: None,
        created_at: DateTime::from_timestamp_millis(created_millis)
            .unwrap_or(DateTime::UNIX_EPOCH),
        source_app: SourceApp::MoonReader,
        source_lines: lines,
    })
}

/// Gap analysis: locates the content block past the header padding and
/// splits it into (user note, highlight) per the gap rule.
fn split_content(lines: &[String]) -> (Option<String>, String) {
    let first = match lines
        .iter()
        .enumerate()
        .skip(CONTENT_START)
        .find(|(_, l)| !is_padding(l))
    {
        Some((i, _)) => i,
        None => return (None, String::new()),
    };

    let mut last = lines.len() - 1;
    while last > first && is_padding(&lines[last]) {
        last -= 1;
    }
    let content = &lines[first..=last];

    if first - CONTENT_START == NOTE_GAP {
        let note = replace_br_markers(&content[0]);
        let highlight = if content.len() > 1 {
            content[1..].join("\n")
        } else {
            String::new()
        };
        (Some(note), highlight)
    } else {
        (None, content.join("\n"))
    }
}

/// Padding lines between header and content are empty or a lone `0`.
fn is_padding(line: &str) -> bool {
    let t = line.trim();
    t.is_empty() || t == "0"
}

/// Replaces literal `<BR>` markers (any ASCII case) with newlines.
/// The app stores multi-line annotations on a single physical line.
fn replace_br_markers(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut tail = 0;
    for (pos, _) in lower.match_indices("<br>") {
        out.push_str(&s[tail..pos]);
        out.push('\n');
        tail = pos + 4;
    }
    out.push_str(&s[tail..]);
    out
}

fn parse_line_int(line: &str) -> i64 {
    line.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const META: &str = "#\n/storage/emulated/0/Books/Logic.epub\n1";

    /// Ten header lines: id, chapter index at 4, offset at 6, epoch
    /// millis at 9.
    fn header() -> Vec<&'static str> {
        vec![
            "id1",
            "",
            "",
            "",
            "3",
            "",
            "4500",
            "0",
            "c0",
            "1700000000000",
        ]
    }

    fn make_text(section_lines: &[Vec<&str>]) -> String {
        let mut text = META.to_string();
        for lines in section_lines {
            text.push_str("\n#\n");
            text.push_str(&lines.join("\n"));
        }
        text
    }

    #[test]
    fn test_split_section_count() {
        // Two delimiters yield three sections.
        let sections = split_sections("a\n#\nb\n#\nc");
        assert_eq!(sections, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_crlf_delimiter() {
        let sections = split_sections("a\n#\r\nb");
        assert_eq!(sections, vec!["a", "b"]);
    }

    #[test]
    fn test_split_leading_hash_is_not_a_delimiter() {
        let sections = split_sections("#\npath\n#\nrecord");
        assert_eq!(sections, vec!["#\npath", "record"]);
    }

    #[test]
    fn test_split_trailing_delimiter_yields_empty_section() {
        let sections = split_sections("a\n#\n");
        assert_eq!(sections, vec!["a", ""]);
    }

    #[test]
    fn test_fallback_title_strips_epub() {
        let parsed = parse_an_text(META);
        assert_eq!(parsed.book_title, "Logic");
    }

    #[test]
    fn test_fallback_title_missing_path() {
        assert_eq!(parse_an_text("#").book_title, "Unknown Book");
        assert_eq!(parse_an_text("").book_title, "Unknown Book");
    }

    #[test]
    fn test_gap_one_extracts_user_note() {
        // One padding line between header and content: the first
        // content line is the annotation, the rest the highlight.
        let mut lines = header();
        lines.extend(["0", "My annotation text", "Passage line 1", "Passage line 2"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        assert_eq!(parsed.notes.len(), 1);
        let note = &parsed.notes[0];
        assert_eq!(note.note.as_deref(), Some("My annotation text"));
        assert_eq!(note.highlight, "Passage line 1\nPassage line 2");
    }

    #[test]
    fn test_gap_zero_is_highlight_only() {
        // Same content without the padding line: everything is
        // highlight, no annotation.
        let mut lines = header();
        lines.extend(["My annotation text", "Passage line 1", "Passage line 2"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        let note = &parsed.notes[0];
        assert_eq!(note.note, None);
        assert_eq!(
            note.highlight,
            "My annotation text\nPassage line 1\nPassage line 2"
        );
    }

    #[test]
    fn test_larger_gap_is_highlight_only() {
        let mut lines = header();
        lines.extend(["0", "", "Passage only"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        let note = &parsed.notes[0];
        assert_eq!(note.note, None);
        assert_eq!(note.highlight, "Passage only");
    }

    #[test]
    fn test_note_without_highlight() {
        let mut lines = header();
        lines.extend(["0", "Annotation only"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        let note = &parsed.notes[0];
        assert_eq!(note.note.as_deref(), Some("Annotation only"));
        assert_eq!(note.highlight, "");
    }

    #[test]
    fn test_br_markers_become_newlines() {
        let mut lines = header();
        lines.extend(["0", "line1<BR>line2<br>line3", "Passage"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        assert_eq!(
            parsed.notes[0].note.as_deref(),
            Some("line1\nline2\nline3")
        );
    }

    #[test]
    fn test_trailing_padding_excluded_from_content() {
        let mut lines = header();
        lines.extend(["Passage", "0", "", "0"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        assert_eq!(parsed.notes[0].highlight, "Passage");
    }

    #[test]
    fn test_header_only_section_emits_nothing() {
        let parsed = parse_an_text(&make_text(&[header()]));
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_padding_only_content_emits_nothing() {
        let mut lines = header();
        lines.extend(["0", "", "0"]);
        let parsed = parse_an_text(&make_text(&[lines]));
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_short_section_skipped() {
        let parsed = parse_an_text(&make_text(&[vec!["id", "x", "y"]]));
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_skipped_sections_do_not_abort_later_ones() {
        let mut good = header();
        good.extend(["Passage"]);
        let parsed = parse_an_text(&make_text(&[vec!["truncated"], good]));
        assert_eq!(parsed.notes.len(), 1);
    }

    #[test]
    fn test_header_fields_and_id() {
        let mut lines = header();
        lines.extend(["Passage"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        let note = &parsed.notes[0];
        assert_eq!(note.id, "moon-id1-1700000000000");
        assert_eq!(note.chapter.as_deref(), Some("Chapter 3"));
        assert_eq!(note.page, Some(4));
        assert_eq!(note.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(note.book_title, "Logic");
        assert_eq!(note.source_app, SourceApp::MoonReader);
        assert_eq!(note.source_lines.len(), 11);
    }

    #[test]
    fn test_non_numeric_fields_default_to_zero() {
        let mut lines = header();
        lines[4] = "";
        lines[6] = "not a number";
        lines[9] = "";
        lines.extend(["Passage"]);
        let parsed = parse_an_text(&make_text(&[lines]));

        let note = &parsed.notes[0];
        assert_eq!(note.chapter.as_deref(), Some("Chapter 0"));
        assert_eq!(note.page, Some(0));
        assert_eq!(note.created_at, DateTime::UNIX_EPOCH);
        assert_eq!(note.id, "moon-id1-0");
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut lines = header();
        lines.extend(["0", "Annotation", "Passage"]);
        let text = make_text(&[lines]).replace('\n', "\r\n");
        let parsed = parse_an_text(&text);

        assert_eq!(parsed.book_title, "Logic");
        let note = &parsed.notes[0];
        assert_eq!(note.note.as_deref(), Some("Annotation"));
        assert_eq!(note.highlight, "Passage");
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse_an_text("");
        assert!(parsed.notes.is_empty());
    }

    #[test]
    fn test_sections_preserve_source_order() {
        let mut first = header();
        first[0] = "a";
        first.extend(["Passage A"]);
        let mut second = header();
        second[0] = "b";
        second[9] = "100";
        second.extend(["Passage B"]);
        let parsed = parse_an_text(&make_text(&[first, second]));

        assert_eq!(parsed.notes[0].id, "moon-a-1700000000000");
        assert_eq!(parsed.notes[1].id, "moon-b-100");
    }
}
