//! Schedule text normalization.
//!
//! Turns raw deck text into token lines ready for block segmentation. The
//! steps run in a fixed order because each one relies on the previous output:
//! comments go first so a `--` suffix cannot hide a blank line, tabs are
//! collapsed before section filtering so header and terminator lines can be
//! matched on plain spaces, and defaults are expanded last so quoting and
//! spacing are already clean.

use std::borrow::Cow;
use std::sync::LazyLock;

use eclipse_schedule_core::{DEFAULT_MARKER, RECORD_TERMINATOR};
use regex::Regex;

static PATTERNS: LazyLock<SchedulePatterns> = LazyLock::new(SchedulePatterns::new);

struct SchedulePatterns {
    comment: Regex,
    blank_lines: Regex,
    tabs: Regex,
    section_header: Regex,
    section_end: Regex,
    end_marker: Regex,
    whitespace: Regex,
    repeat_default: Regex,
    dates_header_line: Regex,
}

impl SchedulePatterns {
    fn new() -> Self {
        // All regexes here are compile-time constants. An expect() failure indicates
        // a programmer error in the pattern, not a runtime condition.
        Self {
            comment: Regex::new(r"--[^\n]*").expect("static regex must compile"),
            blank_lines: Regex::new(r"\n\s*\n").expect("static regex must compile"),
            tabs: Regex::new(r"\t+").expect("static regex must compile"),
            section_header: Regex::new(r"^[ ]*(?:COMPDATL|COMPDAT|DATES)[ ]*$")
                .expect("static regex must compile"),
            section_end: Regex::new(r"^[ ]*/[ ]*$").expect("static regex must compile"),
            end_marker: Regex::new(r"^[ ]*END[ ]*$").expect("static regex must compile"),
            whitespace: Regex::new(r"\s+").expect("static regex must compile"),
            repeat_default: Regex::new(r"^(\d+)\*$").expect("static regex must compile"),
            dates_header_line: Regex::new(r"(?m)^DATES[ \t]*(?:--[^\n]*)?\n")
                .expect("static regex must compile"),
        }
    }
}

/// Rewrites `\r\n` and lone `\r` line breaks to `\n`.
pub fn canonicalize_line_endings(raw: &str) -> Cow<'_, str> {
    if raw.contains('\r') {
        Cow::Owned(raw.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Removes `--` comments through end of line, keeping the line break.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    PATTERNS.comment.replace_all(text, "")
}

/// Collapses runs of line breaks (with interleaved whitespace) to one break.
pub fn collapse_blank_lines(text: &str) -> Cow<'_, str> {
    PATTERNS.blank_lines.replace_all(text, "\n")
}

/// Collapses runs of tabs to a single space.
pub fn collapse_tabs(text: &str) -> Cow<'_, str> {
    PATTERNS.tabs.replace_all(text, " ")
}

/// Keeps only DATES/COMPDAT/COMPDATL sections and standalone `END` markers.
///
/// A section runs from its header line through the first line consisting
/// solely of `/`. A section missing that line ends at the next tracked header,
/// the next `END` marker or the end of the text, so the outcome never depends
/// on text that follows the next header. Everything else, including sections
/// of untracked keywords, is dropped.
pub fn retain_tracked_sections(text: &str) -> String {
    let patterns = &*PATTERNS;
    let mut kept = Vec::new();
    let mut in_section = false;
    for line in text.split('\n') {
        if patterns.section_header.is_match(line) {
            in_section = true;
            kept.push(line);
        } else if patterns.end_marker.is_match(line) {
            in_section = false;
            kept.push(line);
        } else if in_section {
            kept.push(line);
            in_section = !patterns.section_end.is_match(line);
        }
    }
    kept.join("\n")
}

/// Returns `true` for lines with nothing but whitespace and at most a lone
/// record terminator.
pub fn is_blank_record(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed == RECORD_TERMINATOR
}

/// Collapses whitespace to single spaces, trims, and drops quote characters.
pub fn normalize_spacing(line: &str) -> String {
    PATTERNS
        .whitespace
        .replace_all(line, " ")
        .trim()
        .replace('\'', "")
}

/// Expands `N*` tokens to `N` default markers, then strips the trailing
/// record terminator.
///
/// Only whole tokens made of digits followed by `*` are expanded; decimals and
/// repeat-value forms such as `2*0.5` are left verbatim.
pub fn expand_defaults(line: &str) -> String {
    let mut tokens: Vec<&str> = Vec::new();
    for token in line.split(' ').filter(|token| !token.is_empty()) {
        let count = PATTERNS
            .repeat_default
            .captures(token)
            .and_then(|caps| caps[1].parse::<usize>().ok());
        match count {
            Some(count) => tokens.extend(std::iter::repeat_n(DEFAULT_MARKER, count)),
            None => tokens.push(token),
        }
    }
    while tokens.last() == Some(&RECORD_TERMINATOR) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Normalizes one line; `None` when nothing significant remains.
///
/// Applying this to an already normalized line returns it unchanged.
pub fn normalize_line(line: &str) -> Option<String> {
    if is_blank_record(line) {
        return None;
    }
    let expanded = expand_defaults(&normalize_spacing(line));
    (!expanded.is_empty()).then_some(expanded)
}

/// Runs the full normalization pipeline over a text fragment.
pub fn normalize_schedule_text(raw: &str) -> Vec<String> {
    let text = canonicalize_line_endings(raw);
    let text = strip_comments(&text);
    let text = collapse_blank_lines(&text);
    let text = collapse_tabs(&text);
    let text = retain_tracked_sections(&text);

    text.split('\n').filter_map(normalize_line).collect()
}

/// Byte offset of the last complete `DATES` header line in `text`, searching
/// from `from` (which must be a line start). Text before the returned offset
/// holds only finished sections and can be normalized on its own.
pub fn carry_boundary(text: &str, from: usize) -> Option<usize> {
    PATTERNS
        .dates_header_line
        .find_iter(&text[from..])
        .map(|header| from + header.start())
        .filter(|&offset| offset > 0)
        .last()
}
