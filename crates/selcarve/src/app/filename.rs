//! Filename suggestion for carved selections.
//!
//! Names are derived from the first line of the selected text, reduced to a
//! filesystem-safe character set and bounded in length. Nothing here fails:
//! every input is coerced and the fallback keeps the result non-empty.

use once_cell::sync::Lazy;
use regex::Regex;

/// Character budget for the description derived from the first line.
const DESC_MAX_LEN: usize = 30;

/// Character budget for the whole suggested name.
const NAME_MAX_LEN: usize = 80;

/// First lines shorter than this are not worth naming after.
const MIN_FIRST_LINE_LEN: usize = 3;

static LINE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\r\n\x0B\x0C\u{85}\u{2028}\u{2029}]").expect("valid regex"));
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9 \-\._]").expect("valid regex"));

/// Reduce `name` to a filesystem-safe string of at most `max_length`
/// characters, keeping letters, digits, spaces, hyphens, underscores and
/// periods from its first line. Returns `fallback` (trusted to already be
/// safe) when nothing usable remains.
pub fn sanitize(name: &str, max_length: usize, fallback: &str) -> String {
    if name.is_empty() {
        return fallback.to_string();
    }
    let first_line = first_line(name).trim();
    let collapsed = WHITESPACE_RUNS.replace_all(first_line, " ");
    let cleaned = UNSAFE_CHARS.replace_all(&collapsed, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    truncate_chars(cleaned, max_length).trim_end().to_string()
}

/// Build the default filename for the `index`-th carved selection.
///
/// Prefers `<source_base>-<first-line-short>.<extension>` when the first line
/// of the selection carries at least three characters, and falls back to
/// `selection<index>` naming otherwise. The final candidate is sanitized as a
/// whole, so the result always fits in 80 characters.
pub fn suggested_name(
    selection_text: &str,
    source_base: &str,
    index: usize,
    extension: &str,
) -> String {
    let first_line = first_line(selection_text).trim();
    let candidate = if first_line.chars().count() >= MIN_FIRST_LINE_LEN {
        let desc = sanitize(first_line, DESC_MAX_LEN, &format!("selection{index}"));
        if source_base.is_empty() {
            format!("{desc}.{extension}")
        } else {
            format!("{source_base}-{desc}.{extension}")
        }
    } else if source_base.is_empty() {
        format!("selection{index}.{extension}")
    } else {
        format!("{source_base}-selection{index}.{extension}")
    };
    sanitize(&candidate, NAME_MAX_LEN, &format!("selection{index}.{extension}"))
}

/// Human-readable one-line preview of `text`, clipped to `max_len`
/// characters. Display-only; returns `"selection"` for empty input.
pub fn preview(text: &str, max_len: usize) -> String {
    if text.is_empty() {
        return "selection".to_string();
    }
    let collapsed = WHITESPACE_RUNS.replace_all(text.trim(), " ");
    truncate_chars(&collapsed, max_len).to_string()
}

fn first_line(text: &str) -> &str {
    LINE_BREAKS.split(text).next().unwrap_or("")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
