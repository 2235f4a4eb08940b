// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::LazyLock;

use chrono::DateTime;
use html_escape::decode_html_entities;
use regex::Regex;

/// Character budget of archive page summaries
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Character budget of feed item subtitles
pub const SUBTITLE_MAX_CHARS: usize = 125;

const PUBLISHED_FORMAT: &str = "%d %b %Y %H:%M:%S %z";
const DISPLAY_FORMAT: &str = "%b %d, %Y";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `Wed, 04 Feb 2026 12:00:00 +0000` becomes `Feb 04, 2026`.
///
/// The weekday is not checked against the date. Unparseable input is
/// returned unchanged.
pub fn format_display_date(published: &str) -> String {
    let trimmed = published.trim();
    let without_weekday = trimmed.split_once(", ").map_or(trimmed, |(_, rest)| rest);

    DateTime::parse_from_str(without_weekday, PUBLISHED_FORMAT)
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|_| published.to_string())
}

/// Plain-text summary of an HTML fragment.
///
/// Tags become spaces and whitespace runs collapse. Text over `max_chars`
/// is cut back to the last whole word and gets a trailing `…`.
pub fn plain_summary(html: &str, max_chars: usize) -> String {
    let text = TAG.replace_all(html, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => {
            let head = &text[..cut];
            let head = head.rsplit_once(' ').map_or(head, |(words, _)| words);
            format!("{head}…")
        }
    }
}

/// Remove tags without inserting spaces
pub fn strip_tags(html: &str) -> String {
    TAG.replace_all(html, "").into_owned()
}

/// First `max_chars` characters of tag-free, entity-decoded text, with `...`
/// if anything was cut
pub fn subtitle(html: &str, max_chars: usize) -> String {
    let text = decode_html_entities(&strip_tags(html)).into_owned();
    match text.char_indices().nth(max_chars) {
        None => text,
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Wrap raw text in a CDATA section, splitting any embedded terminator
pub fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc2822_date() {
        assert_eq!(
            format_display_date("Wed, 04 Feb 2026 12:00:00 +0000"),
            "Feb 04, 2026"
        );
        assert_eq!(
            format_display_date("  Mon, 27 Jan 2025 09:30:00 -0500 "),
            "Jan 27, 2025"
        );
    }

    #[test]
    fn weekday_mismatch_still_formats() {
        assert_eq!(
            format_display_date("Mon, 27 Jan 2026 12:00:00 +0000"),
            "Jan 27, 2026"
        );
    }

    #[test]
    fn unparseable_date_passes_through() {
        assert_eq!(format_display_date("sometime in 2026"), "sometime in 2026");
        assert_eq!(format_display_date(""), "");
    }

    #[test]
    fn summary_strips_tags_and_collapses_whitespace() {
        assert_eq!(
            plain_summary("<p>Hello <b>world</b></p><ul><li>a</li>\n<li>b</li></ul>", 200),
            "Hello world a b"
        );
    }

    #[test]
    fn short_summary_is_untouched() {
        let text = "x".repeat(200);
        assert_eq!(plain_summary(&text, 200), text);
    }

    #[test]
    fn long_summary_ends_on_word_boundary() {
        let words = "lorem ipsum dolor sit amet ".repeat(20);
        let summary = plain_summary(&format!("<p>{words}</p>"), 200);

        assert!(summary.chars().count() <= 201);
        assert!(summary.ends_with('…'));
        let body = summary.trim_end_matches('…');
        assert!(words.starts_with(body));
        assert_eq!(words.as_bytes()[body.len()], b' ');
    }

    #[test]
    fn long_summary_without_spaces_is_hard_cut() {
        let summary = plain_summary(&"é".repeat(300), 200);
        assert_eq!(summary.chars().count(), 201);
    }

    #[test]
    fn subtitle_truncates_with_dots() {
        let long = format!("<p>{}</p>", "a".repeat(130));
        let result = subtitle(&long, 125);
        assert_eq!(result, format!("{}...", "a".repeat(125)));

        assert_eq!(subtitle("<p>Hello <b>world</b></p>", 125), "Hello world");
    }

    #[test]
    fn subtitle_decodes_entities() {
        assert_eq!(
            subtitle("<p>Q&amp;A with Dr. O&#39;Neil</p>", 125),
            "Q&A with Dr. O'Neil"
        );
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
        assert_eq!(cdata("<p>x</p>"), "<![CDATA[<p>x</p>]]>");
    }
}
