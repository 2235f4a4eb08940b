// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::LazyLock;

use regex::Regex;

/// Paragraph break marker emitted for blank lines
pub const BREAK: &str = "<p><br /></p>";

const LIST_PREFIX: &str = "- ";

static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

/// Convert links, then bold markers, within one line of text
pub fn inline_to_html(text: &str) -> String {
    let linked = LINK.replace_all(text, r#"<a href="$2">$1</a>"#);
    BOLD.replace_all(&linked, "<b>$1</b>").into_owned()
}

/// Convert a block of markdown into concatenated HTML fragments.
///
/// Supports paragraphs (consecutive lines joined with spaces), `- ` bullet
/// lists and blank-line breaks. Two breaks are never emitted back to back,
/// and a block never starts with one.
pub fn block_to_html(text: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut lines = text.lines().map(str::trim).peekable();

    while let Some(&line) = lines.peek() {
        if line.is_empty() {
            lines.next();
            if parts.last().is_some_and(|last| last != BREAK) {
                parts.push(BREAK.to_string());
            }
            continue;
        }

        if is_list_item(line) {
            let mut items = Vec::new();
            while let Some(item) = lines.next_if(|l| is_list_item(l)) {
                items.push(&item[LIST_PREFIX.len()..]);
            }
            parts.push(list_to_html(&items));
            continue;
        }

        let mut paragraph = Vec::new();
        while let Some(l) = lines.next_if(|l| !l.is_empty() && !is_list_item(l)) {
            paragraph.push(l);
        }
        parts.push(format!("<p>{}</p>", inline_to_html(&paragraph.join(" "))));
    }

    parts.concat()
}

/// Build the stored episode description from its three markdown sections
pub fn build_description(description: &str, links: &str, footer: &str) -> String {
    let mut html = block_to_html(description);

    if !links.trim().is_empty() {
        html.push_str(BREAK);
        html.push_str("<p><b>Links:</b></p>");

        let items: Vec<&str> = links
            .lines()
            .map(str::trim)
            .filter(|line| is_list_item(line))
            .map(|line| &line[LIST_PREFIX.len()..])
            .collect();
        if !items.is_empty() {
            html.push_str(&list_to_html(&items));
        }
    }

    if !footer.trim().is_empty() {
        html.push_str(BREAK);
        html.push_str(&block_to_html(footer));
    }

    html
}

fn is_list_item(line: &str) -> bool {
    line.starts_with(LIST_PREFIX)
}

fn list_to_html(items: &[&str]) -> String {
    let items: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", inline_to_html(item)))
        .collect();
    format!("<ul>{items}</ul>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_converts_links() {
        assert_eq!(
            inline_to_html("see [the paper](https://example.org/p) now"),
            r#"see <a href="https://example.org/p">the paper</a> now"#
        );
    }

    #[test]
    fn inline_converts_bold() {
        assert_eq!(
            inline_to_html("**one** and **two**"),
            "<b>one</b> and <b>two</b>"
        );
    }

    #[test]
    fn bold_inside_link_text_is_converted() {
        assert_eq!(
            inline_to_html("[**Guest**](https://example.org)"),
            r#"<a href="https://example.org"><b>Guest</b></a>"#
        );
    }

    #[test]
    fn paragraph_lines_are_joined() {
        assert_eq!(
            block_to_html("Hello\nworld\n\nSecond"),
            "<p>Hello world</p><p><br /></p><p>Second</p>"
        );
    }

    #[test]
    fn list_run_produces_one_ul_with_n_items_in_order() {
        let html = block_to_html("- one\n- two\n- three\n- four");

        assert_eq!(
            html,
            "<ul><li>one</li><li>two</li><li>three</li><li>four</li></ul>"
        );
        assert_eq!(html.matches("<li>").count(), 4);
        assert_eq!(html.matches("<ul>").count(), 1);
    }

    #[test]
    fn list_closes_at_paragraph_line() {
        assert_eq!(
            block_to_html("- a\n- b\nafter"),
            "<ul><li>a</li><li>b</li></ul><p>after</p>"
        );
    }

    #[test]
    fn consecutive_blank_lines_collapse() {
        assert_eq!(
            block_to_html("one\n\n\n\ntwo"),
            "<p>one</p><p><br /></p><p>two</p>"
        );
    }

    #[test]
    fn leading_blank_lines_emit_nothing() {
        assert_eq!(block_to_html("\n\ntext"), "<p>text</p>");
    }

    #[test]
    fn indented_list_items_are_recognised() {
        assert_eq!(block_to_html("  - **a**"), "<ul><li><b>a</b></li></ul>");
    }

    #[test]
    fn empty_block_is_empty() {
        assert_eq!(block_to_html(""), "");
    }

    #[test]
    fn description_with_links_and_footer() {
        let html = build_description(
            "Intro",
            "Read these:\n- [A](https://a.example)\n- [B](https://b.example)",
            "Thanks!",
        );

        assert_eq!(
            html,
            concat!(
                "<p>Intro</p>",
                "<p><br /></p><p><b>Links:</b></p>",
                r#"<ul><li><a href="https://a.example">A</a></li><li><a href="https://b.example">B</a></li></ul>"#,
                "<p><br /></p><p>Thanks!</p>",
            )
        );
    }

    #[test]
    fn empty_links_and_footer_are_omitted() {
        assert_eq!(build_description("Intro", "  ", ""), "<p>Intro</p>");
    }

    #[test]
    fn links_without_list_items_keep_only_header() {
        assert_eq!(
            build_description("Intro", "nothing listed", ""),
            "<p>Intro</p><p><br /></p><p><b>Links:</b></p>"
        );
    }
}
