//! Single-line classification.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::ListMarker;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(\S.*)$").expect("valid heading pattern"));

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^`{3,}\s*([^`]*)$").expect("valid fence pattern"));

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|:-]*[|-][\s|:-]*$").expect("valid separator pattern"));

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([*+-])|(\d+)\.)\s+(\S.*)$").expect("valid list pattern"));

/// What one source line is, independent of its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    Heading { level: u8, text: &'a str },
    /// Three or more backticks, optionally followed by an info string.
    Fence { info: Option<&'a str> },
    /// Cell text with the outer pipes removed.
    TableRow(&'a str),
    SeparatorRow,
    ListItem { marker: ListMarker, text: &'a str },
    Blank,
    PlainText(&'a str),
}

impl Line<'_> {
    /// A fence with no info string, the only kind that closes a code block.
    pub fn is_closing_fence(&self) -> bool {
        matches!(self, Line::Fence { info: None })
    }
}

/// Classify one raw line.
///
/// Leading whitespace is ignored. Trailing whitespace is kept in the text
/// of headings, list items and plain lines so trailing-space breaks survive.
pub fn classify(raw: &str) -> Line<'_> {
    let line = raw.trim_start();
    let trimmed = line.trim_end();

    if let Some(caps) = HEADING_RE.captures(line) {
        let level = caps[1].len() as u8;
        let text = caps.get(2).map_or("", |m| m.as_str());
        return Line::Heading { level, text };
    }

    if let Some(caps) = FENCE_RE.captures(trimmed) {
        let info = caps
            .get(1)
            .map(|m| m.as_str().trim())
            .filter(|info| !info.is_empty());
        return Line::Fence { info };
    }

    if SEPARATOR_RE.is_match(trimmed) {
        return Line::SeparatorRow;
    }

    if let Some(rest) = trimmed.strip_prefix('|') {
        let inner = rest.strip_suffix('|').unwrap_or(rest);
        return Line::TableRow(inner);
    }

    if let Some(caps) = LIST_ITEM_RE.captures(line) {
        let marker = match caps.get(2) {
            Some(number) => number.as_str().parse().ok().map(ListMarker::Ordered),
            None => Some(ListMarker::Bullet),
        };
        if let (Some(marker), Some(text)) = (marker, caps.get(3)) {
            return Line::ListItem {
                marker,
                text: text.as_str(),
            };
        }
    }

    if trimmed.is_empty() {
        return Line::Blank;
    }

    Line::PlainText(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("# Title", 1, "Title")]
    #[case("###### Deep", 6, "Deep")]
    #[case("  ## Indented", 2, "Indented")]
    #[case("## Keeps trailing  ", 2, "Keeps trailing  ")]
    #[case("#   Spaced", 1, "Spaced")]
    fn headings(#[case] input: &str, #[case] level: u8, #[case] text: &str) {
        assert_eq!(classify(input), Line::Heading { level, text });
    }

    #[rstest]
    #[case("####### Seven")]
    #[case("#NoSpace")]
    #[case("#   ")]
    fn not_headings(#[case] input: &str) {
        assert!(!matches!(classify(input), Line::Heading { .. }));
    }

    #[rstest]
    #[case("```", None)]
    #[case("````", None)]
    #[case("  ```  ", None)]
    #[case("```javascript", Some("javascript"))]
    #[case("``` rust ", Some("rust"))]
    fn fences(#[case] input: &str, #[case] info: Option<&str>) {
        assert_eq!(classify(input), Line::Fence { info });
    }

    #[test]
    fn two_backticks_are_not_a_fence() {
        assert_eq!(classify("``"), Line::PlainText("``"));
    }

    #[rstest]
    #[case("|---|---|")]
    #[case("| :--- | ---: |")]
    #[case("|--------------|----------|")]
    #[case("---")]
    #[case("|")]
    fn separators(#[case] input: &str) {
        assert_eq!(classify(input), Line::SeparatorRow);
    }

    #[test]
    fn colons_alone_are_plain() {
        assert_eq!(classify("::"), Line::PlainText("::"));
    }

    #[rstest]
    #[case("| a | b |", " a | b ")]
    #[case("| a | b", " a | b")]
    #[case("  |x|  ", "x")]
    fn table_rows(#[case] input: &str, #[case] inner: &str) {
        assert_eq!(classify(input), Line::TableRow(inner));
    }

    #[rstest]
    #[case("- item", ListMarker::Bullet, "item")]
    #[case("* item", ListMarker::Bullet, "item")]
    #[case("+ item", ListMarker::Bullet, "item")]
    #[case("3. third", ListMarker::Ordered(3), "third")]
    #[case("  10.  tenth", ListMarker::Ordered(10), "tenth")]
    fn list_items(#[case] input: &str, #[case] marker: ListMarker, #[case] text: &str) {
        assert_eq!(classify(input), Line::ListItem { marker, text });
    }

    #[rstest]
    #[case("*emphasis*")]
    #[case("**bold** start")]
    #[case("1.5 litres")]
    #[case("99999999999. overflow")]
    fn not_list_items(#[case] input: &str) {
        assert_eq!(classify(input), Line::PlainText(input));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t")]
    fn blanks(#[case] input: &str) {
        assert_eq!(classify(input), Line::Blank);
    }

    #[test]
    fn plain_text_drops_leading_whitespace_only() {
        assert_eq!(classify("  hello  "), Line::PlainText("hello  "));
    }
}
