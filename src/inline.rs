//! Inline tokenizer: turns a text fragment into styled spans.
//!
//! Break markers (`<br>`, a literal `\n`, two trailing spaces, a trailing
//! backslash) are normalized first. The fragment is then scanned left to
//! right; at each position the first matching rule wins:
//!
//! 1. `\*` / `\_` produce the literal character
//! 2. `**bold**` / `__bold__`
//! 3. `*italic*` / `_italic_`
//! 4. `` `code` ``
//! 5. anything else is plain text
//!
//! A delimiter with no matching close stays in the text as-is. Content
//! between delimiters is not scanned again, so emphasis does not nest.

use std::sync::LazyLock;

use regex::Regex;

use crate::block::{RichText, Span};

/// Internal break marker after normalization.
const BREAK: char = '\n';

static BREAK_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break tag pattern"));

/// Parse a text fragment into spans.
pub fn parse(text: &str) -> RichText {
    scan(text).spans
}

/// Spans plus the first delimiter that was left unterminated, if any.
pub(crate) struct Scan {
    pub spans: RichText,
    pub unterminated: Option<char>,
}

pub(crate) fn scan(text: &str) -> Scan {
    let normalized = normalize_breaks(text);
    Tokenizer::new(&normalized).run()
}

fn normalize_breaks(text: &str) -> String {
    let mut out = BREAK_TAG_RE
        .replace_all(text, BREAK.to_string())
        .replace("\\n", "\n");

    let trailing_spaces = out.len() - out.trim_end_matches(' ').len();
    if trailing_spaces >= 2 {
        out.truncate(out.len() - trailing_spaces);
        out.push(BREAK);
    } else if out.ends_with('\\') {
        out.pop();
        out.push(BREAK);
    }
    out
}

#[derive(Clone, Copy)]
enum Style {
    Bold,
    Italic,
    Code,
}

struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    plain: String,
    spans: RichText,
    unterminated: Option<char>,
}

impl Tokenizer {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            plain: String::new(),
            spans: Vec::new(),
            unterminated: None,
        }
    }

    fn run(mut self) -> Scan {
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                BREAK => {
                    self.flush_plain();
                    self.spans.push(Span::line_break());
                    self.pos += 1;
                }
                '\\' if matches!(self.peek(1), Some('*' | '_')) => {
                    self.plain.push(self.chars[self.pos + 1]);
                    self.pos += 2;
                }
                '*' | '_' => {
                    if self.peek(1) == Some(c) && self.delimited(&[c, c], Style::Bold) {
                        continue;
                    }
                    if !self.delimited(&[c], Style::Italic) {
                        self.literal(c);
                    }
                }
                '`' => {
                    if !self.delimited(&['`'], Style::Code) {
                        self.literal(c);
                    }
                }
                _ => {
                    self.plain.push(c);
                    self.pos += 1;
                }
            }
        }
        self.flush_plain();

        Scan {
            spans: self.spans,
            unterminated: self.unterminated,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Try to consume `delim content delim` at the current position.
    fn delimited(&mut self, delim: &[char], style: Style) -> bool {
        let start = self.pos + delim.len();
        let Some(close) = self.find(delim, start) else {
            return false;
        };
        if close == start {
            return false;
        }

        let content: String = self.chars[start..close].iter().collect();
        self.flush_plain();
        self.push_styled(&content, style);
        self.pos = close + delim.len();
        true
    }

    fn find(&self, delim: &[char], from: usize) -> Option<usize> {
        let last = self.chars.len().checked_sub(delim.len())?;
        (from..=last).find(|&i| self.chars[i..].starts_with(delim))
    }

    fn literal(&mut self, c: char) {
        self.unterminated.get_or_insert(c);
        self.plain.push(c);
        self.pos += 1;
    }

    fn flush_plain(&mut self) {
        if !self.plain.is_empty() {
            let text = std::mem::take(&mut self.plain);
            self.spans.push(Span::plain(text));
        }
    }

    fn push_styled(&mut self, content: &str, style: Style) {
        let mut pieces = content.split(BREAK).peekable();
        while let Some(piece) = pieces.next() {
            if !piece.is_empty() {
                self.spans.push(match style {
                    Style::Bold => Span::bold(piece),
                    Style::Italic => Span::italic(piece),
                    Style::Code => Span::code(piece),
                });
            }
            if pieces.peek().is_some() {
                self.spans.push(Span::line_break());
            }
        }
    }
}
