//! Raw inspector: pretty-printed payload with token classes
//!
//! A single regex pass splits JSON text into classified tokens and the plain
//! text between them. The HTML projection escapes first and then tokenizes, so
//! the tokens it wraps are already markup-safe.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::model::Snapshot;

/// Class of a lexical token in pretty-printed JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Key,
    String,
    Boolean,
    Null,
    Number,
}

impl TokenClass {
    pub fn class_name(&self) -> &'static str {
        match self {
            TokenClass::Key => "key",
            TokenClass::String => "string",
            TokenClass::Boolean => "boolean",
            TokenClass::Null => "null",
            TokenClass::Number => "number",
        }
    }

    fn classify(token: &str) -> Self {
        if token.starts_with('"') {
            if token.ends_with(':') {
                TokenClass::Key
            } else {
                TokenClass::String
            }
        } else if token == "true" || token == "false" {
            TokenClass::Boolean
        } else if token == "null" {
            TokenClass::Null
        } else {
            TokenClass::Number
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// A slice of the input, either between tokens or a classified token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Token(TokenClass, &'a str),
}

fn token_regex() -> &'static Regex {
    static TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();
    TOKEN_REGEX.get_or_init(|| {
        Regex::new(
            r#""(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*"(\s*:)?|\b(true|false|null)\b|-?\d+(?:\.\d*)?(?:[eE][+\-]?\d+)?"#,
        )
        .expect("token regex is valid")
    })
}

/// Split `text` into plain runs and classified tokens, in order
pub fn tokenize(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut last = 0;

    for m in token_regex().find_iter(text) {
        if m.start() > last {
            segments.push(Segment::Plain(&text[last..m.start()]));
        }
        segments.push(Segment::Token(TokenClass::classify(m.as_str()), m.as_str()));
        last = m.end();
    }

    if last < text.len() {
        segments.push(Segment::Plain(&text[last..]));
    }

    segments
}

/// Escape the characters that would otherwise open markup
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap every token of `json` in `<span class="…">`
pub fn highlight_html(json: &str) -> String {
    let escaped = escape_html(json);
    let mut out = String::with_capacity(escaped.len() * 2);

    for segment in tokenize(&escaped) {
        match segment {
            Segment::Plain(text) => out.push_str(text),
            Segment::Token(class, text) => {
                out.push_str("<span class=\"");
                out.push_str(class.class_name());
                out.push_str("\">");
                out.push_str(text);
                out.push_str("</span>");
            }
        }
    }

    out
}

/// Two-space indented JSON of the snapshot as received
pub fn pretty_json(snapshot: &Snapshot) -> String {
    serde_json::to_string_pretty(&snapshot.raw).unwrap_or_else(|_| snapshot.raw.to_string())
}

/// Highlighted HTML dump of the whole snapshot
pub fn render_inspector(snapshot: &Snapshot) -> String {
    highlight_html(&pretty_json(snapshot))
}
