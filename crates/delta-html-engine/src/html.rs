//! Low-level HTML string building and entity encoding.
//!
//! Everything here operates on plain strings: tags are assembled by
//! concatenation and text is protected by a small, fixed entity table.
//! Decoding (used to avoid double-encoding already-escaped input) is
//! delegated to the `html-escape` crate.

use regex::Regex;
use std::sync::LazyLock;

/// Rendered form of an explicit line break.
pub const BR_TAG: &str = "<br/>";

/// Tags that self-close instead of taking an end tag.
const VOID_TAGS: [&str; 2] = ["br", "img"];

/// Entity mappings applied to text content. Order matters: `&` must be
/// encoded before any replacement that introduces new ampersands.
const HTML_ENTITIES: [(char, &str); 6] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#x27;"),
    ('/', "&#x2F;"),
];

/// Entity mappings applied to link targets. Slashes stay literal so URLs
/// remain readable; parentheses are encoded instead.
const LINK_ENTITIES: [(&str, &str); 7] = [
    ("&", "&amp;"),
    ("<", "&lt;"),
    (">", "&gt;"),
    ("\"", "&quot;"),
    ("'", "&#x27;"),
    ("(", "&#40;"),
    (")", "&#41;"),
];

/// One attribute on a start tag. A `None` (or empty) value renders as a
/// bare key, e.g. `<p checked>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAttr {
    pub key: String,
    pub value: Option<String>,
}

impl TagAttr {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }
}

/// Builds `<tag k="v" ...>`, self-closing for void tags. An empty tag name
/// produces an empty string so callers can thread "no tag" through.
pub fn make_start_tag(tag: &str, attrs: &[TagAttr]) -> String {
    if tag.is_empty() {
        return String::new();
    }
    let attrs_str = attrs
        .iter()
        .map(|attr| match &attr.value {
            Some(v) if !v.is_empty() => format!("{}=\"{}\"", attr.key, v),
            _ => attr.key.clone(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    let closing = if VOID_TAGS.contains(&tag) { "/>" } else { ">" };
    if attrs_str.is_empty() {
        format!("<{tag}{closing}")
    } else {
        format!("<{tag} {attrs_str}{closing}")
    }
}

/// Builds `</tag>`, or an empty string for an empty tag name.
pub fn make_end_tag(tag: &str) -> String {
    if tag.is_empty() {
        String::new()
    } else {
        format!("</{tag}>")
    }
}

/// Encodes text content for safe inclusion in markup.
///
/// With `prevent_double_encoding` set, existing entities are decoded first
/// so `&amp;` stays `&amp;` instead of becoming `&amp;amp;`.
pub fn encode_html(text: &str, prevent_double_encoding: bool) -> String {
    let decoded;
    let source = if prevent_double_encoding {
        decoded = decode_html(text);
        decoded.as_str()
    } else {
        text
    };
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match HTML_ENTITIES.iter().find(|(from, _)| *from == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Decodes HTML entities back to plain text.
pub fn decode_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// Encodes a link target. Works over its own mapping set so already-encoded
/// URLs are not encoded twice.
pub fn encode_link(text: &str) -> String {
    let mut decoded = text.to_string();
    for (plain, entity) in LINK_ENTITIES {
        decoded = decoded.replace(entity, plain);
    }
    let mut out = decoded;
    for (plain, entity) in LINK_ENTITIES {
        out = out.replace(plain, entity);
    }
    out
}

static SPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}|^ +| +$").expect("valid space-run pattern"));

/// Encodes runs of spaces so browsers preserve them.
///
/// Within a matched run the spaces alternate `&nbsp;`/space from the right,
/// with the first character forced to `&nbsp;`. Lone interior spaces and
/// non-space whitespace are left alone.
pub fn encode_whitespaces(text: &str) -> String {
    SPACE_RUNS
        .replace_all(text, |caps: &regex::Captures| {
            let len = caps[0].len();
            let mut run = String::with_capacity(len * 6);
            for i in 0..len {
                let from_right = len - i;
                if i == 0 || from_right % 2 == 1 {
                    run.push_str("&nbsp;");
                } else {
                    run.push(' ');
                }
            }
            run
        })
        .into_owned()
}
