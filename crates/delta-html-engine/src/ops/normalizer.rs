//! Turns raw delta records into the normalized [`InsertOp`] stream.
//!
//! Normalization does three things: classify each insert payload, sanitize
//! its attributes, and split multi-line text so downstream stages only ever
//! see break-free fragments and lone `"\n"` terminators.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::attributes::OpAttributes;
use super::insert::{CustomEmbed, InsertContent, InsertOp, NEWLINE};
use super::sanitizer::{sanitize_attributes, sanitize_link, scalar_string};

/// One raw record as producers emit it. Retain/delete records have no
/// `insert` and fail deserialization, which drops them from the stream.
#[derive(Debug, Deserialize)]
struct RawOp {
    insert: Value,
    #[serde(default)]
    attributes: Option<Map<String, Value>>,
}

/// Normalizes a raw record sequence. Records without a usable `insert`
/// are skipped; everything else degrades to a typed op, worst case a
/// `Custom("unknown", ..)` embed.
pub fn normalize_ops(raw_ops: &[Value]) -> Vec<InsertOp> {
    let mut out = Vec::new();
    for raw in raw_ops {
        let Ok(record) = RawOp::deserialize(raw) else {
            continue;
        };
        let Some(content) = classify_insert(&record.insert) else {
            continue;
        };
        let attrs = record
            .attributes
            .as_ref()
            .map(sanitize_attributes)
            .unwrap_or_default();
        match content {
            InsertContent::Text(text) => push_text_tokens(&text, attrs, &mut out),
            other => out.push(InsertOp::new(other, attrs)),
        }
    }
    out
}

/// Classifies an insert payload. `None` only for a missing/null insert;
/// any other unrecognizable shape becomes a custom embed carrying the raw
/// value under the name `"unknown"`.
fn classify_insert(insert: &Value) -> Option<InsertContent> {
    match insert {
        Value::Null => None,
        Value::String(text) => Some(InsertContent::Text(text.clone())),
        Value::Object(obj) => {
            if let Some(url) = obj.get("image") {
                let url = scalar_string(url).unwrap_or_default();
                Some(InsertContent::Image(sanitize_link(&url)))
            } else if let Some(url) = obj.get("video") {
                let url = scalar_string(url).unwrap_or_default();
                Some(InsertContent::Video(sanitize_link(&url)))
            } else if let Some(formula) = obj.get("formula") {
                Some(InsertContent::Formula(
                    scalar_string(formula).unwrap_or_default(),
                ))
            } else if let Some((name, value)) = obj.iter().next() {
                Some(InsertContent::Custom(CustomEmbed {
                    name: name.clone(),
                    value: value.clone(),
                }))
            } else {
                Some(InsertContent::Custom(CustomEmbed {
                    name: "unknown".to_string(),
                    value: insert.clone(),
                }))
            }
        }
        other => Some(InsertContent::Custom(CustomEmbed {
            name: "unknown".to_string(),
            value: other.clone(),
        })),
    }
}

/// Splits text at line breaks: `"a\nb"` becomes `["a", "\n", "b"]`. A
/// single-token insert (no internal break, or exactly `"\n"`) is returned
/// whole.
fn tokenize_lines(text: &str) -> Vec<String> {
    if text == NEWLINE {
        return vec![NEWLINE.to_string()];
    }
    let lines: Vec<&str> = text.split('\n').collect();
    if lines.len() == 1 {
        return vec![lines[0].to_string()];
    }
    let last = lines.len() - 1;
    let mut tokens = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if i != last {
            if !line.is_empty() {
                tokens.push((*line).to_string());
            }
            tokens.push(NEWLINE.to_string());
        } else if !line.is_empty() {
            tokens.push((*line).to_string());
        }
    }
    tokens
}

/// Pushes the tokens of one text record. A record that splits hands its
/// block attributes to the emitted `"\n"` terminators and its inline
/// attributes to the fragments; an unsplit record keeps everything.
fn push_text_tokens(text: &str, attrs: OpAttributes, out: &mut Vec<InsertOp>) {
    let mut tokens = tokenize_lines(text);
    if tokens.len() == 1 {
        out.push(InsertOp::text_with(tokens.remove(0), attrs));
        return;
    }
    let block = block_attributes(&attrs);
    let inline = inline_attributes(&attrs);
    for token in tokens {
        if token == NEWLINE {
            out.push(InsertOp::text_with(token, block.clone()));
        } else {
            out.push(InsertOp::text_with(token, inline.clone()));
        }
    }
}

fn block_attributes(attrs: &OpAttributes) -> OpAttributes {
    OpAttributes {
        blockquote: attrs.blockquote,
        code_block: attrs.code_block.clone(),
        header: attrs.header,
        list: attrs.list.clone(),
        align: attrs.align,
        direction: attrs.direction,
        indent: attrs.indent,
        ..OpAttributes::default()
    }
}

fn inline_attributes(attrs: &OpAttributes) -> OpAttributes {
    let mut inline = attrs.clone();
    inline.blockquote = false;
    inline.code_block = None;
    inline.header = None;
    inline.list = None;
    inline.align = None;
    inline.direction = None;
    inline.indent = None;
    inline
}
