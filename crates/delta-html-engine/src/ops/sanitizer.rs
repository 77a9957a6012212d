//! Narrowing of raw attribute JSON into [`OpAttributes`].
//!
//! Recognized keys are validated and typed; values that fail validation
//! are dropped rather than erroring. Unrecognized keys pass through in
//! `extra`.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::attributes::{
    AlignType, CodeBlockValue, DirectionType, ListValue, Mention, OpAttributes, ScriptType,
};
use crate::html::encode_link;

/// Deepest indent level kept by the sanitizer.
pub const MAX_INDENT: u8 = 30;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#([0-9A-F]{6}|[0-9A-F]{3})$").expect("valid hex pattern"));
static RGB_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgb\(((0|25[0-5]|2[0-4]\d|1\d\d|0?\d?\d),\s*){2}(0|25[0-5]|2[0-4]\d|1\d\d|0?\d?\d)\)$")
        .expect("valid rgb pattern")
});
static COLOR_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]{1,50}$").expect("valid literal pattern"));
static FONT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z\s0-9\-]{1,30}$").expect("valid font pattern"));
static SIZE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9\-]{1,20}$").expect("valid size pattern"));
static WIDTH_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*(px|em|%)?$").expect("valid width pattern"));
static TARGET_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-zA-Z0-9\-]{1,50}$").expect("valid target pattern"));
static REL_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-zA-Z\s\-]{1,250}$").expect("valid rel pattern"));
static LANG_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-zA-Z0-9\s+#\-./]{1,50}$").expect("valid lang pattern"));
static MENTION_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-zA-Z0-9_\-]{1,500}$").expect("valid class pattern"));
static MENTION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-zA-Z0-9_]{1,50}$").expect("valid id pattern"));
static LINK_SCHEME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^((https?|s?ftp|file|blob|mailto|tel):|#|/|data:image/)")
        .expect("valid scheme pattern")
});
static LEADING_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*").expect("valid whitespace pattern"));

/// Loose truthiness, matching how producers treat attribute values: null,
/// `false`, `0` and the empty string are off, everything else is on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn is_valid_color_literal(value: &str) -> bool {
    COLOR_LITERAL.is_match(value)
}

pub fn is_valid_target(value: &str) -> bool {
    TARGET_VALUE.is_match(value)
}

pub fn is_valid_rel(value: &str) -> bool {
    REL_VALUE.is_match(value)
}

fn is_valid_color(value: &str) -> bool {
    HEX_COLOR.is_match(value) || COLOR_LITERAL.is_match(value) || RGB_COLOR.is_match(value)
}

/// Scalar-to-string coercion for attribute values that producers sometimes
/// send as numbers.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Makes a URL safe for attribute position: strips leading whitespace,
/// prefixes unknown schemes with `unsafe:` and entity-encodes the result.
pub fn sanitize_link(url: &str) -> String {
    let stripped = LEADING_WHITESPACE.replace_all(url, "");
    if LINK_SCHEME.is_match(&stripped) {
        encode_link(&stripped)
    } else {
        encode_link(&format!("unsafe:{stripped}"))
    }
}

/// Field-wise mention sanitization. Invalid fields are dropped; link-like
/// fields go through [`sanitize_link`].
pub fn sanitize_mention(raw: &Map<String, Value>) -> Mention {
    let mut mention = Mention::default();
    if let Some(class) = raw.get("class").and_then(Value::as_str) {
        if MENTION_CLASS.is_match(class) {
            mention.css_class = Some(class.to_string());
        }
    }
    if let Some(id) = raw.get("id").and_then(scalar_string) {
        if MENTION_ID.is_match(&id) {
            mention.id = Some(id);
        }
    }
    if let Some(target) = raw.get("target").and_then(Value::as_str) {
        if matches!(target, "_self" | "_blank" | "_parent" | "_top") {
            mention.target = Some(target.to_string());
        }
    }
    if let Some(avatar) = raw.get("avatar").and_then(scalar_string) {
        if !avatar.is_empty() {
            mention.avatar = Some(sanitize_link(&avatar));
        }
    }
    if let Some(end_point) = raw.get("end-point").and_then(scalar_string) {
        if !end_point.is_empty() {
            mention.end_point = Some(sanitize_link(&end_point));
        }
    }
    if let Some(slug) = raw.get("slug").and_then(scalar_string) {
        if !slug.is_empty() {
            mention.slug = Some(slug);
        }
    }
    mention
}

/// Walks a raw attribute object and keeps what validates.
pub fn sanitize_attributes(raw: &Map<String, Value>) -> OpAttributes {
    let mut attrs = OpAttributes::default();
    for (key, value) in raw {
        match key.as_str() {
            "bold" => attrs.bold = is_truthy(value),
            "italic" => attrs.italic = is_truthy(value),
            "underline" => attrs.underline = is_truthy(value),
            "strike" => attrs.strike = is_truthy(value),
            "code" => attrs.code = is_truthy(value),
            "renderAsBlock" => attrs.render_as_block = is_truthy(value),
            "blockquote" => attrs.blockquote = is_truthy(value),
            "script" => {
                attrs.script = match value.as_str() {
                    Some("sub") => Some(ScriptType::Sub),
                    Some("super") => Some(ScriptType::Super),
                    _ => None,
                }
            }
            "link" => {
                if let Some(link) = scalar_string(value).filter(|v| !v.is_empty()) {
                    attrs.link = Some(sanitize_link(&link));
                }
            }
            "target" => {
                attrs.target = value
                    .as_str()
                    .filter(|v| is_valid_target(v))
                    .map(str::to_string);
            }
            "rel" => {
                attrs.rel = value
                    .as_str()
                    .filter(|v| is_valid_rel(v))
                    .map(str::to_string);
            }
            "color" => attrs.color = scalar_string(value).filter(|v| is_valid_color(v)),
            "background" => attrs.background = scalar_string(value).filter(|v| is_valid_color(v)),
            "font" => attrs.font = scalar_string(value).filter(|v| FONT_NAME.is_match(v)),
            "size" => attrs.size = scalar_string(value).filter(|v| SIZE_NAME.is_match(v)),
            "width" => {
                attrs.width = scalar_string(value)
                    .filter(|v| !v.is_empty() && WIDTH_VALUE.is_match(v));
            }
            "code-block" => {
                attrs.code_block = match value {
                    Value::String(s) if !s.is_empty() => {
                        if LANG_VALUE.is_match(s) {
                            Some(CodeBlockValue::Lang(s.clone()))
                        } else {
                            Some(CodeBlockValue::Plain)
                        }
                    }
                    v if is_truthy(v) => Some(CodeBlockValue::Plain),
                    _ => None,
                }
            }
            "header" => {
                if let Some(level) = integer_value(value).filter(|n| *n >= 1) {
                    attrs.header = Some(level.min(6) as u8);
                }
            }
            "indent" => {
                if let Some(depth) = integer_value(value).filter(|n| *n >= 1) {
                    attrs.indent = Some(depth.min(i64::from(MAX_INDENT)) as u8);
                }
            }
            "list" => attrs.list = value.as_str().and_then(ListValue::parse),
            "align" => attrs.align = value.as_str().and_then(AlignType::parse),
            "direction" => {
                if value.as_str() == Some("rtl") {
                    attrs.direction = Some(DirectionType::Rtl);
                }
            }
            // Handled below: the object only counts with the flag set.
            "mention" | "mentions" => {}
            _ => {
                attrs.extra.insert(key.clone(), value.clone());
            }
        }
    }

    if raw.get("mentions").is_some_and(is_truthy) {
        if let Some(Value::Object(obj)) = raw.get("mention") {
            let mention = sanitize_mention(obj);
            if !mention.is_empty() {
                attrs.mention = Some(mention);
            }
        }
    }

    attrs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn sanitize(value: Value) -> OpAttributes {
        match value {
            Value::Object(map) => sanitize_attributes(&map),
            _ => panic!("attribute fixtures must be objects"),
        }
    }

    #[rstest]
    #[case("#ab2", true)]
    #[case("#AABB22", true)]
    #[case("#aabb2", false)]
    #[case("red", true)]
    #[case("rebeccapurple", true)]
    #[case("rgb(255, 0, 99)", true)]
    #[case("rgb(256,0,0)", false)]
    #[case("url(evil)", false)]
    fn color_validation(#[case] value: &str, #[case] kept: bool) {
        let attrs = sanitize(json!({ "color": value }));
        assert_eq!(attrs.color.is_some(), kept);
    }

    #[rstest]
    #[case("monospace", true)]
    #[case("Times New Roman", true)]
    #[case("font;drop", false)]
    fn font_validation(#[case] value: &str, #[case] kept: bool) {
        let attrs = sanitize(json!({ "font": value }));
        assert_eq!(attrs.font.is_some(), kept);
    }

    #[rstest]
    #[case(json!("300"), Some("300"))]
    #[case(json!(300), Some("300"))]
    #[case(json!("50%"), Some("50%"))]
    #[case(json!("10em"), Some("10em"))]
    #[case(json!("wide"), None)]
    #[case(json!(""), None)]
    fn width_validation(#[case] value: Value, #[case] kept: Option<&str>) {
        let attrs = sanitize(json!({ "width": value }));
        assert_eq!(attrs.width.as_deref(), kept);
    }

    #[rstest]
    #[case("http://example.com/a", "http://example.com/a")]
    #[case("  https://x.io", "https://x.io")]
    #[case("/relative", "/relative")]
    #[case("#anchor", "#anchor")]
    #[case("mailto:a@b.c", "mailto:a@b.c")]
    #[case("javascript:alert(1)", "unsafe:javascript:alert&#40;1&#41;")]
    fn link_sanitization(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_link(input), expected);
    }

    #[test]
    fn header_clamps_and_drops() {
        assert_eq!(sanitize(json!({ "header": 2 })).header, Some(2));
        assert_eq!(sanitize(json!({ "header": "3" })).header, Some(3));
        assert_eq!(sanitize(json!({ "header": 99 })).header, Some(6));
        assert_eq!(sanitize(json!({ "header": 0 })).header, None);
        assert_eq!(sanitize(json!({ "header": -1 })).header, None);
        assert_eq!(sanitize(json!({ "header": "deep" })).header, None);
    }

    #[test]
    fn indent_clamps_to_limit() {
        assert_eq!(sanitize(json!({ "indent": 4 })).indent, Some(4));
        assert_eq!(sanitize(json!({ "indent": 80 })).indent, Some(MAX_INDENT));
        assert_eq!(sanitize(json!({ "indent": 0 })).indent, None);
    }

    #[test]
    fn code_block_language_or_flag() {
        assert_eq!(
            sanitize(json!({ "code-block": "rust" })).code_block,
            Some(CodeBlockValue::Lang("rust".to_string()))
        );
        assert_eq!(
            sanitize(json!({ "code-block": true })).code_block,
            Some(CodeBlockValue::Plain)
        );
        assert_eq!(
            sanitize(json!({ "code-block": "{bad}" })).code_block,
            Some(CodeBlockValue::Plain)
        );
        assert_eq!(sanitize(json!({ "code-block": false })).code_block, None);
    }

    #[test]
    fn list_kinds_and_subtypes() {
        use crate::ops::attributes::ListKind;
        let attrs = sanitize(json!({ "list": "ordered:i" }));
        let list = attrs.list.unwrap();
        assert_eq!(list.kind, ListKind::Ordered);
        assert_eq!(list.subtype.as_deref(), Some("i"));
        assert_eq!(sanitize(json!({ "list": "fancy" })).list, None);
        assert_eq!(sanitize(json!({ "list": 3 })).list, None);
    }

    #[test]
    fn mention_needs_flag_and_content() {
        let with_flag = sanitize(json!({
            "mentions": true,
            "mention": { "id": "u42", "end-point": "http://api", "class": "mention-chip" }
        }));
        let mention = with_flag.mention.unwrap();
        assert_eq!(mention.id.as_deref(), Some("u42"));
        assert_eq!(mention.end_point.as_deref(), Some("http://api"));
        assert_eq!(mention.css_class.as_deref(), Some("mention-chip"));

        let without_flag = sanitize(json!({
            "mention": { "id": "u42" }
        }));
        assert_eq!(without_flag.mention, None);

        let all_invalid = sanitize(json!({
            "mentions": true,
            "mention": { "id": "has spaces", "target": "popup" }
        }));
        assert_eq!(all_invalid.mention, None);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let attrs = sanitize(json!({ "bold": true, "data-custom": { "x": 1 } }));
        assert!(attrs.bold);
        assert_eq!(attrs.extra.get("data-custom"), Some(&json!({ "x": 1 })));
    }

    #[test]
    fn truthiness_follows_producer_conventions() {
        assert!(sanitize(json!({ "bold": "yes" })).bold);
        assert!(sanitize(json!({ "bold": 1 })).bold);
        assert!(!sanitize(json!({ "bold": 0 })).bold);
        assert!(!sanitize(json!({ "bold": "" })).bold);
        assert!(!sanitize(json!({ "bold": null })).bold);
    }
}
