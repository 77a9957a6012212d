//! Typed, sanitized operation attributes.
//!
//! Raw attribute objects arrive as arbitrary JSON; the sanitizer narrows
//! them into this model. Keys the model does not know about survive in
//! [`OpAttributes::extra`] untouched.

use serde_json::Value;

/// The four list kinds an op can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Bullet,
    Checked,
    Unchecked,
}

impl ListKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ordered" => Some(Self::Ordered),
            "bullet" => Some(Self::Bullet),
            "checked" => Some(Self::Checked),
            "unchecked" => Some(Self::Unchecked),
            _ => None,
        }
    }

    /// Checked and unchecked items belong to the same (check) list.
    pub fn is_check(self) -> bool {
        matches!(self, Self::Checked | Self::Unchecked)
    }
}

/// A sanitized `list` attribute: the kind plus an optional subtype carried
/// after a colon in the raw value (`"ordered:a"` renders `type="a"` on the
/// list container). Subtypes are ASCII-alphanumeric only; an invalid
/// suffix is dropped, keeping the kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValue {
    pub kind: ListKind,
    pub subtype: Option<String>,
}

impl ListValue {
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            subtype: None,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let (kind_str, subtype) = match raw.split_once(':') {
            Some((k, s)) => (k, Self::parse_subtype(s)),
            None => (raw, None),
        };
        Some(Self {
            kind: ListKind::parse(kind_str)?,
            subtype,
        })
    }

    /// Subtypes render in attribute position on the list container and are
    /// never entity-encoded there, so only ASCII alphanumerics pass.
    fn parse_subtype(s: &str) -> Option<String> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some(s.to_string())
        } else {
            None
        }
    }

    /// Whether two values address the same list container. Subtyped kinds
    /// compare exact; checked and unchecked always match each other.
    pub fn same_list(&self, other: &Self) -> bool {
        self == other || (self.kind.is_check() && other.kind.is_check())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptType {
    Sub,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignType {
    Left,
    Center,
    Right,
    Justify,
}

impl AlignType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            "justify" => Some(Self::Justify),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionType {
    Rtl,
}

impl DirectionType {
    pub fn as_str(self) -> &'static str {
        "rtl"
    }
}

/// A sanitized `code-block` attribute: either a plain flag or a language
/// tag that renders as `data-language` on the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeBlockValue {
    Plain,
    Lang(String),
}

/// A sanitized mention object. Only fields that passed validation are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mention {
    pub css_class: Option<String>,
    pub id: Option<String>,
    pub target: Option<String>,
    pub avatar: Option<String>,
    pub end_point: Option<String>,
    pub slug: Option<String>,
}

impl Mention {
    pub fn is_empty(&self) -> bool {
        self.css_class.is_none()
            && self.id.is_none()
            && self.target.is_none()
            && self.avatar.is_none()
            && self.end_point.is_none()
            && self.slug.is_none()
    }
}

/// The full sanitized attribute set of one insert operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpAttributes {
    // Inline formatting
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    /// Inline code span.
    pub code: bool,
    pub script: Option<ScriptType>,
    pub link: Option<String>,
    pub target: Option<String>,
    pub rel: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
    pub font: Option<String>,
    pub size: Option<String>,
    /// Media width, already validated (`px`/`em`/`%` or bare digits).
    pub width: Option<String>,
    pub mention: Option<Mention>,

    // Block formatting, carried by line terminators
    pub blockquote: bool,
    pub code_block: Option<CodeBlockValue>,
    /// Header level, 1..=6.
    pub header: Option<u8>,
    pub list: Option<ListValue>,
    pub align: Option<AlignType>,
    pub direction: Option<DirectionType>,
    /// Indent level, 1..=30.
    pub indent: Option<u8>,

    /// Marks a custom embed that renders standalone instead of inline.
    pub render_as_block: bool,

    /// Unrecognized keys, passed through opaquely.
    pub extra: serde_json::Map<String, Value>,
}

impl OpAttributes {
    /// Whether any block-defining attribute is present. Ops carrying one
    /// terminate the line they follow.
    pub fn has_block_attribute(&self) -> bool {
        self.blockquote
            || self.code_block.is_some()
            || self.header.is_some()
            || self.list.is_some()
            || self.align.is_some()
            || self.direction.is_some()
            || self.indent.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_value_parses_kind_and_subtype() {
        assert_eq!(
            ListValue::parse("ordered"),
            Some(ListValue::new(ListKind::Ordered))
        );
        assert_eq!(
            ListValue::parse("ordered:a"),
            Some(ListValue {
                kind: ListKind::Ordered,
                subtype: Some("a".to_string()),
            })
        );
        assert_eq!(ListValue::parse("ordered:"), Some(ListValue::new(ListKind::Ordered)));
        assert_eq!(ListValue::parse("numbered"), None);
    }

    #[test]
    fn non_alphanumeric_subtypes_are_dropped() {
        assert_eq!(
            ListValue::parse("ordered:\"><script>alert(1)</script>"),
            Some(ListValue::new(ListKind::Ordered))
        );
        assert_eq!(
            ListValue::parse("ordered:a b"),
            Some(ListValue::new(ListKind::Ordered))
        );
        assert_eq!(
            ListValue::parse("bullet:x=y"),
            Some(ListValue::new(ListKind::Bullet))
        );
        assert_eq!(
            ListValue::parse("ordered:A1"),
            Some(ListValue {
                kind: ListKind::Ordered,
                subtype: Some("A1".to_string()),
            })
        );
    }

    #[test]
    fn checked_and_unchecked_are_the_same_list() {
        let checked = ListValue::new(ListKind::Checked);
        let unchecked = ListValue::new(ListKind::Unchecked);
        let bullet = ListValue::new(ListKind::Bullet);
        assert!(checked.same_list(&unchecked));
        assert!(!checked.same_list(&bullet));
    }

    #[test]
    fn subtype_changes_break_list_identity() {
        let alpha = ListValue::parse("ordered:a").unwrap();
        let roman = ListValue::parse("ordered:i").unwrap();
        assert!(!alpha.same_list(&roman));
        assert!(alpha.same_list(&alpha.clone()));
    }

    #[test]
    fn block_attribute_detection() {
        let mut attrs = OpAttributes::default();
        assert!(!attrs.has_block_attribute());
        attrs.bold = true;
        assert!(!attrs.has_block_attribute());
        attrs.indent = Some(2);
        assert!(attrs.has_block_attribute());
    }
}
