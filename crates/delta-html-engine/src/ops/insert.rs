//! The normalized insert operation and its classification predicates.

use serde_json::Value;

use super::attributes::OpAttributes;

/// Line terminator inside text inserts.
pub const NEWLINE: &str = "\n";

/// A custom embed payload: any single-key insert object whose key is not
/// one of the built-in embed names, or any payload that could not be
/// classified at all (kept under the name `"unknown"`).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomEmbed {
    pub name: String,
    pub value: Value,
}

/// What an insert operation carries.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertContent {
    Text(String),
    /// Image source URL, already link-sanitized.
    Image(String),
    /// Video source URL, already link-sanitized.
    Video(String),
    Formula(String),
    Custom(CustomEmbed),
}

/// One normalized operation: content plus sanitized attributes.
///
/// After normalization every text op is either a pure fragment (no
/// newlines) or exactly one `"\n"`; block attributes only ever appear on
/// newline ops and on embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOp {
    pub content: InsertContent,
    pub attributes: OpAttributes,
}

impl InsertOp {
    pub fn new(content: InsertContent, attributes: OpAttributes) -> Self {
        Self {
            content,
            attributes,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(InsertContent::Text(value.into()), OpAttributes::default())
    }

    pub fn text_with(value: impl Into<String>, attributes: OpAttributes) -> Self {
        Self::new(InsertContent::Text(value.into()), attributes)
    }

    /// A plain line terminator with no attributes.
    pub fn newline() -> Self {
        Self::text(NEWLINE)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.content, InsertContent::Text(_))
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, InsertContent::Image(_))
    }

    pub fn is_video(&self) -> bool {
        matches!(self.content, InsertContent::Video(_))
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, InsertContent::Formula(_))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.content, InsertContent::Custom(_))
    }

    /// Image or video: embeds that stand alone in the group stream.
    pub fn is_media(&self) -> bool {
        self.is_image() || self.is_video()
    }

    /// A custom embed flagged to render as its own block.
    pub fn is_custom_embed_block(&self) -> bool {
        self.is_custom() && self.attributes.render_as_block
    }

    /// Anything that flows within a line: text, formulas and inline
    /// custom embeds.
    pub fn is_inline(&self) -> bool {
        !(self.is_container_block() || self.is_media() || self.is_custom_embed_block())
    }

    pub fn is_just_newline(&self) -> bool {
        matches!(&self.content, InsertContent::Text(t) if t == NEWLINE)
    }

    /// Whether this op terminates a block: a text op carrying any
    /// block-defining attribute swallows the line of inline ops before it.
    /// Embeds never terminate, whatever attributes they carry.
    pub fn is_container_block(&self) -> bool {
        self.is_text() && self.attributes.has_block_attribute()
    }

    pub fn is_blockquote(&self) -> bool {
        self.attributes.blockquote
    }

    pub fn is_code_block(&self) -> bool {
        self.attributes.code_block.is_some()
    }

    pub fn code_block_language(&self) -> Option<&str> {
        match &self.attributes.code_block {
            Some(super::attributes::CodeBlockValue::Lang(lang)) => Some(lang),
            _ => None,
        }
    }

    pub fn is_header(&self) -> bool {
        self.attributes.header.is_some()
    }

    pub fn header_level(&self) -> u8 {
        self.attributes.header.unwrap_or(0)
    }

    pub fn is_same_header_as(&self, other: &Self) -> bool {
        self.is_header() && other.is_header() && self.header_level() == other.header_level()
    }

    pub fn is_list(&self) -> bool {
        self.attributes.list.is_some()
    }

    pub fn is_ordered_list(&self) -> bool {
        matches!(
            &self.attributes.list,
            Some(list) if list.kind == super::attributes::ListKind::Ordered
        )
    }

    pub fn is_bullet_list(&self) -> bool {
        matches!(
            &self.attributes.list,
            Some(list) if list.kind == super::attributes::ListKind::Bullet
        )
    }

    pub fn is_checked_list(&self) -> bool {
        matches!(
            &self.attributes.list,
            Some(list) if list.kind == super::attributes::ListKind::Checked
        )
    }

    pub fn is_unchecked_list(&self) -> bool {
        matches!(
            &self.attributes.list,
            Some(list) if list.kind == super::attributes::ListKind::Unchecked
        )
    }

    pub fn is_check_list(&self) -> bool {
        self.is_checked_list() || self.is_unchecked_list()
    }

    /// Whether two list ops belong in the same container. Checked and
    /// unchecked items share a container; anything else compares exact.
    pub fn same_list_as(&self, other: &Self) -> bool {
        match (&self.attributes.list, &other.attributes.list) {
            (Some(a), Some(b)) => a.same_list(b),
            _ => false,
        }
    }

    pub fn indent(&self) -> u8 {
        self.attributes.indent.unwrap_or(0)
    }

    pub fn is_link(&self) -> bool {
        self.is_text() && self.attributes.link.is_some()
    }

    pub fn is_mentions(&self) -> bool {
        self.is_text() && self.attributes.mention.is_some()
    }

    /// The raw text of a text op, empty for embeds.
    pub fn plain_text(&self) -> &str {
        match &self.content {
            InsertContent::Text(t) => t,
            _ => "",
        }
    }
}
