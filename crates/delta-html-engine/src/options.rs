//! Converter configuration.
//!
//! All options have working defaults; validation happens once at converter
//! construction so `convert()` itself stays infallible.

use std::fmt;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::ops::OpAttributes;

/// A per-attribute style converter: receives the attribute value and the
/// full attribute set of the op, returns the CSS declaration to emit (or
/// `None` to drop the style).
pub type StyleFn = Arc<dyn Fn(&str, &OpAttributes) -> Option<String> + Send + Sync>;

/// Per-attribute overrides for inline-styles mode. An unset field falls
/// back to the built-in conversion for that attribute.
#[derive(Clone, Default)]
pub struct InlineStyles {
    pub color: Option<StyleFn>,
    pub background: Option<StyleFn>,
    pub indent: Option<StyleFn>,
    pub align: Option<StyleFn>,
    pub direction: Option<StyleFn>,
    pub font: Option<StyleFn>,
    pub size: Option<StyleFn>,
}

impl fmt::Debug for InlineStyles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set = |field: &Option<StyleFn>| if field.is_some() { "custom" } else { "default" };
        f.debug_struct("InlineStyles")
            .field("color", &set(&self.color))
            .field("background", &set(&self.background))
            .field("indent", &set(&self.indent))
            .field("align", &set(&self.align))
            .field("direction", &set(&self.direction))
            .field("font", &set(&self.font))
            .field("size", &set(&self.size))
            .finish()
    }
}

/// Options accepted by the converter.
///
/// `inline_styles: None` selects class mode (`ql-*` classes on tags);
/// `Some(InlineStyles::default())` switches to inline `style` attributes
/// with the built-in conversions.
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    pub paragraph_tag: String,
    pub ordered_list_tag: String,
    pub bullet_list_tag: String,
    pub list_item_tag: String,

    /// Escape `& < > " ' /` in text content.
    pub encode_html: bool,
    /// Rewrite runs of spaces as `&nbsp;` sequences.
    pub encode_whitespaces: bool,

    pub class_prefix: String,
    pub inline_styles: Option<InlineStyles>,
    /// Emit `background` as a class (color literals only) instead of a
    /// `background-color` style.
    pub allow_background_classes: bool,

    /// `target` applied to links without their own; empty disables it.
    pub link_target: String,
    /// `rel` applied to links without their own.
    pub link_rel: Option<String>,

    pub multi_line_blockquote: bool,
    pub multi_line_header: bool,
    pub multi_line_codeblock: bool,
    pub multi_line_paragraph: bool,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            paragraph_tag: "p".to_string(),
            ordered_list_tag: "ol".to_string(),
            bullet_list_tag: "ul".to_string(),
            list_item_tag: "li".to_string(),
            encode_html: true,
            encode_whitespaces: false,
            class_prefix: "ql".to_string(),
            inline_styles: None,
            allow_background_classes: false,
            link_target: "_blank".to_string(),
            link_rel: None,
            multi_line_blockquote: true,
            multi_line_header: true,
            multi_line_codeblock: true,
            multi_line_paragraph: true,
        }
    }
}

impl ConverterOptions {
    /// Checks the caller-supplied values that end up in tag position.
    /// Everything else is either typed or sanitized per op.
    pub fn validate(&self) -> Result<(), ConvertError> {
        for (option, value) in [
            ("paragraph tag", &self.paragraph_tag),
            ("ordered list tag", &self.ordered_list_tag),
            ("bullet list tag", &self.bullet_list_tag),
            ("list item tag", &self.list_item_tag),
        ] {
            if !is_valid_tag_name(value) {
                return Err(ConvertError::InvalidTagName {
                    option,
                    value: value.clone(),
                });
            }
        }
        if !is_valid_class_prefix(&self.class_prefix) {
            return Err(ConvertError::InvalidClassPrefix {
                value: self.class_prefix.clone(),
            });
        }
        Ok(())
    }
}

fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// The prefix may be empty (bare class names) but never contain anything
/// outside ASCII alphanumerics, `-` and `_`.
fn is_valid_class_prefix(prefix: &str) -> bool {
    prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
