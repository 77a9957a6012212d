//! Renders a single insert operation to HTML parts.
//!
//! The converter picks tags from the op's attributes (block attributes win
//! outright, inline attributes nest), assembles `class`/`style`/tag
//! attributes, and escapes content. Group-level concerns (paragraph
//! wrapping, list containers, hook dispatch) live in the renderer; this
//! module only ever sees one op at a time.

use crate::html::{TagAttr, encode_html, encode_whitespaces, make_end_tag, make_start_tag};
use crate::ops::sanitizer::{is_valid_color_literal, is_valid_rel, is_valid_target};
use crate::ops::{DirectionType, InsertContent, InsertOp, NEWLINE, OpAttributes, ScriptType};
use crate::options::{ConverterOptions, InlineStyles, StyleFn};

/// The three pieces a rendered op decomposes into. Callers that wrap other
/// content (list items, block containers) splice between opening and
/// closing; plain inline rendering concatenates all three.
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlParts {
    pub opening_tag: String,
    pub content: String,
    pub closing_tag: String,
}

pub struct OpHtmlConverter<'a> {
    op: &'a InsertOp,
    options: &'a ConverterOptions,
}

impl<'a> OpHtmlConverter<'a> {
    pub fn new(op: &'a InsertOp, options: &'a ConverterOptions) -> Self {
        Self { op, options }
    }

    pub fn html(&self) -> String {
        let parts = self.html_parts();
        format!("{}{}{}", parts.opening_tag, parts.content, parts.closing_tag)
    }

    pub fn html_parts(&self) -> HtmlParts {
        // A bare line break renders as raw content so inline rendering can
        // turn it into a break marker.
        if self.op.is_just_newline() && !self.op.is_container_block() {
            return HtmlParts {
                opening_tag: String::new(),
                content: NEWLINE.to_string(),
                closing_tag: String::new(),
            };
        }

        let mut tags = self.tags();
        let mut attrs = self.tag_attributes();
        if tags.is_empty() && !attrs.is_empty() {
            tags.push("span".to_string());
        }

        let mut opening = Vec::new();
        let mut closing = Vec::new();
        for tag in &tags {
            let image_link = tag == "img" && self.op.attributes.link.is_some();
            if image_link {
                opening.push(make_start_tag("a", &self.link_attrs()));
            }
            opening.push(make_start_tag(tag, &attrs));
            closing.push(if tag == "img" {
                String::new()
            } else {
                make_end_tag(tag)
            });
            if image_link {
                closing.push(make_end_tag("a"));
            }
            // The outermost tag consumes the attributes.
            attrs = Vec::new();
        }
        closing.reverse();

        HtmlParts {
            opening_tag: opening.concat(),
            content: self.content(),
            closing_tag: closing.concat(),
        }
    }

    fn content(&self) -> String {
        if self.op.is_container_block() {
            return String::new();
        }
        if self.op.is_mentions() {
            return self.op.plain_text().to_string();
        }
        let raw = match &self.op.content {
            InsertContent::Text(text) => text.as_str(),
            InsertContent::Formula(formula) => formula.as_str(),
            _ => "",
        };
        let mut content = if self.options.encode_html {
            encode_html(raw, true)
        } else {
            raw.to_string()
        };
        if self.options.encode_whitespaces {
            content = encode_whitespaces(&content);
        }
        content
    }

    /// Tag selection. Non-text ops map to their embed tag; for text the
    /// first matching block attribute decides alone, and inline attributes
    /// nest outside-in in a fixed order.
    fn tags(&self) -> Vec<String> {
        if !self.op.is_text() {
            let tag = if self.op.is_video() {
                "iframe"
            } else if self.op.is_image() {
                "img"
            } else {
                "span"
            };
            return vec![tag.to_string()];
        }

        let attrs = &self.op.attributes;
        if attrs.blockquote {
            return vec!["blockquote".to_string()];
        }
        if attrs.code_block.is_some() {
            return vec!["pre".to_string()];
        }
        if attrs.list.is_some() {
            return vec![self.options.list_item_tag.clone()];
        }
        if let Some(level) = attrs.header {
            return vec![format!("h{level}")];
        }
        if attrs.align.is_some() || attrs.direction.is_some() || attrs.indent.is_some() {
            return vec![self.options.paragraph_tag.clone()];
        }

        let mut tags = Vec::new();
        if attrs.link.is_some() {
            tags.push("a".to_string());
        }
        if attrs.mention.is_some() {
            tags.push("a".to_string());
        }
        if let Some(script) = attrs.script {
            let tag = match script {
                ScriptType::Sub => "sub",
                ScriptType::Super => "sup",
            };
            tags.push(tag.to_string());
        }
        if attrs.bold {
            tags.push("strong".to_string());
        }
        if attrs.italic {
            tags.push("em".to_string());
        }
        if attrs.strike {
            tags.push("s".to_string());
        }
        if attrs.underline {
            tags.push("u".to_string());
        }
        if attrs.code {
            tags.push("code".to_string());
        }
        tags
    }

    fn tag_attributes(&self) -> Vec<TagAttr> {
        let attrs = &self.op.attributes;
        // Inline code spans render bare; only links keep their attributes.
        if attrs.code && !self.op.is_link() {
            return Vec::new();
        }

        let classes = self.css_classes();
        let mut tag_attrs = Vec::new();
        if !classes.is_empty() {
            tag_attrs.push(TagAttr::new("class", classes.join(" ")));
        }

        if let InsertContent::Image(url) = &self.op.content {
            if let Some(width) = &attrs.width {
                tag_attrs.push(TagAttr::new("width", width));
            }
            tag_attrs.push(TagAttr::new("src", url));
            return tag_attrs;
        }

        if self.op.is_check_list() {
            let checked = if self.op.is_checked_list() { "true" } else { "false" };
            tag_attrs.push(TagAttr::new("data-checked", checked));
            return tag_attrs;
        }

        if self.op.is_formula() {
            return tag_attrs;
        }

        if let InsertContent::Video(url) = &self.op.content {
            tag_attrs.push(TagAttr::new("frameborder", "0"));
            tag_attrs.push(TagAttr::new("allowfullscreen", "true"));
            tag_attrs.push(TagAttr::new("src", url));
            return tag_attrs;
        }

        if let Some(mention) = &attrs.mention {
            if let Some(class) = &mention.css_class {
                tag_attrs.push(TagAttr::new("class", class));
            }
            match (&mention.end_point, &mention.slug) {
                (Some(end_point), Some(slug)) => {
                    tag_attrs.push(TagAttr::new("href", format!("{end_point}/{slug}")));
                }
                _ => tag_attrs.push(TagAttr::new("href", "about:blank")),
            }
            if let Some(target) = &mention.target {
                tag_attrs.push(TagAttr::new("target", target));
            }
            return tag_attrs;
        }

        let styles = self.css_styles();
        if !styles.is_empty() {
            tag_attrs.push(TagAttr::new("style", styles.join(";")));
        }

        if let Some(lang) = self.op.code_block_language() {
            tag_attrs.push(TagAttr::new("data-language", lang));
            return tag_attrs;
        }

        if self.op.is_container_block() {
            return tag_attrs;
        }

        if self.op.is_link() {
            tag_attrs.extend(self.link_attrs());
        }

        tag_attrs
    }

    fn link_attrs(&self) -> Vec<TagAttr> {
        let attrs = &self.op.attributes;
        let global_target =
            Some(self.options.link_target.as_str()).filter(|target| is_valid_target(target));
        let global_rel = self.options.link_rel.as_deref().filter(|rel| is_valid_rel(rel));

        let mut out = Vec::new();
        if let Some(link) = &attrs.link {
            out.push(TagAttr::new("href", link));
        }
        if let Some(target) = attrs.target.as_deref().or(global_target) {
            out.push(TagAttr::new("target", target));
        }
        if let Some(rel) = attrs.rel.as_deref().or(global_rel) {
            out.push(TagAttr::new("rel", rel));
        }
        out
    }

    /// Class mode only. Structural attributes map to `{prefix}-{attr}-{value}`
    /// and embeds get a `{prefix}-{kind}` marker.
    fn css_classes(&self) -> Vec<String> {
        if self.options.inline_styles.is_some() {
            return Vec::new();
        }
        let attrs = &self.op.attributes;
        let mut classes = Vec::new();
        if let Some(indent) = attrs.indent {
            classes.push(format!("indent-{indent}"));
        }
        if let Some(align) = attrs.align {
            classes.push(format!("align-{}", align.as_str()));
        }
        if let Some(direction) = attrs.direction {
            classes.push(format!("direction-{}", direction.as_str()));
        }
        if let Some(font) = &attrs.font {
            classes.push(format!("font-{font}"));
        }
        if let Some(size) = &attrs.size {
            classes.push(format!("size-{size}"));
        }
        if self.options.allow_background_classes
            && let Some(background) = &attrs.background
            && is_valid_color_literal(background)
        {
            classes.push(format!("background-{background}"));
        }
        if self.op.is_formula() {
            classes.push("formula".to_string());
        }
        if self.op.is_video() {
            classes.push("video".to_string());
        }
        if self.op.is_image() {
            classes.push("image".to_string());
        }
        classes.iter().map(|class| self.prefixed(class)).collect()
    }

    /// Colors always render as styles; the structural attributes join them
    /// only in inline-styles mode, each through its override-or-default
    /// conversion.
    fn css_styles(&self) -> Vec<String> {
        let attrs = &self.op.attributes;
        let mut styles = Vec::new();

        if let Some(color) = &attrs.color {
            styles.extend(self.resolve_style(|s| &s.color, color_style, color));
        }
        if (self.options.inline_styles.is_some() || !self.options.allow_background_classes)
            && let Some(background) = &attrs.background
        {
            styles.extend(self.resolve_style(|s| &s.background, background_style, background));
        }
        if self.options.inline_styles.is_some() {
            if let Some(indent) = attrs.indent {
                styles.extend(self.resolve_style(|s| &s.indent, indent_style, &indent.to_string()));
            }
            if let Some(align) = attrs.align {
                styles.extend(self.resolve_style(|s| &s.align, align_style, align.as_str()));
            }
            if let Some(direction) = attrs.direction {
                styles.extend(self.resolve_style(
                    |s| &s.direction,
                    direction_style,
                    direction.as_str(),
                ));
            }
            if let Some(font) = &attrs.font {
                styles.extend(self.resolve_style(|s| &s.font, font_style, font));
            }
            if let Some(size) = &attrs.size {
                styles.extend(self.resolve_style(|s| &s.size, size_style, size));
            }
        }
        styles
    }

    fn resolve_style(
        &self,
        pick: fn(&InlineStyles) -> &Option<StyleFn>,
        default: fn(&str, &OpAttributes) -> Option<String>,
        value: &str,
    ) -> Option<String> {
        if let Some(overrides) = &self.options.inline_styles
            && let Some(custom) = pick(overrides)
        {
            return custom(value, &self.op.attributes);
        }
        default(value, &self.op.attributes)
    }

    fn prefixed(&self, name: &str) -> String {
        if self.options.class_prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}-{name}", self.options.class_prefix)
        }
    }
}

fn color_style(value: &str, _: &OpAttributes) -> Option<String> {
    Some(format!("color:{value}"))
}

fn background_style(value: &str, _: &OpAttributes) -> Option<String> {
    Some(format!("background-color:{value}"))
}

/// Indent pads 3em per level, on the right for rtl text.
fn indent_style(value: &str, attrs: &OpAttributes) -> Option<String> {
    let depth: u32 = value.parse().ok()?;
    let side = match attrs.direction {
        Some(DirectionType::Rtl) => "right",
        None => "left",
    };
    Some(format!("padding-{side}:{}em", depth * 3))
}

fn align_style(value: &str, _: &OpAttributes) -> Option<String> {
    Some(format!("text-align:{value}"))
}

/// Alignment stays inherited unless the op carries its own `align`.
fn direction_style(value: &str, attrs: &OpAttributes) -> Option<String> {
    if value != "rtl" {
        return None;
    }
    if attrs.align.is_some() {
        Some("direction:rtl".to_string())
    } else {
        Some("direction:rtl; text-align:inherit".to_string())
    }
}

fn font_style(value: &str, _: &OpAttributes) -> Option<String> {
    match value {
        "serif" => Some("font-family: Georgia, Times New Roman, serif".to_string()),
        "monospace" => Some("font-family: Monaco, Courier New, monospace".to_string()),
        _ => Some(format!("font-family:{value}")),
    }
}

/// Named sizes map to em values; unknown sizes drop the style entirely.
fn size_style(value: &str, _: &OpAttributes) -> Option<String> {
    match value {
        "small" => Some("font-size: 0.75em".to_string()),
        "large" => Some("font-size: 1.5em".to_string()),
        "huge" => Some("font-size: 2.5em".to_string()),
        _ => None,
    }
}
