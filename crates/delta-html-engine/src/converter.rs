//! The conversion facade.
//!
//! [`DeltaHtmlConverter`] owns the normalized op stream and the options,
//! builds the group tree on demand and walks it to HTML. The tree build is
//! pure: `grouped_ops` and `convert` may be called any number of times and
//! always produce the same result for the same inputs. Hooks are plain
//! synchronous callbacks stored on the converter; registering a hook twice
//! replaces the previous one silently.

use serde_json::Value;

use crate::error::ConvertError;
use crate::grouping::{
    BlockGroup, Group, GroupType, InlineGroup, ListGroup, ListItem, MergeToggles,
    merge_same_style_blocks, nest_lists, pair_ops_with_blocks,
};
use crate::html::{BR_TAG, TagAttr, encode_html, make_end_tag, make_start_tag};
use crate::op_html::OpHtmlConverter;
use crate::ops::{InsertOp, NEWLINE, normalize_ops};
use crate::options::ConverterOptions;

type BeforeRenderFn = Box<dyn Fn(GroupType, &Group) -> Option<String> + Send + Sync>;
type AfterRenderFn = Box<dyn Fn(GroupType, String) -> String + Send + Sync>;
type RenderCustomFn = Box<dyn Fn(&InsertOp, Option<&InsertOp>) -> String + Send + Sync>;

#[derive(Default)]
struct RenderHooks {
    before: Option<BeforeRenderFn>,
    after: Option<AfterRenderFn>,
    custom: Option<RenderCustomFn>,
}

/// Converts a delta op sequence to HTML.
///
/// Construction validates the options and normalizes the ops; after that
/// nothing can fail. Malformed ops have already degraded to safe defaults
/// by the time they are held here.
pub struct DeltaHtmlConverter {
    ops: Vec<InsertOp>,
    options: ConverterOptions,
    hooks: RenderHooks,
}

impl DeltaHtmlConverter {
    /// Builds a converter from raw op records.
    ///
    /// Fails only on invalid options; individual records that cannot be
    /// classified degrade per the normalizer's rules instead of erroring.
    pub fn new(ops: Vec<Value>, options: ConverterOptions) -> Result<Self, ConvertError> {
        options.validate()?;
        Ok(Self {
            ops: normalize_ops(&ops),
            options,
            hooks: RenderHooks::default(),
        })
    }

    /// Builds a converter from delta JSON: either a bare op array or a
    /// `{"ops": [...]}` document. Any other well-formed JSON shape yields
    /// an empty document rather than an error.
    pub fn from_json(json: &str, options: ConverterOptions) -> Result<Self, ConvertError> {
        let value: Value = serde_json::from_str(json)?;
        let ops = match value {
            Value::Array(ops) => ops,
            Value::Object(mut doc) => match doc.remove("ops") {
                Some(Value::Array(ops)) => ops,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Self::new(ops, options)
    }

    /// The grouped structure the renderer walks: pairing, merging and list
    /// nesting applied in order, rendering not yet. Rebuilt on every call;
    /// identical inputs produce identical trees.
    pub fn grouped_ops(&self) -> Vec<Group> {
        let paired = pair_ops_with_blocks(self.ops.clone());
        let merged = merge_same_style_blocks(
            paired,
            MergeToggles {
                blockquote: self.options.multi_line_blockquote,
                header: self.options.multi_line_header,
                code_block: self.options.multi_line_codeblock,
            },
        );
        nest_lists(merged)
    }

    /// Renders the whole document. Top-level groups concatenate in input
    /// order with no separators.
    pub fn convert(&self) -> String {
        self.grouped_ops()
            .iter()
            .map(|group| self.render_group(group))
            .collect()
    }

    /// Registers the before-render hook. Returning non-empty markup
    /// short-circuits the group's own rendering.
    pub fn before_render<F>(&mut self, hook: F)
    where
        F: Fn(GroupType, &Group) -> Option<String> + Send + Sync + 'static,
    {
        self.hooks.before = Some(Box::new(hook));
    }

    /// Registers the after-render hook, applied to every rendered group's
    /// markup before concatenation.
    pub fn after_render<F>(&mut self, hook: F)
    where
        F: Fn(GroupType, String) -> String + Send + Sync + 'static,
    {
        self.hooks.after = Some(Box::new(hook));
    }

    /// Registers the custom-embed renderer. Without one, custom embeds
    /// render as empty strings. The second argument is the governing block
    /// op when the embed sits inside a block, `None` otherwise.
    pub fn render_custom_with<F>(&mut self, hook: F)
    where
        F: Fn(&InsertOp, Option<&InsertOp>) -> String + Send + Sync + 'static,
    {
        self.hooks.custom = Some(Box::new(hook));
    }

    fn render_group(&self, group: &Group) -> String {
        match group {
            Group::List(list) => {
                self.render_with_hooks(GroupType::List, group, || self.render_list(list))
            }
            Group::Block(block) => {
                self.render_with_hooks(GroupType::Block, group, || self.render_block(block))
            }
            Group::Media(media) => self.render_with_hooks(GroupType::Media, group, || {
                OpHtmlConverter::new(&media.op, &self.options).html()
            }),
            // Embed blocks always go through the custom hook, never the
            // before/after hooks.
            Group::Embed(embed) => self.render_custom(&embed.op, None),
            Group::Inline(inline) => {
                self.render_with_hooks(GroupType::InlineGroup, group, || {
                    self.render_inline_group(inline)
                })
            }
        }
    }

    fn render_with_hooks(
        &self,
        group_type: GroupType,
        group: &Group,
        render: impl FnOnce() -> String,
    ) -> String {
        let mut html = self
            .hooks
            .before
            .as_ref()
            .and_then(|hook| hook(group_type, group))
            .unwrap_or_default();
        if html.is_empty() {
            html = render();
        }
        match &self.hooks.after {
            Some(hook) => hook(group_type, html),
            None => html,
        }
    }

    fn render_list(&self, list: &ListGroup) -> String {
        let Some(first) = list.items.first() else {
            return String::new();
        };
        let (tag, attrs) = self.list_container(&first.item.op);
        let items: String = list
            .items
            .iter()
            .map(|item| self.render_list_item(item))
            .collect();
        format!("{}{items}{}", make_start_tag(&tag, &attrs), make_end_tag(&tag))
    }

    /// Container tag and attributes for the list a first item opens. An
    /// ordered kind with a subtype carries it as the `type` attribute.
    fn list_container(&self, op: &InsertOp) -> (&str, Vec<TagAttr>) {
        if op.is_ordered_list() {
            let attrs = op
                .attributes
                .list
                .as_ref()
                .and_then(|list| list.subtype.as_deref())
                .map(|subtype| vec![TagAttr::new("type", subtype)])
                .unwrap_or_default();
            (self.options.ordered_list_tag.as_str(), attrs)
        } else {
            (self.options.bullet_list_tag.as_str(), Vec::new())
        }
    }

    fn render_list_item(&self, item: &ListItem) -> String {
        // Indent is structural: the nesting already encodes it, so it must
        // not resurface as a class or style on the item tag.
        let mut op = item.item.op.clone();
        op.attributes.indent = None;
        let parts = OpHtmlConverter::new(&op, &self.options).html_parts();
        let content = self.render_inlines(&item.item.ops);
        let inner = item
            .inner_list
            .as_ref()
            .map(|list| self.render_list(list))
            .unwrap_or_default();
        format!("{}{content}{inner}{}", parts.opening_tag, parts.closing_tag)
    }

    fn render_block(&self, block: &BlockGroup) -> String {
        let parts = OpHtmlConverter::new(&block.op, &self.options).html_parts();
        if block.op.is_code_block() {
            // Inside code, ops contribute their raw values (custom embeds
            // through the hook, with the block op as context) and the whole
            // body is escaped as plain text.
            let raw: String = block
                .ops
                .iter()
                .map(|op| {
                    if op.is_custom() {
                        self.render_custom(op, Some(&block.op))
                    } else {
                        op.plain_text().to_string()
                    }
                })
                .collect();
            return format!(
                "{}{}{}",
                parts.opening_tag,
                encode_html(&raw, true),
                parts.closing_tag
            );
        }
        let inlines: String = block
            .ops
            .iter()
            .map(|op| self.render_inline_op(op, Some(&block.op)))
            .collect();
        let content = if inlines.is_empty() {
            BR_TAG.to_string()
        } else {
            inlines
        };
        format!("{}{content}{}", parts.opening_tag, parts.closing_tag)
    }

    /// Renders an implicit paragraph. With multi-line paragraphs disabled
    /// the body splits at break markers and each piece wraps in its own
    /// paragraph tag; an empty piece (a blank line) renders as a marker.
    fn render_inline_group(&self, group: &InlineGroup) -> String {
        let html = self.render_inlines(&group.ops);
        let start = make_start_tag(&self.options.paragraph_tag, &[]);
        let end = make_end_tag(&self.options.paragraph_tag);
        if html == BR_TAG || self.options.multi_line_paragraph {
            return format!("{start}{html}{end}");
        }
        let body = html
            .split(BR_TAG)
            .map(|piece| if piece.is_empty() { BR_TAG } else { piece })
            .collect::<Vec<_>>()
            .join(&format!("{end}{start}"));
        format!("{start}{body}{end}")
    }

    /// Renders one line run without wrapping. A trailing lone newline op is
    /// dropped unless it is the run's only op.
    fn render_inlines(&self, ops: &[InsertOp]) -> String {
        let last = ops.len().saturating_sub(1);
        ops.iter()
            .enumerate()
            .map(|(i, op)| {
                if i > 0 && i == last && op.is_just_newline() {
                    String::new()
                } else {
                    self.render_inline_op(op, None)
                }
            })
            .collect()
    }

    fn render_inline_op(&self, op: &InsertOp, context: Option<&InsertOp>) -> String {
        if op.is_custom() {
            return self.render_custom(op, context);
        }
        OpHtmlConverter::new(op, &self.options)
            .html()
            .replace(NEWLINE, BR_TAG)
    }

    fn render_custom(&self, op: &InsertOp, context: Option<&InsertOp>) -> String {
        match &self.hooks.custom {
            Some(hook) => hook(op, context),
            None => String::new(),
        }
    }
}
