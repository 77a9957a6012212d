//! Group tree nodes produced by the pairing, merging and nesting stages.

use crate::ops::InsertOp;

/// Ops with no governing block. Renders as an implicit paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineGroup {
    pub ops: Vec<InsertOp>,
}

impl InlineGroup {
    pub fn new(ops: Vec<InsertOp>) -> Self {
        Self { ops }
    }
}

/// A governing block terminator plus the inline ops it captured. After
/// merging, `ops` may span several source lines joined by `"\n"` ops.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGroup {
    pub op: InsertOp,
    pub ops: Vec<InsertOp>,
}

impl BlockGroup {
    pub fn new(op: InsertOp, ops: Vec<InsertOp>) -> Self {
        Self { op, ops }
    }
}

/// A standalone image or video.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub op: InsertOp,
}

/// A custom embed flagged `renderAsBlock`. Always rendered through the
/// custom hook, never through the before/after hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedBlock {
    pub op: InsertOp,
}

/// One list entry: its block payload plus at most one nested list of
/// strictly deeper indent.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub item: BlockGroup,
    pub inner_list: Option<ListGroup>,
}

impl ListItem {
    pub fn new(item: BlockGroup) -> Self {
        Self {
            item,
            inner_list: None,
        }
    }
}

/// Sibling list items of one container, same depth and compatible kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ListGroup {
    pub items: Vec<ListItem>,
}

impl ListGroup {
    pub fn new(items: Vec<ListItem>) -> Self {
        Self { items }
    }
}

/// A top-level unit of the group stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    Inline(InlineGroup),
    Block(BlockGroup),
    List(ListGroup),
    Media(MediaItem),
    Embed(EmbedBlock),
}

/// Group kinds as seen by the render hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupType {
    InlineGroup,
    Block,
    List,
    Media,
}
