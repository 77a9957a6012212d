//! Merges adjacent same-kind block groups into single multi-line blocks.

use crate::ops::InsertOp;

use super::types::{BlockGroup, Group};

/// Which block kinds may merge with an adjacent same-kind neighbor.
#[derive(Debug, Clone, Copy)]
pub struct MergeToggles {
    pub blockquote: bool,
    pub header: bool,
    pub code_block: bool,
}

impl MergeToggles {
    /// Whether `next` continues a run started by `prev`. Headers must also
    /// agree on level; blockquotes and code blocks merge on kind alone.
    fn merges(&self, prev: &BlockGroup, next: &BlockGroup) -> bool {
        (self.code_block && prev.op.is_code_block() && next.op.is_code_block())
            || (self.blockquote && prev.op.is_blockquote() && next.op.is_blockquote())
            || (self.header && prev.op.is_same_header_as(&next.op))
    }
}

/// Collapses runs of adjacent mergeable blocks into one block per run,
/// keeping the first terminator as the governing op. Constituents' inline
/// ops are joined with `"\n"` separator ops so line boundaries survive into
/// inline rendering. Lists and inline groups are never touched here.
///
/// Every emitted block (merged or not) with no inline ops receives a single
/// newline op, so blank block lines render as a break marker downstream.
pub fn merge_same_style_blocks(groups: Vec<Group>, toggles: MergeToggles) -> Vec<Group> {
    let mut out = Vec::new();
    let mut run: Vec<BlockGroup> = Vec::new();

    for group in groups {
        match group {
            Group::Block(block) => {
                if let Some(prev) = run.last()
                    && !toggles.merges(prev, &block)
                {
                    flush_run(&mut run, &mut out);
                }
                run.push(block);
            }
            other => {
                flush_run(&mut run, &mut out);
                out.push(other);
            }
        }
    }

    flush_run(&mut run, &mut out);
    out
}

/// Emits the pending run as one block. An empty constituent contributes
/// just a newline op; a non-empty one its ops plus a separator newline when
/// more constituents follow.
fn flush_run(run: &mut Vec<BlockGroup>, out: &mut Vec<Group>) {
    let blocks = std::mem::take(run);
    let Some(governing) = blocks.first().map(|block| block.op.clone()) else {
        return;
    };
    let last = blocks.len() - 1;
    let mut ops = Vec::new();
    for (i, block) in blocks.into_iter().enumerate() {
        if block.ops.is_empty() {
            ops.push(InsertOp::newline());
            continue;
        }
        ops.extend(block.ops);
        if i < last {
            ops.push(InsertOp::newline());
        }
    }
    out.push(Group::Block(BlockGroup::new(governing, ops)));
}
