//! Pairs block terminators with the inline ops they govern.

use crate::ops::InsertOp;

use super::types::{BlockGroup, EmbedBlock, Group, InlineGroup, MediaItem};

/// Walks the normalized op stream and produces the flat group sequence.
///
/// Inline content accumulates in a buffer. Media and embed blocks flush
/// the whole buffer and stand alone; a block terminator only captures
/// the buffered ops after the last bare newline, so a block never
/// swallows content from a previous line. Everything left at the end
/// becomes a trailing inline group.
pub fn pair_ops_with_blocks(ops: Vec<InsertOp>) -> Vec<Group> {
    let mut groups = Vec::new();
    let mut buffer: Vec<InsertOp> = Vec::new();

    for op in ops {
        if op.is_media() {
            flush_buffer(&mut buffer, &mut groups);
            groups.push(Group::Media(MediaItem { op }));
        } else if op.is_custom_embed_block() {
            flush_buffer(&mut buffer, &mut groups);
            groups.push(Group::Embed(EmbedBlock { op }));
        } else if op.is_container_block() {
            let line = split_off_current_line(&mut buffer);
            flush_buffer(&mut buffer, &mut groups);
            groups.push(Group::Block(BlockGroup::new(op, line)));
        } else {
            buffer.push(op);
        }
    }

    flush_buffer(&mut buffer, &mut groups);
    groups
}

/// Splits off the ops after the last bare newline in the buffer; with no
/// bare newline present the whole buffer is the current line.
fn split_off_current_line(buffer: &mut Vec<InsertOp>) -> Vec<InsertOp> {
    match buffer.iter().rposition(|op| op.is_just_newline()) {
        Some(newline_at) => buffer.split_off(newline_at + 1),
        None => std::mem::take(buffer),
    }
}

fn flush_buffer(buffer: &mut Vec<InsertOp>, groups: &mut Vec<Group>) {
    if !buffer.is_empty() {
        groups.push(Group::Inline(InlineGroup::new(std::mem::take(buffer))));
    }
}
