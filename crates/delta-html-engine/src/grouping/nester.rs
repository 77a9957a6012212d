//! Rebuilds nested list trees from indentation-flat list blocks.

use super::types::{Group, ListGroup, ListItem};

/// Nests adjacent list blocks into `ListGroup` trees.
///
/// Works over an explicit stack of `(indent, group)` frames instead of
/// recursion, so malformed indent jumps cannot overflow the call stack.
/// A deeper item opens a new frame; an equal-indent item joins the top
/// frame as a sibling when its list kind matches, otherwise the top frame
/// closes and a sibling frame opens; a shallower item pops frames until
/// the top is at a matching-or-lower indent. A closed frame becomes the
/// nested list of the frame below's last item; when that item already owns
/// a nested list the closed frame's items are appended to it. Any non-list
/// group finalizes the whole stack into the output at that position.
pub fn nest_lists(groups: Vec<Group>) -> Vec<Group> {
    let mut out = Vec::new();
    let mut stack: Vec<(u8, ListGroup)> = Vec::new();

    for group in groups {
        match group {
            Group::Block(block) if block.op.is_list() => {
                let indent = block.op.indent();
                let item = ListItem::new(block);

                while let Some((top_indent, _)) = stack.last() {
                    if *top_indent <= indent {
                        break;
                    }
                    close_frame(&mut stack, &mut out);
                }

                match stack.last_mut() {
                    Some((top_indent, top)) if *top_indent == indent => {
                        let same_kind = top
                            .items
                            .first()
                            .is_some_and(|first| first.item.op.same_list_as(&item.item.op));
                        if same_kind {
                            top.items.push(item);
                        } else {
                            // Kind change at equal depth closes the list and
                            // opens a sibling container.
                            close_frame(&mut stack, &mut out);
                            stack.push((indent, ListGroup::new(vec![item])));
                        }
                    }
                    _ => stack.push((indent, ListGroup::new(vec![item]))),
                }
            }
            other => {
                close_stack(&mut stack, &mut out);
                out.push(other);
            }
        }
    }

    close_stack(&mut stack, &mut out);
    out
}

/// Pops the top frame. With a frame below, the popped group nests under
/// that frame's last item (appending when an inner list already exists);
/// at the bottom of the stack it finalizes into the output.
fn close_frame(stack: &mut Vec<(u8, ListGroup)>, out: &mut Vec<Group>) {
    let Some((_, group)) = stack.pop() else {
        return;
    };
    if let Some((_, parent)) = stack.last_mut()
        && let Some(parent_item) = parent.items.last_mut()
    {
        match &mut parent_item.inner_list {
            Some(inner) => inner.items.extend(group.items),
            None => parent_item.inner_list = Some(group),
        }
        return;
    }
    out.push(Group::List(group));
}

fn close_stack(stack: &mut Vec<(u8, ListGroup)>, out: &mut Vec<Group>) {
    while !stack.is_empty() {
        close_frame(stack, out);
    }
}
