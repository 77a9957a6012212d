//! The grouping stages of the pipeline: pairing inline runs with their
//! block terminators, merging adjacent same-kind blocks, and nesting flat
//! list items into trees. Each stage is a pure function over the group
//! sequence, applied in that order.

pub mod merger;
pub mod nester;
pub mod pairer;
pub mod types;

pub use merger::{MergeToggles, merge_same_style_blocks};
pub use nester::nest_lists;
pub use pairer::pair_ops_with_blocks;
pub use types::{BlockGroup, EmbedBlock, Group, GroupType, InlineGroup, ListGroup, ListItem, MediaItem};
