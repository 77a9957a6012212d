//! The operation model: typed insert content, sanitized attributes, and
//! the normalizer that produces the op stream the grouping stages consume.

pub mod attributes;
pub mod insert;
pub mod normalizer;
pub mod sanitizer;

pub use attributes::{
    AlignType, CodeBlockValue, DirectionType, ListKind, ListValue, Mention, OpAttributes,
    ScriptType,
};
pub use insert::{CustomEmbed, InsertContent, InsertOp, NEWLINE};
pub use normalizer::normalize_ops;
