//! Converts rich-text insert deltas to HTML.
//!
//! The input is a flat sequence of insert operations (text runs, line
//! breaks carrying block attributes, media, custom embeds); the output is
//! a single HTML string. Conversion is a pure five-stage pipeline:
//! normalize the raw records, pair inline runs with their governing block
//! terminators, merge adjacent same-kind blocks, nest flat list items into
//! trees, then render the resulting groups.
//!
//! ```rust
//! use delta_html_engine::{ConverterOptions, DeltaHtmlConverter};
//!
//! let delta = r#"[
//!     {"insert": "Hello "},
//!     {"insert": "world", "attributes": {"bold": true}},
//!     {"insert": "\n"}
//! ]"#;
//! let converter = DeltaHtmlConverter::from_json(delta, ConverterOptions::default()).unwrap();
//! assert_eq!(converter.convert(), "<p>Hello <strong>world</strong></p>");
//! ```

pub mod converter;
pub mod error;
pub mod grouping;
pub mod html;
pub mod op_html;
pub mod ops;
pub mod options;

// Re-export the public surface for easier usage
pub use converter::DeltaHtmlConverter;
pub use error::ConvertError;
pub use grouping::{
    BlockGroup, EmbedBlock, Group, GroupType, InlineGroup, ListGroup, ListItem, MediaItem,
};
pub use ops::{CustomEmbed, InsertContent, InsertOp, OpAttributes};
pub use options::{ConverterOptions, InlineStyles, StyleFn};
