//! Errors surfaced at converter construction. Conversion itself never
//! fails; malformed ops degrade instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid {option} `{value}`: tag names must be ASCII alphanumeric and start with a letter")]
    InvalidTagName { option: &'static str, value: String },

    #[error("invalid class prefix `{value}`: only ASCII alphanumerics, `-` and `_` are allowed")]
    InvalidClassPrefix { value: String },

    #[error("failed to parse delta JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}
