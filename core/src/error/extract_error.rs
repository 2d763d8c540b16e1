// core/src/error/extract_error.rs
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("pattern `{pattern}` did not match")]
    PatternNotFound { pattern: String },

    #[error("pattern `{pattern}` has no capture group {group}")]
    GroupNotFound { pattern: String, group: usize },

    #[error("cannot convert `{value}` to {target}")]
    Conversion { value: String, target: &'static str },
}

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid regex `{pattern}`")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid glob `{pattern}`")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("test `{test}`: {reason}")]
    Invalid { test: String, reason: String },
}
