use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 1-based line and column of a byte offset in the source text. Columns
/// count characters, not bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(source.len());
        let before = &source.as_bytes()[..offset];
        let line = before.iter().filter(|b| **b == b'\n').count() as u32 + 1;
        let line_start = before
            .iter()
            .rposition(|b| *b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let column = source
            .get(line_start..offset)
            .map(|text| text.chars().count())
            .unwrap_or(offset - line_start);
        SourceLocation {
            line,
            column: column as u32 + 1,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Rejection of a single listing path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

/// Failure of one of the preview compiler stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("compile failed:\n{}", .diagnostics.join("\n"))]
    Compile { diagnostics: Vec<String> },

    #[error("unsupported construct '{construct}' at {location}")]
    UnsupportedConstruct {
        construct: String,
        location: SourceLocation,
    },

    #[error("entry component '{name}' is not a valid identifier")]
    InvalidEntry { name: String },

    #[error("cannot decode file contents: {reason}")]
    Decode { reason: String },

    #[error("invalid preview configuration: {reason}")]
    Config { reason: String },
}

impl PreviewError {
    pub fn compile<I, S>(diagnostics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        PreviewError::Compile {
            diagnostics: diagnostics.into_iter().map(|d| d.to_string()).collect(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
