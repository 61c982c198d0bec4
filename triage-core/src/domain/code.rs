//! Code snippet domain types

use serde::{Deserialize, Serialize};

/// A source excerpt implicated by one or more log lines
///
/// Duplicates are kept as the backend sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSnippet")]
pub struct CodeSnippet {
    pub file: String,
    pub code: String,
}

impl CodeSnippet {
    pub fn new(file: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            code: code.into(),
        }
    }
}

/// The backend sends either bare snippet bodies or `{file, code}` objects
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSnippet {
    Bare(String),
    Located {
        #[serde(default)]
        file: String,
        code: String,
    },
}

impl From<RawSnippet> for CodeSnippet {
    fn from(raw: RawSnippet) -> Self {
        match raw {
            RawSnippet::Bare(code) => CodeSnippet {
                file: String::new(),
                code,
            },
            RawSnippet::Located { file, code } => CodeSnippet { file, code },
        }
    }
}
