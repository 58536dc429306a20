// SPDX-License-Identifier: Apache-2.0
//! Error types for GMH instrument interaction.

/// Errors arising from loading or talking to the vendor GMH library.
#[derive(Debug, thiserror::Error)]
pub enum GmhError {
    #[error("failed to load GMH library at '{path}': {cause}")]
    LoadFailed { path: String, cause: String },

    #[error("symbol '{symbol}' not found in GMH library: {cause}")]
    SymbolNotFound { symbol: String, cause: String },

    #[error("GMH library does not export '{0}'")]
    NotSupported(&'static str),

    #[error("GMH call failed with status {code} ({})", .message.as_deref().unwrap_or("no vendor message"))]
    Status { code: i16, message: Option<String> },

    #[error("failed to decode GMH response: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GmhError {
    /// Raw vendor status code, if this error carries one.
    pub fn status_code(&self) -> Option<i16> {
        match self {
            GmhError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GmhError>;
