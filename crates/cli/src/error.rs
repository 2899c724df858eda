// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Failure categories. Each one maps to a distinct process exit status so a
/// scheduler can tell which leg of the sync broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Configuration,
    Schedule,
    ChatLookup,
    ChatUpdate,
    Credential,
}

impl ErrorCode {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration => 1,
            Self::Schedule => -1,
            Self::ChatLookup => -2,
            Self::ChatUpdate => -3,
            Self::Credential => -4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "CONFIGURATION",
            Self::Schedule => "SCHEDULE",
            Self::ChatLookup => "CHAT_LOOKUP",
            Self::ChatUpdate => "CHAT_UPDATE",
            Self::Credential => "CREDENTIAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a credential object could not be read from the blob store.
///
/// Never carries the bucket or key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    NotFound,
    Status(u16),
    Unexpected(String),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("given file does not exist in the bucket"),
            Self::Status(status) => write!(f, "blob store returned HTTP status {status}"),
            Self::Unexpected(detail) => write!(f, "unexpected blob store response: {detail}"),
        }
    }
}

/// Error returned by every remote boundary of a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A required setting or environment variable is absent.
    MissingConfiguration(String),
    /// The credential object could not be fetched.
    Credential(BlobError),
    /// The remote answered with a non-success status, or never answered
    /// (`status` is `None` for transport failures).
    Upstream { code: ErrorCode, context: String, status: Option<u16>, body: String },
    /// The remote answered successfully but the body lacked the expected shape.
    UnexpectedResponse { code: ErrorCode, context: String, body: String },
    /// A lookup by name matched nothing.
    NotFound { code: ErrorCode, context: String },
}

impl SyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingConfiguration(_) => ErrorCode::Configuration,
            Self::Credential(_) => ErrorCode::Credential,
            Self::Upstream { code, .. }
            | Self::UnexpectedResponse { code, .. }
            | Self::NotFound { code, .. } => *code,
        }
    }

    pub(crate) fn transport(code: ErrorCode, context: String, err: reqwest::Error) -> Self {
        Self::Upstream { code, context, status: None, body: err.to_string() }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfiguration(name) => write!(f, "missing configuration: {name}"),
            Self::Credential(err) => write!(f, "could not read credential: {err}"),
            Self::Upstream { context, status: Some(status), body, .. } => {
                write!(f, "{context} Status Code: {status}. Raw Response: {body}")
            }
            Self::Upstream { context, status: None, body, .. } => {
                write!(f, "{context} Request failed: {body}")
            }
            Self::UnexpectedResponse { context, body, .. } => {
                write!(f, "{context} Unexpected response: {body}")
            }
            Self::NotFound { context, .. } => f.write_str(context),
        }
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
