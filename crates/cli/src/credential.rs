// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API credential resolution.
//!
//! Each secret is read either from a process environment variable or from a
//! blob store object. Secret values are wrapped in [`Secret`] so they cannot
//! end up in logs or error messages by accident.

use std::fmt;

use tracing::debug;

use crate::blob::BlobStore;
use crate::error::{BlobError, SyncError};

/// The secrets a sync run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    OpsgenieApiKey,
    SlackApiToken,
}

impl CredentialKind {
    /// Environment variable read in `env` credential mode.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::OpsgenieApiKey => "OPSGENIE_API_KEY",
            Self::SlackApiToken => "SLACK_API_TOKEN",
        }
    }
}

/// Address of a credential object in the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation {
    pub bucket: String,
    pub key: String,
    /// Specific object version; latest when `None`.
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialLocation {
    Env(&'static str),
    Blob(BlobLocation),
}

/// An API key or token. `Debug` is redacted and there is no `Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Resolve a secret, reading environment variables through `env`.
///
/// `store` is only consulted for [`CredentialLocation::Blob`]; passing `None`
/// there is a configuration error.
pub async fn resolve_with<F>(
    location: &CredentialLocation,
    env: F,
    store: Option<&dyn BlobStore>,
) -> Result<Secret, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    match location {
        CredentialLocation::Env(var) => {
            let var: &str = var;
            debug!(var, "reading credential from environment");
            env(var).map(Secret).ok_or_else(|| SyncError::MissingConfiguration(var.to_owned()))
        }
        CredentialLocation::Blob(blob) => {
            let Some(store) = store else {
                return Err(SyncError::MissingConfiguration("blob store client".to_owned()));
            };
            debug!("reading credential from blob store");
            let bytes = store.fetch(blob).await.map_err(SyncError::Credential)?;
            decode(bytes).map_err(SyncError::Credential)
        }
    }
}

fn decode(bytes: Vec<u8>) -> Result<Secret, BlobError> {
    let text = String::from_utf8(bytes)
        .map_err(|_| BlobError::Unexpected("credential is not valid UTF-8".to_owned()))?;
    // Editors leave a trailing newline, which is not a valid header byte.
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Err(BlobError::Unexpected("credential object is empty".to_owned()));
    }
    Ok(Secret(trimmed.to_owned()))
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
