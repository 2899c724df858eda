// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invocation entrypoint: wire credentials and clients, run one sync, and
//! turn the result into a process exit status.

use serde_json::Value;
use tracing::{error, info};

use crate::blob::{BlobStore, S3BlobStore};
use crate::config::{Config, CredentialSource};
use crate::credential::{self, CredentialKind};
use crate::error::SyncError;
use crate::opsgenie::OpsgenieClient;
use crate::slack::SlackClient;
use crate::sync::{RosterSync, SyncOutcome};

/// Handle one invocation. `event` and `context` come from whatever triggered
/// the run and are not inspected. Returns the process exit status.
pub async fn handle(config: &Config, _event: &Value, _context: &Value) -> i32 {
    match invoke(config).await {
        Ok(outcome) => {
            info!("{outcome}");
            0
        }
        Err(e) => {
            error!(code = %e.code(), "{e}");
            eprintln!("error: {e}");
            e.code().exit_code()
        }
    }
}

/// Run one sync with credentials from the process environment or S3.
pub async fn invoke(config: &Config) -> Result<SyncOutcome, SyncError> {
    let store = match config.credential_source().map_err(config_error)? {
        CredentialSource::S3 => Some(S3BlobStore::from_env().await),
        CredentialSource::Env => None,
    };
    let store = store.as_ref().map(|s| s as &dyn BlobStore);
    invoke_with(config, |name| std::env::var(name).ok(), store).await
}

/// Run one sync with an explicit environment lookup and blob store.
///
/// Both secrets are resolved before the first remote call.
pub async fn invoke_with<F>(
    config: &Config,
    env: F,
    store: Option<&dyn BlobStore>,
) -> Result<SyncOutcome, SyncError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = credential::resolve_with(
        &config.credential_location(CredentialKind::OpsgenieApiKey).map_err(config_error)?,
        &env,
        store,
    )
    .await?;
    let token = credential::resolve_with(
        &config.credential_location(CredentialKind::SlackApiToken).map_err(config_error)?,
        &env,
        store,
    )
    .await?;

    let sync = RosterSync::new(
        config.sync_settings(),
        OpsgenieClient::new(&config.opsgenie_url, api_key),
        SlackClient::new(&config.slack_url, token),
    );
    sync.run().await
}

fn config_error(err: anyhow::Error) -> SyncError {
    SyncError::MissingConfiguration(format!("{err:#}"))
}
