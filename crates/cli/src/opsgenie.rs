// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Opsgenie "who is on call" client.

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::credential::Secret;
use crate::error::{ErrorCode, SyncError};

#[derive(Debug, Deserialize)]
struct OnCallResponse {
    data: OnCallData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OnCallData {
    on_call_recipients: Vec<String>,
}

/// HTTP client for the Opsgenie schedules API.
pub struct OpsgenieClient {
    http: Client,
    base_url: String,
    api_key: Secret,
}

impl OpsgenieClient {
    pub fn new(base_url: impl Into<String>, api_key: Secret) -> Self {
        Self { http: Client::new(), base_url: base_url.into(), api_key }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the flattened on-call listing for `schedule`, addressed by name.
    pub fn on_call_url(&self, schedule: &str) -> Result<Url, SyncError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            SyncError::MissingConfiguration(format!("valid Opsgenie base URL ({e})"))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                SyncError::MissingConfiguration("Opsgenie base URL that can carry a path".into())
            })?
            .pop_if_empty()
            .extend(["v2", "schedules", schedule, "on-calls"]);
        url.query_pairs_mut()
            .append_pair("scheduleIdentifierType", "name")
            .append_pair("flat", "true");
        Ok(url)
    }

    /// Fetch the recipients currently on call for `schedule`.
    ///
    /// The first entry is the primary on-call person. An empty list means
    /// nobody is on call and is not an error.
    pub async fn fetch_on_call(&self, schedule: &str) -> Result<Vec<String>, SyncError> {
        let context =
            || format!("Could not retrieve on-call people from Opsgenie for schedule [{schedule}].");
        let url = self.on_call_url(schedule)?;
        debug!(path = url.path(), "fetching on-call recipients");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("GenieKey {}", self.api_key.expose()))
            .send()
            .await
            .map_err(|e| SyncError::transport(ErrorCode::Schedule, context(), e))?;

        let status = resp.status();
        let body =
            resp.text().await.map_err(|e| SyncError::transport(ErrorCode::Schedule, context(), e))?;

        if !(status.is_success() || status.is_redirection()) {
            return Err(SyncError::Upstream {
                code: ErrorCode::Schedule,
                context: context(),
                status: Some(status.as_u16()),
                body,
            });
        }

        match serde_json::from_str::<OnCallResponse>(&body) {
            Ok(parsed) => Ok(parsed.data.on_call_recipients),
            Err(_) => {
                Err(SyncError::UnexpectedResponse { code: ErrorCode::Schedule, context: context(), body })
            }
        }
    }
}

#[cfg(test)]
#[path = "opsgenie_tests.rs"]
mod tests;
