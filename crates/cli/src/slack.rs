// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slack Web API client.
//!
//! [`SlackClient`] covers the three calls a roster sync needs:
//! `usergroups.list`, `users.lookupByEmail` and `usergroups.users.update`.
//! Every response must carry `"ok": true` plus the field the call is for.

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::credential::Secret;
use crate::error::{ErrorCode, SyncError};

/// A Slack user group as returned by `usergroups.list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserGroup {
    pub id: String,
    pub name: String,
}

/// A Slack user as returned by `users.lookupByEmail`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackUser {
    pub id: String,
}

/// Id of the first group in `groups` whose name is exactly `name`.
pub fn find_group_id<'a>(groups: &'a [UserGroup], name: &str) -> Option<&'a str> {
    groups.iter().find(|g| g.name == name).map(|g| g.id.as_str())
}

/// Return `field` from a Slack response body when the body is a JSON object
/// with `"ok": true` and that field present.
pub fn extract_field(body: &str, field: &str) -> Option<Value> {
    let mut value: Value = serde_json::from_str(body).ok()?;
    if value.get("ok").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    value.get_mut(field).map(Value::take)
}

/// HTTP client for the Slack Web API.
pub struct SlackClient {
    http: Client,
    base_url: String,
    token: Secret,
}

impl SlackClient {
    pub fn new(base_url: impl Into<String>, token: Secret) -> Self {
        Self { http: Client::new(), base_url: base_url.into(), token }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.base_url.trim_end_matches('/'))
    }

    /// Fetch every user group in the workspace.
    pub async fn list_user_groups(&self) -> Result<Vec<UserGroup>, SyncError> {
        let context = "Could not retrieve usergroups from Slack.";
        debug!("calling usergroups.list");
        let request = self.http.get(self.endpoint("usergroups.list"));
        let groups = self.call(request, ErrorCode::ChatLookup, context, "usergroups").await?;
        decode(groups, ErrorCode::ChatLookup, context)
    }

    /// Resolve the Slack user owning `email`.
    pub async fn lookup_user_by_email(&self, email: &str) -> Result<SlackUser, SyncError> {
        let context = format!("Could not retrieve user [{email}] from Slack.");
        let mut url = Url::parse(&self.endpoint("users.lookupByEmail"))
            .map_err(|e| SyncError::MissingConfiguration(format!("valid Slack base URL ({e})")))?;
        url.query_pairs_mut().append_pair("email", email);

        debug!("calling users.lookupByEmail");
        let request = self.http.get(url);
        let user = self.call(request, ErrorCode::ChatLookup, &context, "user").await?;
        decode(user, ErrorCode::ChatLookup, &context)
    }

    /// Replace the members of `group_id` with exactly `user_ids`.
    ///
    /// Slack must confirm the update and report a resulting member count of
    /// one: a group tracks a single on-call person.
    pub async fn update_user_group_members(
        &self,
        group_id: &str,
        user_ids: &[String],
    ) -> Result<(), SyncError> {
        let context = format!(
            "Could not update the Slack group [{group_id}] with the users [{}].",
            user_ids.join(", ")
        );
        let payload = serde_json::json!({
            "usergroup": group_id,
            "users": user_ids.join(","),
            "include_count": true,
        });

        debug!(group_id, "calling usergroups.users.update");
        let request = self.http.post(self.endpoint("usergroups.users.update")).json(&payload);
        let group = self.call(request, ErrorCode::ChatUpdate, &context, "usergroup").await?;

        let user_count = group.get("user_count").and_then(Value::as_u64);
        if user_count != Some(1) {
            return Err(SyncError::UnexpectedResponse {
                code: ErrorCode::ChatUpdate,
                context,
                body: group.to_string(),
            });
        }

        debug!(group_id, "usergroups.users.update confirmed");
        Ok(())
    }

    /// Send an authenticated request and pull `field` out of the response.
    async fn call(
        &self,
        request: RequestBuilder,
        code: ErrorCode,
        context: &str,
        field: &str,
    ) -> Result<Value, SyncError> {
        let resp = request
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| SyncError::transport(code, context.to_owned(), e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| SyncError::transport(code, context.to_owned(), e))?;

        if !(status.is_success() || status.is_redirection()) {
            return Err(SyncError::Upstream {
                code,
                context: context.to_owned(),
                status: Some(status.as_u16()),
                body,
            });
        }

        extract_field(&body, field).ok_or_else(|| SyncError::UnexpectedResponse {
            code,
            context: context.to_owned(),
            body,
        })
    }
}

fn decode<T: DeserializeOwned>(value: Value, code: ErrorCode, context: &str) -> Result<T, SyncError> {
    let body = value.to_string();
    serde_json::from_value(value).map_err(|_| SyncError::UnexpectedResponse {
        code,
        context: context.to_owned(),
        body,
    })
}

#[cfg(test)]
#[path = "slack_tests.rs"]
mod tests;
