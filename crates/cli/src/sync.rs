// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The roster sync: Opsgenie on-call person → Slack user group membership.

use std::fmt;

use tracing::info;

use crate::error::{ErrorCode, SyncError};
use crate::opsgenie::OpsgenieClient;
use crate::slack::{find_group_id, SlackClient};

/// Which schedule feeds which group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub schedule: String,
    pub group: String,
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The schedule has nobody on call; the group was left untouched.
    NobodyOnCall { schedule: String, group: String },
    /// The group now contains exactly the primary on-call person.
    Updated { group: String, group_id: String, user_id: String, email: String },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NobodyOnCall { schedule, group } => write!(
                f,
                "No person is on-call right now for the schedule [{schedule}]. \
                 Quitting without updating the Slack group [{group}]."
            ),
            Self::Updated { group, group_id, user_id, email } => write!(
                f,
                "Slack group [{group}] ({group_id}) now points at {email} ({user_id})."
            ),
        }
    }
}

pub struct RosterSync {
    settings: SyncSettings,
    opsgenie: OpsgenieClient,
    slack: SlackClient,
}

impl RosterSync {
    pub fn new(settings: SyncSettings, opsgenie: OpsgenieClient, slack: SlackClient) -> Self {
        Self { settings, opsgenie, slack }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run one sync. Only the first on-call recipient is ever assigned.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        let SyncSettings { schedule, group } = &self.settings;

        let recipients = self.opsgenie.fetch_on_call(schedule).await?;
        let Some(email) = recipients.into_iter().next() else {
            return Ok(SyncOutcome::NobodyOnCall { schedule: schedule.clone(), group: group.clone() });
        };
        info!(schedule = %schedule, email = %email, "resolved on-call person");

        let user = self.slack.lookup_user_by_email(&email).await?;
        let groups = self.slack.list_user_groups().await?;
        let group_id = find_group_id(&groups, group)
            .ok_or_else(|| SyncError::NotFound {
                code: ErrorCode::ChatLookup,
                context: format!("Could not find the Slack group [{group}]."),
            })?
            .to_owned();

        self.slack.update_user_group_members(&group_id, std::slice::from_ref(&user.id)).await?;

        Ok(SyncOutcome::Updated { group: group.clone(), group_id, user_id: user.id, email })
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
