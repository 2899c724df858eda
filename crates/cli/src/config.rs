// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

use crate::credential::{BlobLocation, CredentialKind, CredentialLocation};
use crate::sync::SyncSettings;

pub const DEFAULT_OPSGENIE_URL: &str = "https://api.opsgenie.com";
pub const DEFAULT_SLACK_URL: &str = "https://slack.com/api";

/// Where API credentials are read from.
///
/// - `Env`: `OPSGENIE_API_KEY` and `SLACK_API_TOKEN` in the process environment.
/// - `S3`: one object per secret, located by the `--*-bucket`/`--*-file` flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    #[default]
    Env,
    S3,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Env => f.write_str("env"),
            Self::S3 => f.write_str("s3"),
        }
    }
}

impl std::str::FromStr for CredentialSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "env" => Ok(Self::Env),
            "s3" => Ok(Self::S3),
            other => anyhow::bail!("invalid credential source: {other}"),
        }
    }
}

/// Point a Slack user group at whoever is on call in an Opsgenie schedule.
#[derive(Debug, Parser)]
#[command(name = "rota", version, about)]
pub struct Config {
    /// Opsgenie schedule name.
    #[arg(long, env = "ROTA_SCHEDULE")]
    pub schedule: String,

    /// Slack user group name.
    #[arg(long, env = "ROTA_GROUP")]
    pub group: String,

    /// Credential source (env or s3).
    #[arg(long, env = "ROTA_CREDENTIAL_SOURCE", default_value = "env")]
    pub credential_source: String,

    /// S3 bucket holding the Opsgenie API key.
    #[arg(long, env = "ROTA_OPSGENIE_KEY_BUCKET")]
    pub opsgenie_key_bucket: Option<String>,

    /// S3 object key of the Opsgenie API key.
    #[arg(long, env = "ROTA_OPSGENIE_KEY_FILE")]
    pub opsgenie_key_file: Option<String>,

    /// S3 object version of the Opsgenie API key (latest if unset).
    #[arg(long, env = "ROTA_OPSGENIE_KEY_VERSION")]
    pub opsgenie_key_version: Option<String>,

    /// S3 bucket holding the Slack token.
    #[arg(long, env = "ROTA_SLACK_TOKEN_BUCKET")]
    pub slack_token_bucket: Option<String>,

    /// S3 object key of the Slack token.
    #[arg(long, env = "ROTA_SLACK_TOKEN_FILE")]
    pub slack_token_file: Option<String>,

    /// S3 object version of the Slack token (latest if unset).
    #[arg(long, env = "ROTA_SLACK_TOKEN_VERSION")]
    pub slack_token_version: Option<String>,

    /// Opsgenie API base URL.
    #[arg(long, env = "ROTA_OPSGENIE_URL", default_value = DEFAULT_OPSGENIE_URL)]
    pub opsgenie_url: String,

    /// Slack Web API base URL.
    #[arg(long, env = "ROTA_SLACK_URL", default_value = DEFAULT_SLACK_URL)]
    pub slack_url: String,

    /// Log format (json or text).
    #[arg(long, env = "ROTA_LOG_FORMAT", default_value = "json")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "ROTA_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Validate the configuration after parsing.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.schedule.trim().is_empty() {
            anyhow::bail!("--schedule must not be empty");
        }
        if self.group.trim().is_empty() {
            anyhow::bail!("--group must not be empty");
        }

        if self.credential_source()? == CredentialSource::S3 {
            // Both secrets must be locatable before anything goes out.
            self.credential_location(CredentialKind::OpsgenieApiKey)?;
            self.credential_location(CredentialKind::SlackApiToken)?;
        }

        for (flag, url) in [("--opsgenie-url", &self.opsgenie_url), ("--slack-url", &self.slack_url)] {
            let parsed = reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("{flag} is not a valid URL: {e}"))?;
            if parsed.cannot_be_a_base() {
                anyhow::bail!("{flag} cannot be used as a base URL: {url}");
            }
        }

        Ok(())
    }

    /// Build a `Config` for tests pointing both APIs at `base`.
    #[doc(hidden)]
    pub fn test(base: &str) -> Self {
        Self {
            schedule: "primary".into(),
            group: "oncall-pager".into(),
            credential_source: "env".into(),
            opsgenie_key_bucket: None,
            opsgenie_key_file: None,
            opsgenie_key_version: None,
            slack_token_bucket: None,
            slack_token_file: None,
            slack_token_version: None,
            opsgenie_url: base.into(),
            slack_url: base.into(),
            log_format: "text".into(),
            log_level: "debug".into(),
        }
    }

    /// Parse the credential source string into an enum.
    pub fn credential_source(&self) -> anyhow::Result<CredentialSource> {
        self.credential_source.parse()
    }

    /// Where the secret of the given kind should be read from.
    pub fn credential_location(&self, kind: CredentialKind) -> anyhow::Result<CredentialLocation> {
        if self.credential_source()? == CredentialSource::Env {
            return Ok(CredentialLocation::Env(kind.env_var()));
        }

        let (bucket, file, version, flag) = match kind {
            CredentialKind::OpsgenieApiKey => (
                &self.opsgenie_key_bucket,
                &self.opsgenie_key_file,
                &self.opsgenie_key_version,
                "--opsgenie-key",
            ),
            CredentialKind::SlackApiToken => (
                &self.slack_token_bucket,
                &self.slack_token_file,
                &self.slack_token_version,
                "--slack-token",
            ),
        };

        match (non_empty(bucket), non_empty(file)) {
            (Some(bucket), Some(key)) => Ok(CredentialLocation::Blob(BlobLocation {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
                version_id: non_empty(version).map(str::to_owned),
            })),
            _ => anyhow::bail!("credential source s3 requires {flag}-bucket and {flag}-file"),
        }
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings { schedule: self.schedule.clone(), group: self.group.clone() }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
