//! Discord channel message dispatch.

use crate::verify::{
    VerificationNotice, VerifyError,
    pipeline::NotificationDispatch,
    upstream::{Upstream, UpstreamOptions},
};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument, warn};

pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";
pub const EMBED_TITLE: &str = "Skin Check Verified!";
pub const EMBED_COLOR: u32 = 0x00ff00;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Message {
    pub content: String,
    pub allowed_mentions: AllowedMentions,
    pub embeds: Vec<Embed>,
}

/// Restricts pings to the requester, whatever the display name contains.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AllowedMentions {
    pub parse: Vec<String>,
    pub users: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Message {
    #[must_use]
    pub fn from_notice(notice: &VerificationNotice, at: DateTime<Utc>) -> Self {
        let fields = notice
            .fields()
            .into_iter()
            .map(|field| EmbedField {
                name: field.name.to_string(),
                value: field.value,
                inline: field.inline,
            })
            .collect();

        Self {
            content: notice.mention(),
            allowed_mentions: AllowedMentions {
                parse: Vec::new(),
                users: vec![notice.requester.to_string()],
            },
            embeds: vec![Embed {
                title: EMBED_TITLE.to_string(),
                description: notice.description(),
                color: EMBED_COLOR,
                fields,
                timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }],
        }
    }
}

#[derive(Debug)]
pub struct DiscordClient {
    upstream: Upstream,
    messages_url: String,
    bot_token: SecretString,
}

impl DiscordClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        channel_id: &str,
        bot_token: SecretString,
        options: &UpstreamOptions,
    ) -> Result<Self> {
        Ok(Self {
            upstream: Upstream::new(options)?,
            messages_url: messages_url(api_url, channel_id),
            bot_token,
        })
    }
}

#[must_use]
pub fn messages_url(api_url: &str, channel_id: &str) -> String {
    format!("{}/channels/{channel_id}/messages", api_url.trim_end_matches('/'))
}

impl NotificationDispatch for DiscordClient {
    // A repeated POST would post the message twice, so there is no retry here.
    #[instrument(skip(self, notice), fields(requester = %notice.requester))]
    async fn dispatch(&self, notice: &VerificationNotice) -> Result<(), VerifyError> {
        let _permit = self
            .upstream
            .acquire()
            .await
            .ok_or(VerifyError::DispatchUnavailable)?;

        let message = Message::from_notice(notice, Utc::now());

        let response = self
            .upstream
            .client()
            .post(&self.messages_url)
            .header(
                "Authorization",
                format!("Bot {}", self.bot_token.expose_secret()),
            )
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                warn!("Discord request failed: {e}");
                VerifyError::DispatchUnavailable
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::DispatchFailed {
                status: status.as_u16(),
            });
        }

        debug!("Verification notice posted");

        Ok(())
    }
}
