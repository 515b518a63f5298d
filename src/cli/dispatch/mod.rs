use crate::cli::{
    actions::{Action, server::Args},
    commands::{
        ARG_PORT,
        discord::{ARG_DISCORD_API_URL, ARG_DISCORD_BOT_TOKEN, ARG_DISCORD_CHANNEL_ID},
        epic::{
            ARG_EPIC_AUTHORIZE_URL, ARG_EPIC_CLIENT_ID, ARG_EPIC_CLIENT_SECRET,
            ARG_EPIC_TOKEN_URL, ARG_REDIRECT_URI,
        },
        locker::{ARG_FORTNITE_API_KEY, ARG_LOCKER_URL, ARG_LOOKUP_ATTEMPTS},
        upstream::{ARG_UPSTREAM_CONCURRENCY, ARG_UPSTREAM_TIMEOUT},
    },
};
use crate::verify::UpstreamOptions;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required argument: --{0}")]
    Missing(&'static str),
}

fn required(matches: &clap::ArgMatches, id: &'static str) -> Result<String, ConfigError> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or(ConfigError::Missing(id))
}

fn secret(matches: &clap::ArgMatches, id: &'static str) -> Result<SecretString, ConfigError> {
    required(matches, id).map(SecretString::from)
}

/// # Errors
/// Returns an error if a required argument is missing.
pub fn handler(matches: &clap::ArgMatches) -> anyhow::Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(3000);

    let mut upstream = UpstreamOptions::default();
    if let Some(seconds) = matches.get_one::<u64>(ARG_UPSTREAM_TIMEOUT) {
        upstream = upstream.with_timeout(Duration::from_secs(*seconds));
    }
    if let Some(limit) = matches.get_one::<u32>(ARG_UPSTREAM_CONCURRENCY) {
        upstream = upstream.with_concurrency(usize::try_from(*limit)?);
    }

    Ok(Action::Server(Args {
        port,
        epic_client_id: required(matches, ARG_EPIC_CLIENT_ID)?,
        epic_client_secret: secret(matches, ARG_EPIC_CLIENT_SECRET)?,
        redirect_uri: required(matches, ARG_REDIRECT_URI)?,
        epic_token_url: required(matches, ARG_EPIC_TOKEN_URL)?,
        epic_authorize_url: required(matches, ARG_EPIC_AUTHORIZE_URL)?,
        fortnite_api_key: secret(matches, ARG_FORTNITE_API_KEY)?,
        locker_url: required(matches, ARG_LOCKER_URL)?,
        lookup_attempts: matches.get_one::<u32>(ARG_LOOKUP_ATTEMPTS).copied().unwrap_or(1),
        discord_bot_token: secret(matches, ARG_DISCORD_BOT_TOKEN)?,
        discord_channel_id: required(matches, ARG_DISCORD_CHANNEL_ID)?,
        discord_api_url: required(matches, ARG_DISCORD_API_URL)?,
        upstream,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn handler_builds_server_args() {
        temp_env::with_vars_unset(
            ["SKINCHECK_UPSTREAM_TIMEOUT", "SKINCHECK_UPSTREAM_CONCURRENCY", "SKINCHECK_PORT"],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "skincheck",
                    "--epic-client-id",
                    "client",
                    "--epic-client-secret",
                    "secret",
                    "--redirect-uri",
                    "https://verify.test/callback",
                    "--fortnite-api-key",
                    "api-key",
                    "--discord-bot-token",
                    "bot-token",
                    "--discord-channel-id",
                    "1234567890",
                    "--upstream-timeout",
                    "4",
                ]);

                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 3000);
                assert_eq!(args.epic_client_secret.expose_secret(), "secret");
                assert_eq!(args.discord_channel_id, "1234567890");
                assert_eq!(args.upstream.timeout, Duration::from_secs(4));
                assert_eq!(args.upstream.concurrency, 16);
            },
        );
    }

    #[test]
    fn missing_argument_is_named() {
        let matches = clap::Command::new("skincheck")
            .arg(clap::Arg::new(ARG_EPIC_CLIENT_ID).long(ARG_EPIC_CLIENT_ID))
            .get_matches_from(vec!["skincheck"]);
        assert_eq!(
            required(&matches, ARG_EPIC_CLIENT_ID).err(),
            Some(ConfigError::Missing("epic-client-id"))
        );
    }
}
