use crate::{
    api,
    cli::telemetry,
    verify::{
        ConsentLink, DiscordClient, EpicClient, EpicCredentials, LockerClient, Pipeline,
        UpstreamOptions, Verifier,
    },
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{fmt::Write, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub epic_client_id: String,
    pub epic_client_secret: SecretString,
    pub redirect_uri: String,
    pub epic_token_url: String,
    pub epic_authorize_url: String,
    pub fortnite_api_key: SecretString,
    pub locker_url: String,
    pub lookup_attempts: u32,
    pub discord_bot_token: SecretString,
    pub discord_channel_id: String,
    pub discord_api_url: String,
    pub upstream: UpstreamOptions,
}

/// Wire the upstream clients into a pipeline and serve until shutdown.
/// # Errors
/// Returns an error if a client cannot be built or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let consent = Arc::new(ConsentLink::new(
        args.epic_authorize_url.clone(),
        args.epic_client_id.clone(),
        args.redirect_uri.clone(),
    ));

    let port = args.port;
    let verifier = Arc::new(build_verifier(args)?);

    let result = api::new(port, verifier, consent).await;

    telemetry::shutdown_tracer();

    result
}

fn build_verifier(args: Args) -> Result<Verifier> {
    let epic = EpicClient::new(
        args.epic_token_url,
        EpicCredentials {
            client_id: args.epic_client_id,
            client_secret: args.epic_client_secret,
            redirect_uri: args.redirect_uri,
        },
        &args.upstream,
    )
    .context("Failed to build Epic client")?;

    let locker = LockerClient::new(args.locker_url, args.fortnite_api_key, &args.upstream)
        .context("Failed to build locker client")?
        .with_attempts(args.lookup_attempts);

    let discord = DiscordClient::new(
        &args.discord_api_url,
        &args.discord_channel_id,
        args.discord_bot_token,
        &args.upstream,
    )
    .context("Failed to build Discord client")?;

    Ok(Pipeline::new(epic, locker, discord))
}

fn log_startup_args(args: &Args) {
    // secrets are reported as "set", never printed
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("redirect_uri", args.redirect_uri.clone()),
        ("epic_client_id", args.epic_client_id.clone()),
        ("epic_client_secret", "set".to_string()),
        ("epic_token_url", args.epic_token_url.clone()),
        ("epic_authorize_url", args.epic_authorize_url.clone()),
        ("fortnite_api_key", "set".to_string()),
        ("locker_url", args.locker_url.clone()),
        ("lookup_attempts", args.lookup_attempts.to_string()),
        ("discord_bot_token", "set".to_string()),
        ("discord_channel_id", args.discord_channel_id.clone()),
        ("discord_api_url", args.discord_api_url.clone()),
        ("upstream_timeout", format!("{}s", args.upstream.timeout.as_secs())),
        ("upstream_concurrency", args.upstream.concurrency.to_string()),
    ];
    info!("{}", startup_message(&entries));
}

fn startup_message(entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "skincheck {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ = write!(message, "\n  {key}:{padding} {value}");
    }
    message
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
