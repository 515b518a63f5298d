use crate::cli::commands::epic::validator_http_url;
use crate::verify::discord::DEFAULT_API_URL;
use clap::{Arg, Command, builder::ValueParser};
use regex::Regex;

pub const ARG_DISCORD_BOT_TOKEN: &str = "discord-bot-token";
pub const ARG_DISCORD_CHANNEL_ID: &str = "discord-channel-id";
pub const ARG_DISCORD_API_URL: &str = "discord-api-url";

/// Discord ids are numeric snowflakes.
#[must_use]
pub fn validator_snowflake() -> ValueParser {
    ValueParser::from(move |id: &str| -> std::result::Result<String, String> {
        if Regex::new(r"^[0-9]{1,20}$").map_or(false, |re| re.is_match(id)) {
            Ok(id.to_string())
        } else {
            Err("expected a numeric channel id".to_string())
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DISCORD_BOT_TOKEN)
                .long(ARG_DISCORD_BOT_TOKEN)
                .help("Discord bot token")
                .env("SKINCHECK_DISCORD_BOT_TOKEN")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DISCORD_CHANNEL_ID)
                .long(ARG_DISCORD_CHANNEL_ID)
                .help("Channel that receives verification notices")
                .env("SKINCHECK_DISCORD_CHANNEL_ID")
                .required(true)
                .value_parser(validator_snowflake()),
        )
        .arg(
            Arg::new(ARG_DISCORD_API_URL)
                .long(ARG_DISCORD_API_URL)
                .help("Discord REST API base URL")
                .env("SKINCHECK_DISCORD_API_URL")
                .default_value(DEFAULT_API_URL)
                .value_parser(validator_http_url()),
        )
}
