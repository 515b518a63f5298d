use crate::verify::epic::{DEFAULT_AUTHORIZE_URL, DEFAULT_TOKEN_URL};
use clap::{Arg, Command, builder::ValueParser};
use url::Url;

pub const ARG_EPIC_CLIENT_ID: &str = "epic-client-id";
pub const ARG_EPIC_CLIENT_SECRET: &str = "epic-client-secret";
pub const ARG_REDIRECT_URI: &str = "redirect-uri";
pub const ARG_EPIC_TOKEN_URL: &str = "epic-token-url";
pub const ARG_EPIC_AUTHORIZE_URL: &str = "epic-authorize-url";

/// Accept only absolute `http`/`https` URLs with a host.
#[must_use]
pub fn validator_http_url() -> ValueParser {
    ValueParser::from(move |raw: &str| -> std::result::Result<String, String> {
        let url = Url::parse(raw).map_err(|e| format!("invalid URL: {e}"))?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err("expected an absolute http(s) URL".to_string());
        }
        Ok(raw.to_string())
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EPIC_CLIENT_ID)
                .long(ARG_EPIC_CLIENT_ID)
                .help("Epic Games OAuth client id")
                .env("SKINCHECK_EPIC_CLIENT_ID")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EPIC_CLIENT_SECRET)
                .long(ARG_EPIC_CLIENT_SECRET)
                .help("Epic Games OAuth client secret")
                .env("SKINCHECK_EPIC_CLIENT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_REDIRECT_URI)
                .long(ARG_REDIRECT_URI)
                .help("Callback URL registered with Epic, example: https://verify.example.com/callback")
                .env("SKINCHECK_REDIRECT_URI")
                .required(true)
                .value_parser(validator_http_url()),
        )
        .arg(
            Arg::new(ARG_EPIC_TOKEN_URL)
                .long(ARG_EPIC_TOKEN_URL)
                .help("Epic OAuth token endpoint")
                .env("SKINCHECK_EPIC_TOKEN_URL")
                .default_value(DEFAULT_TOKEN_URL)
                .value_parser(validator_http_url()),
        )
        .arg(
            Arg::new(ARG_EPIC_AUTHORIZE_URL)
                .long(ARG_EPIC_AUTHORIZE_URL)
                .help("Epic consent screen used by the landing page")
                .env("SKINCHECK_EPIC_AUTHORIZE_URL")
                .default_value(DEFAULT_AUTHORIZE_URL)
                .value_parser(validator_http_url()),
        )
}
