use crate::cli::commands::epic::validator_http_url;
use crate::verify::locker::DEFAULT_LOCKER_URL;
use clap::{Arg, Command};

pub const ARG_FORTNITE_API_KEY: &str = "fortnite-api-key";
pub const ARG_LOCKER_URL: &str = "locker-url";
pub const ARG_LOOKUP_ATTEMPTS: &str = "lookup-attempts";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_FORTNITE_API_KEY)
                .long(ARG_FORTNITE_API_KEY)
                .help("fortnite-api.com API key")
                .env("SKINCHECK_FORTNITE_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_LOCKER_URL)
                .long(ARG_LOCKER_URL)
                .help("Locker lookup endpoint")
                .env("SKINCHECK_LOCKER_URL")
                .default_value(DEFAULT_LOCKER_URL)
                .value_parser(validator_http_url()),
        )
        .arg(
            Arg::new(ARG_LOOKUP_ATTEMPTS)
                .long(ARG_LOOKUP_ATTEMPTS)
                .help("Tries per lookup when the endpoint is unreachable (HTTP errors are never retried)")
                .env("SKINCHECK_LOOKUP_ATTEMPTS")
                .default_value("1")
                .value_parser(clap::value_parser!(u32).range(1..=5)),
        )
}
