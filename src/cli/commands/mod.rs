pub mod discord;
pub mod epic;
pub mod locker;
pub mod logging;
pub mod upstream;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_PORT: &str = "port";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("skincheck")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("3000")
                .env("SKINCHECK_PORT")
                .value_parser(clap::value_parser!(u16)),
        );

    let command = epic::with_args(command);
    let command = locker::with_args(command);
    let command = discord::with_args(command);
    let command = upstream::with_args(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::{
        discord::DEFAULT_API_URL,
        epic::DEFAULT_TOKEN_URL,
        locker::DEFAULT_LOCKER_URL,
        upstream::{DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECONDS},
    };

    const REQUIRED_ENV: [(&str, Option<&str>); 6] = [
        ("SKINCHECK_EPIC_CLIENT_ID", Some("client")),
        ("SKINCHECK_EPIC_CLIENT_SECRET", Some("secret")),
        ("SKINCHECK_REDIRECT_URI", Some("https://verify.test/callback")),
        ("SKINCHECK_FORTNITE_API_KEY", Some("api-key")),
        ("SKINCHECK_DISCORD_BOT_TOKEN", Some("bot-token")),
        ("SKINCHECK_DISCORD_CHANNEL_ID", Some("1234567890")),
    ];

    const OPTIONAL_ENV: [&str; 8] = [
        "SKINCHECK_PORT",
        "SKINCHECK_EPIC_TOKEN_URL",
        "SKINCHECK_LOCKER_URL",
        "SKINCHECK_DISCORD_API_URL",
        "SKINCHECK_UPSTREAM_TIMEOUT",
        "SKINCHECK_UPSTREAM_CONCURRENCY",
        "SKINCHECK_LOOKUP_ATTEMPTS",
        "SKINCHECK_LOG_LEVEL",
    ];

    fn required_args() -> Vec<&'static str> {
        vec![
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
        ]
    }

    fn get<'a>(matches: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
        matches.get_one::<String>(id).map(String::as_str)
    }

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "skincheck");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(OPTIONAL_ENV, || {
            let matches = new().get_matches_from(required_args());

            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(3000));
            assert_eq!(get(&matches, epic::ARG_EPIC_TOKEN_URL), Some(DEFAULT_TOKEN_URL));
            assert_eq!(get(&matches, locker::ARG_LOCKER_URL), Some(DEFAULT_LOCKER_URL));
            assert_eq!(get(&matches, discord::ARG_DISCORD_API_URL), Some(DEFAULT_API_URL));
            assert_eq!(
                matches.get_one::<u64>(upstream::ARG_UPSTREAM_TIMEOUT).copied(),
                Some(DEFAULT_TIMEOUT_SECONDS)
            );
            assert_eq!(
                matches
                    .get_one::<u32>(upstream::ARG_UPSTREAM_CONCURRENCY)
                    .map(|c| *c as usize),
                Some(DEFAULT_CONCURRENCY)
            );
            assert_eq!(matches.get_one::<u32>(locker::ARG_LOOKUP_ATTEMPTS).copied(), Some(1));
        });
    }

    #[test]
    fn test_missing_required() {
        temp_env::with_vars(REQUIRED_ENV.map(|(key, _)| (key, None::<&str>)), || {
            let result = new().try_get_matches_from(vec!["skincheck"]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_check_env() {
        let mut vars = REQUIRED_ENV.to_vec();
        vars.extend([
            ("SKINCHECK_PORT", Some("8443")),
            ("SKINCHECK_LOOKUP_ATTEMPTS", Some("3")),
            ("SKINCHECK_LOG_LEVEL", Some("info")),
        ]);
        temp_env::with_vars(vars, || {
            let matches = new().get_matches_from(vec!["skincheck"]);
            assert_eq!(matches.get_one::<u16>(ARG_PORT).copied(), Some(8443));
            assert_eq!(get(&matches, discord::ARG_DISCORD_CHANNEL_ID), Some("1234567890"));
            assert_eq!(matches.get_one::<u32>(locker::ARG_LOOKUP_ATTEMPTS).copied(), Some(3));
            assert_eq!(matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(), Some(2));
        });
    }

    #[test]
    fn test_rejects_relative_redirect_uri() {
        let mut args = required_args();
        args.extend(["--redirect-uri", "/callback"]);
        assert!(new().try_get_matches_from(args).is_err());

        let mut args = required_args();
        args.extend(["--epic-token-url", "ftp://epic.test/token"]);
        assert!(new().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_channel() {
        let mut args = required_args();
        args.extend(["--discord-channel-id", "general"]);
        assert!(new().try_get_matches_from(args).is_err());
    }

    #[test]
    fn test_check_log_level_verbosity() {
        for index in 0..5_u8 {
            temp_env::with_vars([("SKINCHECK_LOG_LEVEL", None::<String>)], || {
                let mut args: Vec<String> =
                    required_args().into_iter().map(str::to_string).collect();

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(usize::from(index))));
                }

                let matches = new().get_matches_from(args);
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index)
                );
            });
        }
    }
}
