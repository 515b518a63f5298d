use clap::{Arg, Command};

pub const ARG_UPSTREAM_TIMEOUT: &str = "upstream-timeout";
pub const ARG_UPSTREAM_CONCURRENCY: &str = "upstream-concurrency";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_UPSTREAM_TIMEOUT)
                .long(ARG_UPSTREAM_TIMEOUT)
                .help("Deadline in seconds for each call to Epic, fortnite-api.com and Discord")
                .env("SKINCHECK_UPSTREAM_TIMEOUT")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..=120)),
        )
        .arg(
            Arg::new(ARG_UPSTREAM_CONCURRENCY)
                .long(ARG_UPSTREAM_CONCURRENCY)
                .help("Maximum in-flight requests per upstream")
                .env("SKINCHECK_UPSTREAM_CONCURRENCY")
                .default_value("16")
                .value_parser(clap::value_parser!(u32).range(1..=1024)),
        )
}
