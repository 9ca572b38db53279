use std::{path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "tracelens", version, about = "Terminal dashboard for an agent trace store")]
pub(crate) struct Args {
    /// Path to the TOML configuration file. Without one, built-in defaults
    /// apply.
    #[arg(short, long, env = "TRACELENS_CONFIG")]
    pub(crate) config: Option<PathBuf>,

    /// Base URL of the trace store, overriding the configuration file.
    #[arg(long, env = "TRACELENS_API_URL")]
    pub(crate) api_url: Option<String>,

    /// Refresh cadence, e.g. "5s" or "500ms", overriding the configuration
    /// file.
    #[arg(long, value_parser = parse_duration)]
    pub(crate) poll_interval: Option<Duration>,

    /// Stderr log filter, e.g. "info" or "tui=debug,api=debug".
    #[arg(long, env = "TRACELENS_LOG", default_value = "warn")]
    pub(crate) log_filter: String,
}

fn parse_duration(input: &str) -> Result<Duration, String> {
    duration_str::parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_flags() {
        let args = Args::parse_from(["tracelens"]);

        assert!(args.config.is_none());
        assert!(args.api_url.is_none());
        assert!(args.poll_interval.is_none());
        assert_eq!(args.log_filter, "warn");
    }

    #[test]
    fn poll_interval_accepts_duration_strings() {
        let args = Args::parse_from(["tracelens", "--poll-interval", "2s"]);
        assert_eq!(args.poll_interval, Some(Duration::from_secs(2)));
    }
}
