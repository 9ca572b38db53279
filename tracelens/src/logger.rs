use std::str::FromStr;

use logforth::{append::Stderr, filter::EnvFilter};

/// Route the `log` facade to stderr.
///
/// While the dashboard occupies the terminal the orchestrator mirrors
/// everything interesting into the in-UI activity feed, so stderr only
/// matters for startup failures and post-exit diagnostics.
///
/// The filter string follows the usual env-filter syntax, e.g. "info" or
/// "tui=debug,api=debug".
pub(crate) fn init(log_filter: &str) {
    let log_filter = log_filter.to_owned();

    logforth::builder()
        .dispatch(move |dispatch| {
            let filter = EnvFilter::from_str(&log_filter)
                .unwrap_or_else(|_| EnvFilter::from_str("warn").expect("default filter should be valid"));

            dispatch.filter(filter).append(Stderr::default())
        })
        .apply();
}
