use api::DateFilter;

/// Requests flowing from the input loop to the orchestrator. Destructive
/// variants are only ever sent after the user confirmed the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Re-fetch the trace list and analytics immediately.
    Refresh,
    /// Replace the analytics date filter and re-fetch.
    SetFilter(DateFilter),
    /// Load the span list of one trace and project it.
    SelectTrace(String),
    /// Delete one trace on the server, dropping it locally right away.
    DeleteTrace(String),
    /// Clear every aggregated metric on the server.
    ResetMetrics,
    /// Clear every trace and every metric on the server.
    ResetAll,
}
