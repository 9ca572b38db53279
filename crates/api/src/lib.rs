//! Typed client for the remote agent-trace store.
//!
//! The store owns every entity; this crate only reads them and requests
//! mutations (delete, reset). Callers are expected to treat any returned
//! error as "keep whatever you already have": a failed call never
//! invalidates previously fetched data.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{AnalyticsSnapshot, DailyTokens, DateFilter, Span, SpanKind, SpanStatus, TraceSummary, TypeLatency};

pub type Result<T> = std::result::Result<T, ApiError>;
