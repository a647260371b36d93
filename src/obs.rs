//! Optional observability helpers for client flows and the response cache.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `jworg_client.flow` with the `flow` and
//!   `stage` (call site) fields, plus log events under the `jworg_client` target.
//! - Enable `metrics` to increment the `jworg_client_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`, and `jworg_client_cache_total`
//!   labeled by lookup `outcome` (`hit`, `miss`, `expired`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

pub(crate) use tracing::log_event;

// self
use crate::_prelude::*;

/// Client flows observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Homepage scan for the CDN host.
	Discovery,
	/// Bearer token fetch from the CDN.
	TokenIssue,
	/// Search API call.
	Search,
	/// Article page retrieval.
	Article,
	/// Scripture lookup built on search.
	Scripture,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Discovery => "discovery",
			FlowKind::TokenIssue => "token_issue",
			FlowKind::Search => "search",
			FlowKind::Article => "article",
			FlowKind::Scripture => "scripture",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Terminal outcome of a finished operation.
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { FlowOutcome::Success } else { FlowOutcome::Failure }
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of a cache lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheLookup {
	/// A live entry was returned.
	Hit,
	/// No entry existed for the key.
	Miss,
	/// An entry existed but had expired and was dropped.
	Expired,
}
impl CacheLookup {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CacheLookup::Hit => "hit",
			CacheLookup::Miss => "miss",
			CacheLookup::Expired => "expired",
		}
	}
}

/// Runs `fut` inside a flow span and records attempt/success/failure around it.
pub(crate) async fn observe<T, Fut>(kind: FlowKind, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = FlowSpan::new(kind, stage);

	record_flow_outcome(kind, FlowOutcome::Attempt);

	let result = span.instrument(fut).await;

	record_flow_outcome(kind, FlowOutcome::of(&result));

	result
}
