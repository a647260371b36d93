// self
use crate::obs::{CacheLookup, FlowKind, FlowOutcome};

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"jworg_client_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a cache lookup via the global metrics recorder (when enabled).
pub fn record_cache_lookup(lookup: CacheLookup) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("jworg_client_cache_total", "outcome" => lookup.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = lookup;
	}
}
