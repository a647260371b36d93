// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for the network calls a session performs.
#[derive(Debug, Default)]
pub struct SessionMetrics {
	discovery_fetches: AtomicU64,
	token_fetches: AtomicU64,
}
impl SessionMetrics {
	/// Returns how many times the homepage was fetched for CDN discovery.
	pub fn discovery_fetches(&self) -> u64 {
		self.discovery_fetches.load(Ordering::Relaxed)
	}

	/// Returns how many times the token endpoint was called.
	pub fn token_fetches(&self) -> u64 {
		self.token_fetches.load(Ordering::Relaxed)
	}

	pub(crate) fn record_discovery_fetch(&self) {
		self.discovery_fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_token_fetch(&self) {
		self.token_fetches.fetch_add(1, Ordering::Relaxed);
	}
}
