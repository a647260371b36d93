//! Stored cache values and their lifetimes.

// self
use crate::_prelude::*;

/// Shortest lifetime an entry may have; keeps `expires_at > created_at` for any TTL.
pub const MIN_TTL: Duration = Duration::SECOND;

/// Cached value with its creation and expiry instants.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<V> {
	/// Stored payload.
	pub value: V,
	/// Instant the entry was written.
	pub created_at: OffsetDateTime,
	/// Instant from which the entry is treated as absent.
	pub expires_at: OffsetDateTime,
}
impl<V> CacheEntry<V> {
	/// Creates an entry living for `ttl` (clamped to [`MIN_TTL`]) from `now`.
	pub fn new(value: V, now: OffsetDateTime, ttl: Duration) -> Self {
		let ttl = if ttl < MIN_TTL { MIN_TTL } else { ttl };
		let expires_at =
			now.checked_add(ttl).unwrap_or_else(|| time::PrimitiveDateTime::MAX.assume_utc());

		Self { value, created_at: now, expires_at }
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}
