//! In-memory response cache with per-entry TTL and hit/miss accounting.
//!
//! Keys are [`CacheKey`] digests of ordered components. Entries expire lazily: an expired entry
//! is removed the next time it is read, by [`TtlCache::cleanup_expired`], or by
//! [`TtlCache::clear`]. There is no size bound and no LRU eviction. Cache operations never fail.

pub mod entry;
pub mod key;

pub use entry::*;
pub use key::*;

// self
use crate::{
	_prelude::*,
	obs::{self, CacheLookup, log_event},
};

#[derive(Debug)]
struct CacheState<V> {
	entries: HashMap<CacheKey, CacheEntry<V>>,
	hits: u64,
	misses: u64,
}
impl<V> Default for CacheState<V> {
	fn default() -> Self {
		Self { entries: HashMap::new(), hits: 0, misses: 0 }
	}
}

/// Snapshot of cache occupancy and effectiveness.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
	/// Entries currently stored, expired or not.
	pub entries: usize,
	/// Lookups served from the cache since the last clear.
	pub hits: u64,
	/// Lookups that found nothing usable since the last clear.
	pub misses: u64,
	/// `hits / (hits + misses) * 100`, rounded to two decimals; `0.0` before any lookup.
	pub hit_rate: f64,
}

/// Thread-safe TTL cache shared by every clone.
pub struct TtlCache<V> {
	state: Arc<Mutex<CacheState<V>>>,
	default_ttl: Duration,
}
impl<V> TtlCache<V>
where
	V: Clone,
{
	/// Creates an empty cache whose entries live for `default_ttl` unless overridden.
	pub fn new(default_ttl: Duration) -> Self {
		Self { state: Default::default(), default_ttl }
	}

	/// TTL applied by [`TtlCache::set`].
	pub fn default_ttl(&self) -> Duration {
		self.default_ttl
	}

	/// Looks up the value stored under `parts`.
	pub fn get(&self, parts: &[&dyn Display]) -> Option<V> {
		self.get_key(&CacheKey::from_parts(parts))
	}

	/// Looks up a prebuilt key.
	pub fn get_key(&self, key: &CacheKey) -> Option<V> {
		self.get_key_at(key, OffsetDateTime::now_utc())
	}

	/// Looks up `key` as of `now`, dropping the entry if it has expired.
	pub fn get_key_at(&self, key: &CacheKey, now: OffsetDateTime) -> Option<V> {
		let mut state = self.state.lock();
		let (value, lookup) = match state.entries.get(key) {
			None => (None, CacheLookup::Miss),
			Some(entry) if entry.is_expired_at(now) => (None, CacheLookup::Expired),
			Some(entry) => (Some(entry.value.clone()), CacheLookup::Hit),
		};

		match lookup {
			CacheLookup::Hit => state.hits += 1,
			CacheLookup::Miss => state.misses += 1,
			CacheLookup::Expired => {
				state.entries.remove(key);
				state.misses += 1;
			},
		}

		drop(state);

		log_event!(debug, key = %key, outcome = lookup.as_str(), "Cache lookup.");
		obs::record_cache_lookup(lookup);

		value
	}

	/// Stores `value` under `parts` for the default TTL, replacing any existing entry.
	pub fn set(&self, parts: &[&dyn Display], value: V) {
		self.set_key(CacheKey::from_parts(parts), value);
	}

	/// Stores `value` under `parts` for `ttl`, replacing any existing entry.
	pub fn set_with_ttl(&self, parts: &[&dyn Display], value: V, ttl: Duration) {
		self.set_key_at(CacheKey::from_parts(parts), value, ttl, OffsetDateTime::now_utc());
	}

	/// Stores `value` under a prebuilt key for the default TTL.
	pub fn set_key(&self, key: CacheKey, value: V) {
		self.set_key_at(key, value, self.default_ttl, OffsetDateTime::now_utc());
	}

	/// Stores `value` under `key` as of `now`, replacing any existing entry.
	pub fn set_key_at(&self, key: CacheKey, value: V, ttl: Duration, now: OffsetDateTime) {
		let entry = CacheEntry::new(value, now, ttl);

		log_event!(debug, key = %key, expires_at = %entry.expires_at, "Cache set.");
		self.state.lock().entries.insert(key, entry);
	}

	/// Returns the cached value for `parts`, computing and storing it on a miss.
	///
	/// Errors from `compute` are returned as-is and leave the cache untouched. The lock is not
	/// held while `compute` runs, so concurrent misses may compute the value more than once.
	pub async fn get_or_try_insert_with<F, Fut, E>(
		&self,
		parts: &[&dyn Display],
		compute: F,
	) -> Result<V, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<V, E>>,
	{
		let key = CacheKey::from_parts(parts);

		if let Some(value) = self.get_key(&key) {
			return Ok(value);
		}

		let value = compute().await?;

		self.set_key(key, value.clone());

		Ok(value)
	}

	/// Removes every entry and resets the hit/miss counters; returns how many entries were dropped.
	pub fn clear(&self) -> usize {
		let removed = std::mem::take(&mut *self.state.lock()).entries.len();

		log_event!(info, removed, "Cache cleared.");

		removed
	}

	/// Removes entries expired as of now; returns how many were dropped.
	pub fn cleanup_expired(&self) -> usize {
		self.cleanup_expired_at(OffsetDateTime::now_utc())
	}

	/// Removes entries expired as of `now`; counters are untouched.
	pub fn cleanup_expired_at(&self, now: OffsetDateTime) -> usize {
		let removed = {
			let mut state = self.state.lock();
			let before = state.entries.len();

			state.entries.retain(|_, entry| !entry.is_expired_at(now));

			before - state.entries.len()
		};

		if removed > 0 {
			log_event!(info, removed, "Cache cleanup removed expired entries.");
		}

		removed
	}

	/// Current entry count and lookup statistics.
	pub fn stats(&self) -> CacheStats {
		let state = self.state.lock();
		let lookups = state.hits + state.misses;
		let hit_rate = if lookups == 0 {
			0.0
		} else {
			let rate = state.hits as f64 / lookups as f64 * 100.0;

			(rate * 100.0).round() / 100.0
		};

		CacheStats { entries: state.entries.len(), hits: state.hits, misses: state.misses, hit_rate }
	}
}
impl<V> Clone for TtlCache<V> {
	fn clone(&self) -> Self {
		Self { state: Arc::clone(&self.state), default_ttl: self.default_ttl }
	}
}
impl<V> Debug for TtlCache<V> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TtlCache")
			.field("entries", &self.state.lock().entries.len())
			.field("default_ttl", &self.default_ttl)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	const T0: OffsetDateTime = macros::datetime!(2025-05-01 10:00 UTC);

	fn cache() -> TtlCache<String> {
		TtlCache::new(Duration::seconds(60))
	}

	fn key(parts: &[&dyn Display]) -> CacheKey {
		CacheKey::from_parts(parts)
	}

	#[test]
	fn set_then_get_returns_value() {
		let cache = cache();

		cache.set(&[&"key1"], "value1".into());

		assert_eq!(cache.get(&[&"key1"]), Some("value1".into()));
		assert_eq!(cache.get(&[&"nonexistent"]), None);
	}

	#[test]
	fn keys_do_not_leak_across_component_sequences() {
		let cache = cache();

		cache.set(&[&"search", &"peace", &"all"], "results1".into());
		cache.set(&[&"search", &"peace", &"videos"], "results2".into());

		assert_eq!(cache.get(&[&"search", &"peace", &"all"]), Some("results1".into()));
		assert_eq!(cache.get(&[&"search", &"peace", &"videos"]), Some("results2".into()));
		assert_eq!(cache.get(&[&"search", &"peace", &"audio"]), None);
		assert_eq!(cache.get(&[&"peace", &"search", &"all"]), None);
	}

	#[test]
	fn set_overwrites_existing_entry() {
		let cache = cache();

		cache.set(&[&"k"], "old".into());
		cache.set(&[&"k"], "new".into());

		assert_eq!(cache.get(&[&"k"]), Some("new".into()));
		assert_eq!(cache.stats().entries, 1);
	}

	#[test]
	fn expired_entry_is_removed_on_read() {
		let cache = cache();
		let k = key(&[&"k"]);

		cache.set_key_at(k.clone(), "v".into(), Duration::seconds(1), T0);

		assert_eq!(cache.get_key_at(&k, T0 + Duration::milliseconds(999)), Some("v".into()));
		assert_eq!(cache.stats().entries, 1);
		assert_eq!(cache.get_key_at(&k, T0 + Duration::seconds(1)), None);
		assert_eq!(cache.stats().entries, 0);

		let stats = cache.stats();

		assert_eq!((stats.hits, stats.misses), (1, 1));
	}

	#[test]
	fn non_positive_ttl_is_clamped() {
		let entry = CacheEntry::new((), T0, Duration::seconds(-5));

		assert!(entry.expires_at > entry.created_at);
		assert_eq!(entry.expires_at - entry.created_at, MIN_TTL);
	}

	#[test]
	fn cleanup_removes_only_expired_and_keeps_counters() {
		let cache = cache();

		cache.set_key_at(key(&[&"short"]), "a".into(), Duration::seconds(1), T0);
		cache.set_key_at(key(&[&"long"]), "b".into(), Duration::seconds(10), T0);
		cache.get_key_at(&key(&[&"long"]), T0);

		assert_eq!(cache.cleanup_expired_at(T0 + Duration::seconds(2)), 1);

		let stats = cache.stats();

		assert_eq!(stats.entries, 1);
		assert_eq!((stats.hits, stats.misses), (1, 0));
		assert_eq!(cache.get_key_at(&key(&[&"long"]), T0 + Duration::seconds(2)), Some("b".into()));
		assert_eq!(cache.cleanup_expired_at(T0 + Duration::seconds(2)), 0);
	}

	#[test]
	fn stats_report_hit_rate_rounded() {
		let cache = cache();

		assert_eq!(cache.stats().hit_rate, 0.0);

		cache.set(&[&"key1"], "value1".into());
		cache.set(&[&"key2"], "value2".into());
		cache.get(&[&"key1"]);
		cache.get(&[&"key1"]);
		cache.get(&[&"key3"]);

		let stats = cache.stats();

		assert_eq!(stats.entries, 2);
		assert_eq!(stats.hits, 2);
		assert_eq!(stats.misses, 1);
		assert_eq!(stats.hit_rate, 66.67);
	}

	#[test]
	fn clear_resets_entries_and_counters() {
		let cache = cache();

		cache.set(&[&"a"], "1".into());
		cache.set(&[&"c"], "3".into());
		cache.get(&[&"a"]);
		cache.get(&[&"b"]);

		assert_eq!(cache.clear(), 2);

		assert_eq!(cache.stats(), CacheStats { entries: 0, hits: 0, misses: 0, hit_rate: 0.0 });
		assert_eq!(cache.get(&[&"a"]), None);
		assert_eq!(cache.clear(), 0);
	}

	#[test]
	fn clones_share_state() {
		let cache = cache();
		let clone = cache.clone();

		clone.set(&[&"shared"], "yes".into());

		assert_eq!(cache.get(&[&"shared"]), Some("yes".into()));
	}

	#[tokio::test]
	async fn get_or_try_insert_with_computes_once() {
		let cache = cache();
		let first: Result<String, ()> =
			cache.get_or_try_insert_with(&[&"lazy"], || async { Ok("computed".to_owned()) }).await;
		let second: Result<String, ()> =
			cache.get_or_try_insert_with(&[&"lazy"], || async { Err(()) }).await;

		assert_eq!(first, Ok("computed".into()));
		assert_eq!(second, Ok("computed".into()));

		let failed: Result<String, &str> =
			cache.get_or_try_insert_with(&[&"other"], || async { Err("boom") }).await;

		assert_eq!(failed, Err("boom"));
		assert_eq!(cache.stats().entries, 1);
	}
}
