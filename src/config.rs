//! Runtime settings for discovery, transport, caching, and search defaults.
//!
//! Every field has a default matching the public jw.org deployment, so
//! [`Settings::default`] is usable as-is. [`Settings::from_env`] overlays `JWORG_MCP_*`
//! environment variables (e.g. `JWORG_MCP_CACHE_TTL_SECONDS=60`).

// self
use crate::{_prelude::*, content::SearchFilter, error::ConfigError};

/// Prefix shared by every environment variable understood by [`Settings::from_env`].
pub const ENV_PREFIX: &str = "JWORG_MCP_";

/// Client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Site root sent as the `Referer` of authenticated requests.
	pub base_url: Url,
	/// Homepage scanned for the CDN hostname.
	pub home_url: Url,
	/// Online library root that hosts article pages; relative article URLs resolve against it.
	pub wol_base_url: Url,
	/// Default cache entry lifetime in seconds.
	pub cache_ttl_seconds: u64,
	/// Enables the response cache for content operations.
	pub enable_cache: bool,
	/// Per-request deadline in seconds.
	pub request_timeout_seconds: u64,
	/// Retry budget advertised to outer callers; the client itself never retries.
	pub max_retries: u32,
	/// Backoff factor advertised to outer callers; the client itself never retries.
	pub retry_backoff_factor: f64,
	/// Concurrency ceiling advertised to outer callers.
	pub max_concurrent_requests: usize,
	/// Idle connections kept per host by the HTTP transport.
	pub connection_pool_size: usize,
	/// Language code used when a search does not specify one.
	pub default_language: String,
	/// Result limit used when a search does not specify one.
	pub default_search_limit: usize,
	/// Content filter used when a search does not specify one.
	pub default_search_filter: SearchFilter,
}
impl Settings {
	/// Loads settings from `JWORG_MCP_*` environment variables, falling back to defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
	}

	/// Loads settings from an explicit set of `(name, value)` pairs using the same rules as
	/// [`Settings::from_env`].
	pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = (String, String)>,
	{
		Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
	}

	/// Overrides the homepage used for CDN discovery.
	pub fn with_home_url(mut self, url: Url) -> Self {
		self.home_url = url;

		self
	}

	/// Overrides the default cache TTL.
	pub fn with_cache_ttl_seconds(mut self, seconds: u64) -> Self {
		self.cache_ttl_seconds = seconds;

		self
	}

	/// Enables or disables the response cache.
	pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
		self.enable_cache = enabled;

		self
	}

	/// Overrides the per-request deadline.
	pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
		self.request_timeout_seconds = seconds;

		self
	}

	/// Default cache TTL as a [`Duration`].
	pub fn cache_ttl(&self) -> Duration {
		Duration::seconds(i64::try_from(self.cache_ttl_seconds).unwrap_or(i64::MAX))
	}

	/// Per-request deadline as a std duration, the unit HTTP transports expect.
	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.request_timeout_seconds)
	}
}
impl Default for Settings {
	fn default() -> Self {
		Self {
			base_url: Url::parse("https://www.jw.org").expect("Default base URL should parse."),
			home_url: Url::parse("https://www.jw.org/en/").expect("Default home URL should parse."),
			wol_base_url: Url::parse("https://wol.jw.org")
				.expect("Default library URL should parse."),
			cache_ttl_seconds: 900,
			enable_cache: true,
			request_timeout_seconds: 30,
			max_retries: 3,
			retry_backoff_factor: 0.5,
			max_concurrent_requests: 100,
			connection_pool_size: 100,
			default_language: "E".into(),
			default_search_limit: 10,
			default_search_filter: SearchFilter::All,
		}
	}
}
