//! CDN endpoint model and hostname extraction from the homepage body.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
// self
use crate::_prelude::*;

/// Path of the token endpoint relative to the CDN base URL.
pub const TOKEN_PATH: &str = "tokens/jworg.jwt";

static CDN_HOST: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"https?://([a-z0-9-]+\.jw-cdn\.org)").expect("CDN host pattern should compile.")
});

/// Discovered CDN endpoint; immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdnInfo {
	/// Secure base URL of the CDN (`https://<host>/`).
	pub base_url: Url,
	/// Instant the host was discovered.
	pub discovered_at: OffsetDateTime,
}
impl CdnInfo {
	/// Builds the info for a bare hostname, always using the secure scheme.
	pub fn from_host(host: &str, discovered_at: OffsetDateTime) -> Result<Self, url::ParseError> {
		let base_url = Url::parse(&format!("https://{host}"))?;

		Ok(Self { base_url, discovered_at })
	}

	/// Scheme + host without a trailing slash, e.g. `https://abc123.jw-cdn.org`.
	pub fn origin(&self) -> String {
		self.base_url.origin().ascii_serialization()
	}

	/// Token endpoint under this CDN.
	pub fn token_url(&self) -> Result<Url, url::ParseError> {
		self.base_url.join(TOKEN_PATH)
	}

	/// Search endpoint for a language/filter pair; the query string is left to the caller.
	pub fn search_url(&self, language: &str, filter: &str) -> Result<Url, url::ParseError> {
		self.base_url.join(&format!("apis/search/results/{language}/{filter}"))
	}
}

/// Returns the first CDN hostname referenced by `body`, if any.
pub fn extract_cdn_host(body: &str) -> Option<&str> {
	CDN_HOST.captures(body).and_then(|caps| caps.get(1)).map(|host| host.as_str())
}
