//! Transport primitives used by discovery, token issuance, and content retrieval.
//!
//! The module exposes [`HttpFetcher`], the client's only dependency on an HTTP stack, together
//! with [`RequestHeaders`] and [`FetchResponse`]. Status codes are returned as data rather than
//! errors so each caller can wrap a non-success answer with its own context; only failures that
//! prevent a response from arriving surface as [`TransportError`].

// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")]
use crate::{config::Settings, error::ConfigError};

/// Boxed future returned by [`HttpFetcher::fetch`].
pub type FetchFuture<'a> =
	Pin<Box<dyn Future<Output = Result<FetchResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing GET requests.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared across
/// sessions and content clients behind an `Arc`. The returned future must be `Send` so callers
/// can hop executors while a request is in flight.
pub trait HttpFetcher
where
	Self: 'static + Send + Sync,
{
	/// Issues a GET request for `url` carrying `headers` in addition to any transport defaults.
	fn fetch<'a>(&'a self, url: &'a Url, headers: &'a RequestHeaders) -> FetchFuture<'a>;
}

/// Status and decoded body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body decoded as text.
	pub body: String,
}
impl FetchResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Ordered header set attached to a single request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestHeaders(BTreeMap<String, String>);
impl RequestHeaders {
	/// Inserts or replaces a header.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	/// Builder-style variant of [`RequestHeaders::insert`].
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(name, value);

		self
	}

	/// Returns the value stored for `name`, if any.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
	}

	/// Number of headers in the set.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if no headers are set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// Browser-like headers the reqwest transport sends on every request; the homepage rejects
/// clients that do not look like a browser.
#[cfg(feature = "reqwest")]
const DEFAULT_HEADERS: &[(&str, &str)] = &[
	(
		"user-agent",
		"Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
		 Chrome/131.0.0.0 Safari/537.36",
	),
	(
		"accept",
		"text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
	),
	("accept-language", "en-US,en;q=0.9"),
	("upgrade-insecure-requests", "1"),
	("sec-fetch-dest", "document"),
	("sec-fetch-mode", "navigate"),
	("sec-fetch-site", "none"),
	("sec-ch-ua", "\"Google Chrome\";v=\"131\", \"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\""),
	("sec-ch-ua-mobile", "?0"),
	("sec-ch-ua-platform", "\"Windows\""),
];

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Unlike token endpoints in general, the jw.org homepage redirects to localized paths, so the
/// client keeps reqwest's default redirect following enabled.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client honoring the configured timeout and pool size plus browser-like defaults.
	pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
		let mut defaults = reqwest::header::HeaderMap::new();

		for (name, value) in DEFAULT_HEADERS {
			defaults.insert(*name, reqwest::header::HeaderValue::from_static(*value));
		}

		let client = ReqwestClient::builder()
			.timeout(settings.request_timeout())
			.pool_max_idle_per_host(settings.connection_pool_size)
			.default_headers(defaults)
			.build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpFetcher for ReqwestHttpClient {
	fn fetch<'a>(&'a self, url: &'a Url, headers: &'a RequestHeaders) -> FetchFuture<'a> {
		Box::pin(async move {
			let mut request = self.0.get(url.clone());

			for (name, value) in headers.iter() {
				request = request.header(name, value);
			}

			let response = request.send().await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(FetchResponse { status, body })
		})
	}
}
