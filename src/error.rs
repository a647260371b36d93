//! Client-level error types shared across discovery, token issuance, and content retrieval.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Discovery and authentication failures are kept apart so callers can decide whether to retry
/// discovery, retry authentication, or give up.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The CDN hostname could not be discovered.
	#[error(transparent)]
	CdnDiscovery(#[from] CdnDiscoveryError),
	/// The bearer token could not be obtained.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// Search, article, or scripture retrieval failed.
	#[error(transparent)]
	Content(#[from] ContentError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Failures raised while locating the CDN host from the homepage.
#[derive(Debug, ThisError)]
pub enum CdnDiscoveryError {
	/// The homepage could not be reached.
	#[error("Failed to fetch the homepage while discovering the CDN.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The homepage answered with a non-success status.
	#[error("Homepage `{url}` returned HTTP {status} while discovering the CDN.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Homepage URL that was requested.
		url: String,
	},
	/// No CDN hostname appears in the homepage body.
	#[error("Could not find a CDN URL in homepage `{url}`.")]
	PatternNotFound {
		/// Homepage URL that was scanned.
		url: String,
	},
	/// The matched host does not form a valid URL.
	#[error("Discovered CDN host does not form a valid URL.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failures raised while fetching a bearer token from the CDN.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The token endpoint could not be reached.
	#[error("Failed to fetch a token from the CDN.")]
	Transport {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// The token endpoint answered with an empty body.
	#[error("Token endpoint returned an empty token.")]
	EmptyToken,
	/// The token endpoint URL could not be derived from the CDN base URL.
	#[error("Token endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Failures raised by search, article, and scripture operations.
#[derive(Debug, ThisError)]
pub enum ContentError {
	/// The content endpoint could not be reached.
	#[error("Network failure during {operation}.")]
	Transport {
		/// Operation label (`search`, `article`).
		operation: &'static str,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The content endpoint answered with a non-success status.
	#[error("Request to `{url}` returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// URL that was requested.
		url: String,
	},
	/// Search endpoint responded with JSON that does not match the expected shape.
	#[error("Search endpoint returned malformed JSON.")]
	SearchParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Article body could not be turned into structured content.
	#[error("Failed to parse article: {message}.")]
	ArticleParse {
		/// Parser-supplied reason string.
		message: String,
	},
	/// A scripture lookup produced no results.
	#[error("Scripture not found: {reference}.")]
	NotFound {
		/// Reference that was looked up.
		reference: String,
	},
	/// A caller-supplied or derived URL is invalid.
	#[error("Content URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Environment variables could not be deserialized into settings.
	#[error("Settings could not be loaded from the environment.")]
	Environment(#[from] envy::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, request construction).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while performing the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the configured deadline.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The request could not be constructed (e.g., an invalid header value).
	#[error("Request could not be built.")]
	Request {
		/// Transport-specific construction error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Wraps a request construction failure.
	pub fn request(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Request { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else if e.is_builder() {
			Self::request(e)
		} else {
			Self::network(e)
		}
	}
}
