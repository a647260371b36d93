//! Bearer token string that stays out of logs.

// self
use crate::_prelude::*;

/// Token text as issued by the CDN. `Debug` and `Display` never print it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a token string as-is.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Reads a token endpoint body; surrounding whitespace is dropped and blank bodies yield
	/// `None`.
	pub fn from_body(body: &str) -> Option<Self> {
		let token = body.trim();

		(!token.is_empty()).then(|| Self(token.to_owned()))
	}

	/// Raw token text for request headers; never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret(<{} bytes redacted>)", self.0.len())
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
