//! Bearer credential model and best-effort expiry introspection.
//!
//! Tokens are treated as opaque strings. Their middle segment is decoded only to estimate when
//! the CDN will stop accepting them; the signature is never verified. A token that cannot be
//! introspected is still usable, so every decoding failure resolves to [`FALLBACK_LIFETIME`].

pub mod secret;

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Margin before nominal expiry at which a credential stops being handed out.
pub const REFRESH_SKEW: Duration = Duration::minutes(5);
/// Lifetime assumed when a token's expiry cannot be decoded.
pub const FALLBACK_LIFETIME: Duration = Duration::days(7);

/// Bearer token issued by the CDN together with its lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
	/// Opaque bearer token; callers must avoid logging it.
	pub token: TokenSecret,
	/// Instant the token was fetched.
	pub issued_at: OffsetDateTime,
	/// Decoded (or fallback) expiry instant.
	pub expires_at: OffsetDateTime,
}
impl Credential {
	/// Wraps a freshly fetched token, deriving the expiry from its payload.
	pub fn issue(token: impl Into<String>, issued_at: OffsetDateTime) -> Self {
		Self::from_secret(TokenSecret::new(token), issued_at)
	}

	/// Same as [`Credential::issue`] for an already wrapped token.
	pub fn from_secret(token: TokenSecret, issued_at: OffsetDateTime) -> Self {
		let expires_at = decode_expiry(token.expose()).unwrap_or(issued_at + FALLBACK_LIFETIME);

		Self { token, issued_at, expires_at }
	}

	/// Returns `true` while `instant` is before the expiry minus [`REFRESH_SKEW`].
	pub fn is_usable_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.checked_sub(REFRESH_SKEW).is_some_and(|cutoff| instant < cutoff)
	}

	/// Convenience helper that checks usability against the current UTC instant.
	pub fn is_usable(&self) -> bool {
		self.is_usable_at(OffsetDateTime::now_utc())
	}
}

/// Decodes the `exp` claim of a three-segment token.
///
/// Returns `None` for anything other than `header.payload.signature` with a base64url payload
/// (padded or not) holding a JSON object whose `exp` is a representable Unix timestamp.
pub fn decode_expiry(token: &str) -> Option<OffsetDateTime> {
	let mut segments = token.split('.');
	let (Some(_), Some(payload), Some(_), None) =
		(segments.next(), segments.next(), segments.next(), segments.next())
	else {
		return None;
	};
	let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
	let claims = serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(&bytes).ok()?;
	let exp = claims.get("exp")?;
	let seconds = exp.as_i64().or_else(|| exp.as_f64().map(|secs| secs as i64))?;

	OffsetDateTime::from_unix_timestamp(seconds).ok()
}
