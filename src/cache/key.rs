//! Deterministic cache keys derived from ordered components.

// crates.io
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const SEPARATOR: &str = "|";

/// Fixed-width key: the hex SHA-256 digest of the `|`-joined, stringified components.
///
/// Component order matters; identical sequences always produce identical keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);
impl CacheKey {
	/// Builds a key from components rendered through [`Display`].
	pub fn from_parts(parts: &[&dyn Display]) -> Self {
		let joined = parts.iter().map(|part| part.to_string()).collect::<Vec<_>>().join(SEPARATOR);
		let digest = Sha256::digest(joined.as_bytes());

		Self(format!("{digest:x}"))
	}

	/// Hex digest backing the key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
