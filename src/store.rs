//! Shared in-process cell holding the discovered CDN and the current bearer credential.
//!
//! The store is single-tenant: at most one [`CdnInfo`] and one [`Credential`] exist per store.
//! Every mutation happens under one write lock, so replacing a credential is atomic and two
//! concurrent refreshes can never interleave partial writes.

// self
use crate::{
	_prelude::*,
	auth::{CdnInfo, Credential},
};

#[derive(Debug, Default)]
struct Slots {
	cdn: Option<CdnInfo>,
	credential: Option<Credential>,
}

/// Thread-safe credential cell shared by every clone of a session.
#[derive(Clone, Debug, Default)]
pub struct CredentialStore(Arc<RwLock<Slots>>);
impl CredentialStore {
	/// Returns the stored CDN info, if discovery has succeeded.
	pub fn cdn(&self) -> Option<CdnInfo> {
		self.0.read().cdn.clone()
	}

	/// Stores `info` unless another caller already did, returning whichever value is kept.
	pub fn store_cdn(&self, info: CdnInfo) -> CdnInfo {
		self.0.write().cdn.get_or_insert(info).clone()
	}

	/// Forgets the discovered CDN so the next discovery hits the network again.
	pub fn invalidate_cdn(&self) -> Option<CdnInfo> {
		self.0.write().cdn.take()
	}

	/// Returns the current credential, if any.
	pub fn credential(&self) -> Option<Credential> {
		self.0.read().credential.clone()
	}

	/// Atomically replaces the credential, returning the superseded value.
	pub fn replace_credential(&self, credential: Credential) -> Option<Credential> {
		self.0.write().credential.replace(credential)
	}

	/// Drops the current credential so the next token request refreshes.
	pub fn clear_credential(&self) -> Option<Credential> {
		self.0.write().credential.take()
	}
}
