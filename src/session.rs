//! Authenticated session: CDN discovery, token issuance, and request headers.
//!
//! A [`Session`] owns the HTTP transport, settings, credential store, and a per-process client
//! identifier. Cloning a session shares all of them, so one session per process preserves the
//! single-identity semantics without any global state.
//!
//! Discovery is memoized for the lifetime of the store. Token requests reuse the stored
//! credential until it enters the [`REFRESH_SKEW`](crate::auth::REFRESH_SKEW) window. Both
//! network paths are singleflight: concurrent callers wait on an async guard and then re-check
//! the store, so a burst of requests triggers at most one homepage fetch and one token fetch.

mod metrics;

pub use metrics::SessionMetrics;

// crates.io
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::{self, CdnInfo, Credential, TokenSecret},
	config::Settings,
	error::{AuthenticationError, CdnDiscoveryError},
	http::{HttpFetcher, RequestHeaders},
	obs::{self, FlowKind, log_event},
	store::CredentialStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest transport.
pub type ReqwestSession = Session<ReqwestHttpClient>;

/// Owns the authentication state for one client identity.
pub struct Session<C>
where
	C: ?Sized + HttpFetcher,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Settings shared with downstream content operations.
	pub settings: Arc<Settings>,
	/// Discovered CDN and current credential.
	pub store: CredentialStore,
	/// Network-call counters for discovery and token issuance.
	pub metrics: Arc<SessionMetrics>,
	client_id: Uuid,
	discovery_guard: Arc<AsyncMutex<()>>,
	refresh_guard: Arc<AsyncMutex<()>>,
}
impl<C> Session<C>
where
	C: ?Sized + HttpFetcher,
{
	/// Creates a session around a caller-provided transport.
	pub fn with_http_client(settings: Settings, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			settings: Arc::new(settings),
			store: CredentialStore::default(),
			metrics: Default::default(),
			client_id: Uuid::new_v4(),
			discovery_guard: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Stable identifier sent as `X-Client-ID` on every authenticated request.
	pub fn client_id(&self) -> Uuid {
		self.client_id
	}

	/// Returns the CDN endpoint, scanning the homepage only on the first successful call.
	pub async fn discover_cdn(&self) -> Result<CdnInfo> {
		if let Some(info) = self.store.cdn() {
			return Ok(info);
		}

		obs::observe(FlowKind::Discovery, "discover_cdn", self.fetch_cdn()).await
	}

	async fn fetch_cdn(&self) -> Result<CdnInfo> {
		let _singleflight = self.discovery_guard.lock().await;

		if let Some(info) = self.store.cdn() {
			return Ok(info);
		}

		let home_url = &self.settings.home_url;

		log_event!(info, url = %home_url, "Discovering CDN.");
		self.metrics.record_discovery_fetch();

		let response = self
			.http_client
			.fetch(home_url, &RequestHeaders::default())
			.await
			.map_err(|source| CdnDiscoveryError::Transport { source })?;

		if !response.is_success() {
			log_event!(warn, status = response.status, "Homepage rejected CDN discovery.");

			return Err(CdnDiscoveryError::Status {
				status: response.status,
				url: home_url.to_string(),
			}
			.into());
		}

		let host = auth::extract_cdn_host(&response.body)
			.ok_or_else(|| CdnDiscoveryError::PatternNotFound { url: home_url.to_string() })?;
		let info = CdnInfo::from_host(host, OffsetDateTime::now_utc())
			.map_err(|source| CdnDiscoveryError::InvalidUrl { source })?;

		log_event!(info, cdn = %info.origin(), "Discovered CDN.");

		Ok(self.store.store_cdn(info))
	}

	/// Returns a bearer token, fetching a new one when none is usable or `force_refresh` is set.
	///
	/// A forced refresh still piggy-backs on a refresh that completed while this call waited for
	/// the singleflight guard.
	pub async fn token(&self, force_refresh: bool) -> Result<TokenSecret> {
		let requested_at = OffsetDateTime::now_utc();

		if let Some(credential) = self.usable_credential(requested_at).filter(|_| !force_refresh) {
			return Ok(credential.token);
		}

		obs::observe(FlowKind::TokenIssue, "token", self.issue_token(force_refresh, requested_at))
			.await
	}

	async fn issue_token(
		&self,
		force_refresh: bool,
		requested_at: OffsetDateTime,
	) -> Result<TokenSecret> {
		let _singleflight = self.refresh_guard.lock().await;

		if let Some(credential) = self
			.usable_credential(OffsetDateTime::now_utc())
			.filter(|credential| !force_refresh || credential.issued_at >= requested_at)
		{
			return Ok(credential.token);
		}

		let cdn = self.discover_cdn().await?;
		let token_url =
			cdn.token_url().map_err(|source| AuthenticationError::InvalidUrl { source })?;

		log_event!(info, "Requesting bearer token.");
		self.metrics.record_token_fetch();

		let response = self
			.http_client
			.fetch(&token_url, &RequestHeaders::default())
			.await
			.map_err(|source| AuthenticationError::Transport { source })?;

		if !response.is_success() {
			log_event!(warn, status = response.status, "Token endpoint rejected request.");

			return Err(AuthenticationError::Status { status: response.status }.into());
		}

		let token =
			TokenSecret::from_body(&response.body).ok_or(AuthenticationError::EmptyToken)?;
		let credential = Credential::from_secret(token, OffsetDateTime::now_utc());
		let secret = credential.token.clone();

		log_event!(info, expires_at = %credential.expires_at, "Bearer token acquired.");
		self.store.replace_credential(credential);

		Ok(secret)
	}

	/// Builds the header set every authenticated API request carries.
	pub async fn authenticated_headers(&self) -> Result<RequestHeaders> {
		let token = self.token(false).await?;

		Ok(RequestHeaders::default()
			.with("Accept", "application/json; charset=utf-8")
			.with("Authorization", token.bearer())
			.with("X-Client-ID", self.client_id.to_string())
			.with("Referer", self.settings.base_url.as_str())
			.with("Accept-Encoding", "gzip, deflate, br"))
	}

	/// Forgets the discovered CDN; the next call rediscovers it.
	pub fn invalidate_cdn(&self) {
		self.store.invalidate_cdn();
	}

	/// Forgets the current credential; the next call fetches a new token.
	pub fn invalidate_token(&self) {
		self.store.clear_credential();
	}

	fn usable_credential(&self, now: OffsetDateTime) -> Option<Credential> {
		self.store.credential().filter(|credential| credential.is_usable_at(now))
	}
}
#[cfg(feature = "reqwest")]
impl Session<ReqwestHttpClient> {
	/// Creates a session with a reqwest transport configured from `settings`.
	pub fn new(settings: Settings) -> Result<Self> {
		let http_client = ReqwestHttpClient::from_settings(&settings)?;

		Ok(Self::with_http_client(settings, http_client))
	}
}
impl<C> Clone for Session<C>
where
	C: ?Sized + HttpFetcher,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			settings: Arc::clone(&self.settings),
			store: self.store.clone(),
			metrics: Arc::clone(&self.metrics),
			client_id: self.client_id,
			discovery_guard: Arc::clone(&self.discovery_guard),
			refresh_guard: Arc::clone(&self.refresh_guard),
		}
	}
}
impl<C> Debug for Session<C>
where
	C: ?Sized + HttpFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("client_id", &self.client_id)
			.field("home_url", &self.settings.home_url.as_str())
			.field("cdn", &self.store.cdn().map(|info| info.origin()))
			.field("credential_set", &self.store.credential().is_some())
			.finish()
	}
}
