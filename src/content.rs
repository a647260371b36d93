//! Search, article, and scripture operations layered on the session and the response cache.
//!
//! Every operation first consults the [`TtlCache`] with a key built from its parameters and only
//! touches the network on a miss. Search calls go to the discovered CDN with authenticated
//! headers; article pages are fetched from the online library without credentials.

pub mod article;
pub mod model;
pub mod search;

pub use article::*;
pub use model::*;
pub use search::{clean_snippet, parse_search_page};

// self
use crate::{
	_prelude::*,
	cache::{CacheStats, TtlCache},
	error::ContentError,
	http::{HttpFetcher, RequestHeaders},
	obs::{self, FlowKind, log_event},
	session::Session,
};
#[cfg(feature = "reqwest")] use crate::{config::Settings, http::ReqwestHttpClient};

const SEARCH_DOMAIN: &str = "jw-cdn.org";
const ARTICLE_DOMAIN: &str = "wol.jw.org";
const SCRIPTURE_DOMAIN: &str = "jw.org";

/// Value stored in the content cache.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedContent {
	/// Untruncated search page plus the metadata of the original fetch.
	Search(SearchPage, ResponseMetadata),
	/// Parsed article plus the metadata of the original fetch.
	Article(ArticleContent, ResponseMetadata),
}

/// High-level client exposing the content operations.
pub struct ContentClient<C>
where
	C: ?Sized + HttpFetcher,
{
	/// Authenticated session shared with any other component of the process.
	pub session: Session<C>,
	/// Response cache.
	pub cache: TtlCache<CachedContent>,
	/// Collaborator that turns article HTML into [`ArticleContent`].
	pub parser: Arc<dyn ArticleParser>,
}
impl<C> ContentClient<C>
where
	C: ?Sized + HttpFetcher,
{
	/// Creates a client whose cache TTL comes from the session settings.
	pub fn new(session: Session<C>, parser: Arc<dyn ArticleParser>) -> Self {
		let cache = TtlCache::new(session.settings.cache_ttl());

		Self { session, cache, parser }
	}

	/// Starts a search request pre-filled with the configured defaults.
	pub fn search_request(&self, query: impl Into<String>) -> SearchRequest {
		let settings = &self.session.settings;

		SearchRequest::new(query)
			.with_filter(settings.default_search_filter)
			.with_language(settings.default_language.clone())
			.with_limit(settings.default_search_limit)
	}

	/// Runs a search, serving repeated `(query, filter, language, offset)` tuples from cache.
	pub async fn search(&self, request: SearchRequest) -> Result<(SearchPage, ResponseMetadata)> {
		obs::observe(FlowKind::Search, "search", self.run_search(request)).await
	}

	/// Fetches and parses an article page, serving repeated URLs from cache.
	///
	/// Relative paths such as `/en/wol/d/r1/lp-e/2024001` resolve against
	/// [`crate::config::Settings::wol_base_url`].
	pub async fn get_article(&self, url: &str) -> Result<(ArticleContent, ResponseMetadata)> {
		obs::observe(FlowKind::Article, "get_article", self.run_article(url)).await
	}

	/// Resolves a scripture reference through a Bible-filtered search.
	pub async fn get_scripture(
		&self,
		reference: &str,
		translation: &str,
	) -> Result<(ScriptureContent, ResponseMetadata)> {
		obs::observe(FlowKind::Scripture, "get_scripture", self.run_scripture(reference, translation))
			.await
	}

	/// Cache occupancy and hit-rate snapshot.
	pub fn cache_stats(&self) -> CacheStats {
		self.cache.stats()
	}

	/// Drops every cached response and resets the counters; returns how many were removed.
	pub fn clear_cache(&self) -> usize {
		self.cache.clear()
	}

	/// Drops expired cached responses; returns how many were removed.
	pub fn cleanup_cache(&self) -> usize {
		self.cache.cleanup_expired()
	}

	fn cache_enabled(&self) -> bool {
		self.session.settings.enable_cache
	}

	fn cached(&self, key: &[&dyn Display]) -> Option<CachedContent> {
		if self.cache_enabled() { self.cache.get(key) } else { None }
	}

	async fn run_search(&self, request: SearchRequest) -> Result<(SearchPage, ResponseMetadata)> {
		let query = request.query.trim().to_owned();
		let key: [&dyn Display; 4] = [&query, &request.filter, &request.language, &request.offset];

		if let Some(CachedContent::Search(page, mut metadata)) = self.cached(&key) {
			log_event!(info, query = %query, "Serving search from cache.");
			metadata.cache_hit = true;

			return Ok((limit_results(page, request.limit), metadata));
		}

		let cdn = self.session.discover_cdn().await?;
		let headers = self.session.authenticated_headers().await?;
		let mut url = cdn
			.search_url(&request.language, request.filter.as_str())
			.map_err(|source| ContentError::InvalidUrl { source })?;

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("q", &query);

			if request.offset > 0 {
				pairs.append_pair("offset", &request.offset.to_string());
			}
		}

		log_event!(info, url = %url, "Searching.");

		let response = self
			.session
			.http_client
			.fetch(&url, &headers)
			.await
			.map_err(|source| ContentError::Transport { operation: "search", source })?;

		if !response.is_success() {
			return Err(ContentError::Status { status: response.status, url: url.to_string() }.into());
		}

		let page = search::parse_search_page(&response.body, &query, request.filter)?;
		let metadata = ResponseMetadata::fetched(
			SEARCH_DOMAIN,
			url.as_str(),
			BTreeMap::from([
				("query".to_owned(), query.clone()),
				("filter".to_owned(), request.filter.to_string()),
				("language".to_owned(), request.language.clone()),
				("offset".to_owned(), request.offset.to_string()),
			]),
		);

		if self.cache_enabled() {
			self.cache.set(&key, CachedContent::Search(page.clone(), metadata.clone()));
		}

		Ok((limit_results(page, request.limit), metadata))
	}

	async fn run_article(&self, raw_url: &str) -> Result<(ArticleContent, ResponseMetadata)> {
		let url = self
			.session
			.settings
			.wol_base_url
			.join(raw_url.trim())
			.map_err(|source| ContentError::InvalidUrl { source })?;
		let key: [&dyn Display; 2] = [&url, &"article"];

		if let Some(CachedContent::Article(article, mut metadata)) = self.cached(&key) {
			log_event!(info, url = %url, "Serving article from cache.");
			metadata.cache_hit = true;

			return Ok((article, metadata));
		}

		log_event!(info, url = %url, "Fetching article.");

		let response = self
			.session
			.http_client
			.fetch(&url, &RequestHeaders::default())
			.await
			.map_err(|source| ContentError::Transport { operation: "article", source })?;

		if !response.is_success() {
			return Err(ContentError::Status { status: response.status, url: url.to_string() }.into());
		}

		let article = self.parser.parse(&response.body, &url)?;
		let metadata = ResponseMetadata::fetched(
			ARTICLE_DOMAIN,
			url.as_str(),
			BTreeMap::from([("url".to_owned(), url.to_string())]),
		);

		if self.cache_enabled() {
			self.cache.set(&key, CachedContent::Article(article.clone(), metadata.clone()));
		}

		Ok((article, metadata))
	}

	async fn run_scripture(
		&self,
		reference: &str,
		translation: &str,
	) -> Result<(ScriptureContent, ResponseMetadata)> {
		let request = self.search_request(reference).with_filter(SearchFilter::Bible);
		let (page, _) = self.search(request).await?;
		let first = page
			.results
			.into_iter()
			.next()
			.ok_or_else(|| ContentError::NotFound { reference: reference.to_owned() })?;
		let metadata = ResponseMetadata::fetched(
			SCRIPTURE_DOMAIN,
			first.url.clone(),
			BTreeMap::from([
				("reference".to_owned(), reference.to_owned()),
				("translation".to_owned(), translation.to_owned()),
			]),
		);
		let scripture = ScriptureContent {
			text: first.snippet,
			reference: first.title,
			context: Vec::new(),
			source_url: first.url,
		};

		Ok((scripture, metadata))
	}
}
#[cfg(feature = "reqwest")]
impl ContentClient<ReqwestHttpClient> {
	/// Creates a client with a reqwest-backed session configured from `settings`.
	pub fn from_settings(settings: Settings, parser: Arc<dyn ArticleParser>) -> Result<Self> {
		Ok(Self::new(Session::new(settings)?, parser))
	}
}
impl<C> Clone for ContentClient<C>
where
	C: ?Sized + HttpFetcher,
{
	fn clone(&self) -> Self {
		Self {
			session: self.session.clone(),
			cache: self.cache.clone(),
			parser: Arc::clone(&self.parser),
		}
	}
}
impl<C> Debug for ContentClient<C>
where
	C: ?Sized + HttpFetcher,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ContentClient")
			.field("session", &self.session)
			.field("cache", &self.cache)
			.finish()
	}
}

fn limit_results(mut page: SearchPage, limit: usize) -> SearchPage {
	if limit > 0 {
		page.results.truncate(limit);
	}

	page
}
