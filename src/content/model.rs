//! Request and response models for content operations.

// self
use crate::_prelude::*;

/// Content category accepted by the search API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
	/// Every category, grouped by type.
	#[default]
	All,
	/// Books, brochures, magazines.
	Publications,
	/// Video programs.
	Videos,
	/// Audio recordings.
	Audio,
	/// Bible verses.
	Bible,
	/// Research indexes.
	Indexes,
}
impl SearchFilter {
	/// Path segment used by the search API.
	pub const fn as_str(self) -> &'static str {
		match self {
			SearchFilter::All => "all",
			SearchFilter::Publications => "publications",
			SearchFilter::Videos => "videos",
			SearchFilter::Audio => "audio",
			SearchFilter::Bible => "bible",
			SearchFilter::Indexes => "indexes",
		}
	}
}
impl Display for SearchFilter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for SearchFilter {
	type Err = UnknownSearchFilter;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"all" => Ok(Self::All),
			"publications" => Ok(Self::Publications),
			"videos" => Ok(Self::Videos),
			"audio" => Ok(Self::Audio),
			"bible" => Ok(Self::Bible),
			"indexes" => Ok(Self::Indexes),
			_ => Err(UnknownSearchFilter(s.to_owned())),
		}
	}
}

/// Returned when parsing a [`SearchFilter`] from an unsupported label.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown search filter `{0}`.")]
pub struct UnknownSearchFilter(pub String);

/// Parameters of a search call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
	/// Search terms, sent as-is after trimming.
	pub query: String,
	/// Content category.
	pub filter: SearchFilter,
	/// Language code (`E` for English, `S` for Spanish, ...).
	pub language: String,
	/// Maximum results returned to the caller; `0` returns the whole page.
	pub limit: usize,
	/// Pagination offset forwarded to the API.
	pub offset: usize,
}
impl SearchRequest {
	/// Creates a request for `query` with the public defaults (`all`, `E`, 10 results).
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			filter: SearchFilter::All,
			language: "E".into(),
			limit: 10,
			offset: 0,
		}
	}

	/// Overrides the content filter.
	pub fn with_filter(mut self, filter: SearchFilter) -> Self {
		self.filter = filter;

		self
	}

	/// Overrides the language code.
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();

		self
	}

	/// Overrides the result limit.
	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit;

		self
	}

	/// Overrides the pagination offset.
	pub fn with_offset(mut self, offset: usize) -> Self {
		self.offset = offset;

		self
	}
}

/// One hit returned by the search API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
	/// Result title.
	pub title: String,
	/// Plain-text snippet with markup removed.
	pub snippet: String,
	/// Link to the content, preferring the online library.
	pub url: String,
	/// Item type reported by the API (`item` when absent).
	#[serde(rename = "type")]
	pub kind: String,
	/// Item subtype (`article`, `video`, ...).
	pub subtype: Option<String>,
	/// Raw context line, e.g. `The Watchtower (1985)`.
	pub context: Option<String>,
	/// Publication name split out of the context.
	pub publication: Option<String>,
	/// Publication year split out of the context.
	pub year: Option<i32>,
	/// Relevance rank.
	pub rank: Option<i64>,
}

/// A page of search results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
	/// Results on this page.
	pub results: Vec<SearchResult>,
	/// Total matches reported by the API.
	pub total: u64,
	/// Page number reported by the API.
	pub page: u64,
	/// Filter the page was fetched with.
	pub filter: SearchFilter,
	/// Query the page was fetched with.
	pub query: String,
}

/// Structured article content produced by an [`ArticleParser`](crate::content::ArticleParser).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleContent {
	/// Article title.
	pub title: String,
	/// Body paragraphs in reading order.
	pub paragraphs: Vec<String>,
	/// Scripture references cited by the article.
	pub references: Vec<String>,
	/// Page the article was read from.
	pub source_url: String,
}

/// A scripture passage resolved through search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptureContent {
	/// Passage text.
	pub text: String,
	/// Canonical reference, e.g. `John 3:16`.
	pub reference: String,
	/// Surrounding verses, when known.
	pub context: Vec<String>,
	/// Page the passage was read from.
	pub source_url: String,
}

/// Provenance attached to every content response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
	/// Domain that served the content.
	pub source_domain: String,
	/// Exact URL that served the content.
	pub source_url: String,
	/// Instant the content was fetched.
	pub timestamp: OffsetDateTime,
	/// Parameters the caller supplied.
	pub query_params: BTreeMap<String, String>,
	/// `true` when the response came from the cache.
	pub cache_hit: bool,
}
impl ResponseMetadata {
	pub(crate) fn fetched(
		source_domain: &str,
		source_url: impl Into<String>,
		query_params: BTreeMap<String, String>,
	) -> Self {
		Self {
			source_domain: source_domain.into(),
			source_url: source_url.into(),
			timestamp: OffsetDateTime::now_utc(),
			query_params,
			cache_hit: false,
		}
	}
}
