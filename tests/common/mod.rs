#![allow(dead_code)]

// std
use std::{
	collections::HashMap,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
	time::Duration as StdDuration,
};
// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use parking_lot::Mutex;
use time::OffsetDateTime;
// self
use jworg_client::{
	config::Settings,
	content::{ArticleContent, ContentClient},
	error::{ContentError, TransportError},
	http::{FetchFuture, FetchResponse, HttpFetcher, RequestHeaders},
	session::Session,
	url::Url,
};

pub const HOME_URL: &str = "https://www.jw.org/en/";
pub const CDN_ORIGIN: &str = "https://abc123.jw-cdn.org";
pub const TOKEN_URL: &str = "https://abc123.jw-cdn.org/tokens/jworg.jwt";
pub const HOME_BODY: &str =
	r#"<html><script src="https://abc123.jw-cdn.org/assets/app.js"></script></html>"#;

#[derive(Debug)]
pub struct MockTransportError;
impl Display for MockTransportError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Mock transport refused the connection.")
	}
}
impl std::error::Error for MockTransportError {}

#[derive(Clone)]
enum Route {
	Respond(FetchResponse),
	Fail,
}

#[derive(Default)]
struct MockState {
	routes: HashMap<String, Route>,
	calls: HashMap<String, usize>,
	last_headers: HashMap<String, RequestHeaders>,
}

/// In-process transport that serves canned responses keyed by full URL.
#[derive(Clone, Default)]
pub struct MockFetcher {
	state: Arc<Mutex<MockState>>,
	delay: Option<StdDuration>,
}
impl MockFetcher {
	/// Mock that already serves a homepage referencing the `abc123` CDN.
	pub fn with_homepage() -> Self {
		let mock = Self::default();

		mock.respond(HOME_URL, 200, HOME_BODY);

		mock
	}

	pub fn delayed(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn respond(&self, url: &str, status: u16, body: impl Into<String>) {
		let route = Route::Respond(FetchResponse::new(status, body));

		self.state.lock().routes.insert(url.into(), route);
	}

	pub fn fail(&self, url: &str) {
		self.state.lock().routes.insert(url.into(), Route::Fail);
	}

	pub fn calls(&self, url: &str) -> usize {
		self.state.lock().calls.get(url).copied().unwrap_or(0)
	}

	/// Number of requests whose URL starts with `prefix`.
	pub fn calls_with_prefix(&self, prefix: &str) -> usize {
		self.state
			.lock()
			.calls
			.iter()
			.filter(|(url, _)| url.starts_with(prefix))
			.map(|(_, count)| count)
			.sum()
	}

	pub fn last_headers(&self, url: &str) -> Option<RequestHeaders> {
		self.state.lock().last_headers.get(url).cloned()
	}
}
impl HttpFetcher for MockFetcher {
	fn fetch<'a>(&'a self, url: &'a Url, headers: &'a RequestHeaders) -> FetchFuture<'a> {
		Box::pin(async move {
			let route = {
				let mut state = self.state.lock();
				let key = url.to_string();

				*state.calls.entry(key.clone()).or_default() += 1;
				state.last_headers.insert(key.clone(), headers.clone());

				state.routes.get(&key).cloned()
			};

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			match route {
				Some(Route::Respond(response)) => Ok(response),
				Some(Route::Fail) => Err(TransportError::network(MockTransportError)),
				None => Ok(FetchResponse::new(404, "")),
			}
		})
	}
}

/// Builds an unsigned token whose payload carries `exp`.
pub fn jwt_with_exp(exp: OffsetDateTime) -> String {
	jwt_with_payload(&format!(r#"{{"exp":{}}}"#, exp.unix_timestamp()))
}

pub fn jwt_with_payload(payload: &str) -> String {
	format!(
		"{}.{}.signature",
		URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
		URL_SAFE_NO_PAD.encode(payload)
	)
}

pub fn settings() -> Settings {
	Settings::default()
		.with_home_url(Url::parse(HOME_URL).expect("Mock homepage URL should parse."))
}

pub fn session(mock: &MockFetcher) -> Session<MockFetcher> {
	Session::with_http_client(settings(), mock.clone())
}

pub fn session_with(mock: &MockFetcher, settings: Settings) -> Session<MockFetcher> {
	Session::with_http_client(settings, mock.clone())
}

pub fn content_client(mock: &MockFetcher, settings: Settings) -> ContentClient<MockFetcher> {
	ContentClient::new(
		Session::with_http_client(settings, mock.clone()),
		Arc::new(|html: &str, url: &Url| -> Result<ArticleContent, ContentError> {
			Ok(ArticleContent {
				title: html.lines().next().unwrap_or_default().to_owned(),
				paragraphs: html.lines().skip(1).map(str::to_owned).collect(),
				references: Vec::new(),
				source_url: url.to_string(),
			})
		}),
	)
}
