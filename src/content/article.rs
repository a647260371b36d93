//! Article parsing contract.
//!
//! Turning library HTML into [`ArticleContent`] depends on page markup the client does not own,
//! so it is delegated to an [`ArticleParser`] supplied by the caller. Any
//! `Fn(&str, &Url) -> Result<ArticleContent, ContentError>` closure qualifies.

// self
use crate::{_prelude::*, content::ArticleContent, error::ContentError};

/// Converts a fetched article page into structured content.
pub trait ArticleParser
where
	Self: Send + Sync,
{
	/// Parses `html` fetched from `url`.
	///
	/// Implementations should return [`ContentError::ArticleParse`] when the page does not hold
	/// a readable article.
	fn parse(&self, html: &str, url: &Url) -> Result<ArticleContent, ContentError>;
}
impl<F> ArticleParser for F
where
	F: Send + Sync + Fn(&str, &Url) -> Result<ArticleContent, ContentError>,
{
	fn parse(&self, html: &str, url: &Url) -> Result<ArticleContent, ContentError> {
		self(html, url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn closures_act_as_parsers() {
		let parser = |html: &str, url: &Url| -> Result<ArticleContent, ContentError> {
			if html.is_empty() {
				return Err(ContentError::ArticleParse { message: "empty page".into() });
			}

			Ok(ArticleContent {
				title: "Title".into(),
				paragraphs: vec![html.to_owned()],
				references: Vec::new(),
				source_url: url.to_string(),
			})
		};
		let url =
			Url::parse("https://wol.jw.org/en/wol/d/r1/lp-e/1").expect("Fixture URL should parse.");
		let parser: &dyn ArticleParser = &parser;
		let article = parser.parse("body", &url).expect("Non-empty page should parse.");

		assert_eq!(article.paragraphs, vec!["body".to_owned()]);
		assert_eq!(article.source_url, "https://wol.jw.org/en/wol/d/r1/lp-e/1");
		assert!(matches!(parser.parse("", &url), Err(ContentError::ArticleParse { .. })));
	}
}
