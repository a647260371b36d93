//! Search API response decoding.
//!
//! The API returns either a flat list of items or, for the `all` filter, groups whose `results`
//! hold the items. Both shapes are flattened into [`SearchResult`]s in response order. Missing
//! fields fall back to empty values. Items are decoded one at a time, so a malformed item is
//! skipped instead of failing the page; only a body whose envelope does not match is reported
//! as an error.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
use scraper::Html;
// self
use crate::{
	_prelude::*,
	content::{SearchFilter, SearchPage, SearchResult},
	error::ContentError,
	obs::log_event,
};

static YEAR: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\((\d{4})\)").expect("Year pattern should compile."));

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawResponse {
	results: Vec<serde_json::Value>,
	insight: RawInsight,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInsight {
	page: Option<u64>,
	total: Option<RawTotal>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTotal {
	value: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItem {
	#[serde(rename = "type")]
	kind: Option<String>,
	subtype: Option<String>,
	title: Option<String>,
	snippet: Option<String>,
	context: Option<String>,
	links: BTreeMap<String, serde_json::Value>,
	insight: Option<RawItemInsight>,
	results: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawItemInsight {
	rank: Option<i64>,
}

/// Decodes a search API body into a page for `query` + `filter`.
pub fn parse_search_page(
	body: &str,
	query: &str,
	filter: SearchFilter,
) -> Result<SearchPage, ContentError> {
	let deserializer = &mut serde_json::Deserializer::from_str(body);
	let raw: RawResponse = serde_path_to_error::deserialize(deserializer)
		.map_err(|source| ContentError::SearchParse { source })?;
	let mut results = Vec::new();

	for item in raw.results.into_iter().filter_map(decode_item) {
		if item.kind.as_deref() == Some("group") {
			results.extend(item.results.into_iter().filter_map(decode_item).map(convert_item));
		} else {
			results.push(convert_item(item));
		}
	}

	let total = raw.insight.total.and_then(|total| total.value).unwrap_or(results.len() as u64);

	Ok(SearchPage {
		results,
		total,
		page: raw.insight.page.unwrap_or(1),
		filter,
		query: query.to_owned(),
	})
}

/// Reduces a snippet's HTML to its text: tags dropped, named and numeric entities decoded,
/// whitespace collapsed.
pub fn clean_snippet(raw: &str) -> String {
	let fragment = Html::parse_fragment(raw);
	let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");

	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_item(value: serde_json::Value) -> Option<RawItem> {
	serde_json::from_value(value)
		.inspect_err(|_| log_event!(debug, "Skipped a search item with an unexpected shape."))
		.ok()
}

fn convert_item(item: RawItem) -> SearchResult {
	let url = ["wol", "jw.org"]
		.iter()
		.find_map(|name| {
			item.links.get(*name).and_then(serde_json::Value::as_str).filter(|link| !link.is_empty())
		})
		.unwrap_or_default()
		.to_owned();
	let (publication, year) = match item.context.as_deref() {
		Some(context) => split_context(context),
		None => (None, None),
	};

	SearchResult {
		title: item.title.unwrap_or_default(),
		snippet: item.snippet.as_deref().map(clean_snippet).unwrap_or_default(),
		url,
		kind: item.kind.unwrap_or_else(|| "item".into()),
		subtype: item.subtype.filter(|subtype| !subtype.is_empty()),
		context: item.context,
		publication,
		year,
		rank: item.insight.and_then(|insight| insight.rank),
	}
}

fn split_context(context: &str) -> (Option<String>, Option<i32>) {
	let Some(caps) = YEAR.captures(context) else {
		return (Some(context.to_owned()), None);
	};
	let year = caps.get(1).and_then(|year| year.as_str().parse::<i32>().ok());
	let publication = context.replace(&caps[0], "").trim().to_owned();

	(Some(publication).filter(|p| !p.is_empty()), year)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const GROUPED: &str = r#"{
		"layout": ["flat"],
		"results": [
			{
				"type": "group",
				"results": [
					{
						"type": "item",
						"subtype": "article",
						"links": {"wol": "https://wol.jw.org/en/wol/d/r1/lp-e/1985720"},
						"title": "Peace and Security: The Hope",
						"snippet": "The need for <strong>peace</strong> and&nbsp;security",
						"context": "The Watchtower (1985)",
						"insight": {"rank": 1}
					}
				]
			},
			{
				"type": "item",
				"links": {"jw.org": "https://www.jw.org/en/library/videos/"},
				"title": "Video",
				"context": "Broadcasting"
			}
		],
		"insight": {"page": 2, "total": {"value": 100, "relation": "gte"}}
	}"#;

	#[test]
	fn groups_are_flattened_in_order() {
		let page = parse_search_page(GROUPED, "peace", SearchFilter::All)
			.expect("Grouped fixture should decode.");

		assert_eq!(page.results.len(), 2);
		assert_eq!(page.total, 100);
		assert_eq!(page.page, 2);
		assert_eq!(page.query, "peace");

		let first = &page.results[0];

		assert_eq!(first.title, "Peace and Security: The Hope");
		assert_eq!(first.snippet, "The need for peace and security");
		assert_eq!(first.url, "https://wol.jw.org/en/wol/d/r1/lp-e/1985720");
		assert_eq!(first.subtype.as_deref(), Some("article"));
		assert_eq!(first.publication.as_deref(), Some("The Watchtower"));
		assert_eq!(first.year, Some(1985));
		assert_eq!(first.rank, Some(1));

		let second = &page.results[1];

		assert_eq!(second.url, "https://www.jw.org/en/library/videos/");
		assert_eq!(second.publication.as_deref(), Some("Broadcasting"));
		assert_eq!(second.year, None);
		assert_eq!(second.snippet, "");
	}

	#[test]
	fn missing_insight_falls_back_to_counts() {
		let page = parse_search_page(r#"{"results":[{"title":"Only"}]}"#, "q", SearchFilter::Bible)
			.expect("Sparse fixture should decode.");

		assert_eq!(page.total, 1);
		assert_eq!(page.page, 1);
		assert_eq!(page.results[0].kind, "item");
		assert_eq!(page.results[0].url, "");
		assert_eq!(page.filter, SearchFilter::Bible);
	}

	#[test]
	fn malformed_items_are_skipped() {
		let body = r#"{
			"results": [
				{"title": "Good", "links": {"wol": "https://wol.jw.org/en/wol/d/r1/lp-e/1"}},
				{"title": "Bad", "links": null},
				{"type": "group", "results": [{"title": 42}, {"title": "Nested"}]},
				7
			]
		}"#;
		let page =
			parse_search_page(body, "q", SearchFilter::All).expect("Bad items should not fail the page.");
		let titles = page.results.iter().map(|result| result.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["Good", "Nested"]);
		assert_eq!(page.total, 2);
	}

	#[test]
	fn mismatched_envelope_reports_path() {
		let err = parse_search_page(r#"{"results":"none"}"#, "q", SearchFilter::All)
			.expect_err("A non-list result set should be rejected.");

		match err {
			ContentError::SearchParse { source } => assert_eq!(source.path().to_string(), "results"),
			other => panic!("Expected a search parse error, got {other:?}."),
		}
	}

	#[test]
	fn snippet_cleanup_handles_entities_and_whitespace() {
		assert_eq!(clean_snippet("  a<br/>b &amp; <em>c</em>\n d  "), "a b & c d");
		assert_eq!(
			clean_snippet("God&#8217;s &ldquo;love&rdquo; &eacute;&nbsp;&#x2014; x"),
			"God\u{2019}s \u{201c}love\u{201d} \u{e9} \u{2014} x"
		);
		assert_eq!(clean_snippet("1 &lt; 2 &gt; 0 &quot;ok&quot;"), "1 < 2 > 0 \"ok\"");
		assert_eq!(clean_snippet(""), "");
	}
}
