//! Wikipedia lookup client.
//!
//! Resolves a free-text query against the MediaWiki action API: a full-text
//! search picks the page, then the plain-text intro extract is fetched and
//! truncated to a short summary.

use super::{LookupError, LookupProvider};
use crate::config::WikipediaSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// Top search hit plus up to five disambiguation alternates.
const SEARCH_LIMIT: &str = "6";

/// Summaries are cut to this many sentences.
const SUMMARY_SENTENCES: usize = 2;

pub struct WikipediaClient {
    client: Client,
    settings: WikipediaSettings,
}

impl WikipediaClient {
    pub fn new(settings: WikipediaSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    /// Full-text search, returning matching page titles in rank order.
    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let response = self
            .client
            .get(&self.settings.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", SEARCH_LIMIT),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| LookupError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::ApiError(format!(
                "Wikipedia search failed with status {}",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| LookupError::ApiError(format!("Failed to parse search response: {}", e)))?;

        Ok(body
            .query
            .map(|q| q.search.into_iter().map(|hit| hit.title).collect())
            .unwrap_or_default())
    }

    /// Fetch the intro extract and page properties for a resolved title.
    async fn fetch_page(&self, title: &str) -> Result<Page, LookupError> {
        let response = self
            .client
            .get(&self.settings.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts|pageprops"),
                ("explaintext", "1"),
                ("exintro", "1"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| LookupError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LookupError::ApiError(format!(
                "Wikipedia extract failed with status {}",
                response.status()
            )));
        }

        let body: ExtractResponse = response.json().await.map_err(|e| {
            LookupError::ApiError(format!("Failed to parse extract response: {}", e))
        })?;

        body.query
            .and_then(|q| q.pages.into_values().next())
            .ok_or(LookupError::NotFound)
    }
}

#[async_trait]
impl LookupProvider for WikipediaClient {
    async fn summary(&self, query: &str) -> Result<String, LookupError> {
        let mut titles = self.search(query).await?;
        if titles.is_empty() {
            return Err(LookupError::NotFound);
        }
        let title = titles.remove(0);

        tracing::debug!(query = %query, title = %title, "Resolved Wikipedia page");

        let page = self.fetch_page(&title).await?;
        if page.missing.is_some() {
            return Err(LookupError::NotFound);
        }
        if page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
        {
            return Err(LookupError::Ambiguous { options: titles });
        }

        match page.extract {
            Some(extract) if !extract.trim().is_empty() => {
                Ok(truncate_sentences(extract.trim(), SUMMARY_SENTENCES))
            }
            _ => Err(LookupError::NotFound),
        }
    }
}

/// Cut `text` after `limit` sentence terminators. A terminator only counts
/// when followed by whitespace or end of text, so decimals and version
/// numbers pass through.
fn truncate_sentences(text: &str, limit: usize) -> String {
    let mut count = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, '.' | '!' | '?') {
            let end = idx + ch.len_utf8();
            let next = text[end..].chars().next();
            if next.map_or(true, char::is_whitespace) {
                count += 1;
                if count == limit {
                    return text[..end].to_string();
                }
            }
        }
    }
    text.to_string()
}

// ============================================================================
// MediaWiki API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    query: Option<SearchResults>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    #[serde(default)]
    query: Option<ExtractResults>,
}

#[derive(Debug, Deserialize)]
struct ExtractResults {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
    #[serde(default)]
    missing: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_two_sentences() {
        let text = "First sentence. Second sentence. Third sentence.";
        assert_eq!(
            truncate_sentences(text, 2),
            "First sentence. Second sentence."
        );
    }

    #[test]
    fn shorter_text_is_returned_whole() {
        assert_eq!(
            truncate_sentences("Only one sentence.", 2),
            "Only one sentence."
        );
    }

    #[test]
    fn decimal_points_do_not_end_sentences() {
        let text = "Version 2.0 shipped early. It worked. It was fast.";
        assert_eq!(
            truncate_sentences(text, 2),
            "Version 2.0 shipped early. It worked."
        );
    }

    #[test]
    fn question_marks_terminate_sentences() {
        assert_eq!(truncate_sentences("Is it? Yes. No.", 2), "Is it? Yes.");
    }

    #[test]
    fn parses_search_hits() {
        let body = r#"{"query":{"search":[{"ns":0,"title":"Mercury (planet)"},{"ns":0,"title":"Mercury (element)"}]}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let titles: Vec<String> = parsed
            .query
            .unwrap()
            .search
            .into_iter()
            .map(|hit| hit.title)
            .collect();

        assert_eq!(titles, vec!["Mercury (planet)", "Mercury (element)"]);
    }

    #[test]
    fn parses_disambiguation_marker() {
        let body = r#"{"query":{"pages":{"123":{"pageid":123,"title":"Mercury","extract":"Mercury may refer to:","pageprops":{"disambiguation":""}}}}}"#;
        let parsed: ExtractResponse = serde_json::from_str(body).unwrap();
        let page = parsed.query.unwrap().pages.into_values().next().unwrap();

        assert!(page.pageprops.unwrap().disambiguation.is_some());
    }

    #[test]
    fn parses_missing_page_marker() {
        let body = r#"{"query":{"pages":{"-1":{"title":"Nope","missing":""}}}}"#;
        let parsed: ExtractResponse = serde_json::from_str(body).unwrap();
        let page = parsed.query.unwrap().pages.into_values().next().unwrap();

        assert!(page.missing.is_some());
        assert!(page.extract.is_none());
    }
}
