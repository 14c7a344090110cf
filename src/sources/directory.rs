//! HTML catalog source
//!
//! Scrapes an MCP directory page with configured CSS selectors and keeps
//! listings sharing keywords with the use case.

use super::traits::*;
use crate::config::SourceConfig;
use crate::network::HttpClient;
use crate::results::ResultRecord;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Keywords used to fill the `{query}` placeholder
const MAX_QUERY_KEYWORDS: usize = 5;

const STOP_WORDS: &[&str] = &[
    "able", "about", "also", "been", "case", "could", "description", "does", "each", "from",
    "have", "into", "just", "like", "make", "more", "most", "need", "needs", "only", "other",
    "over", "should", "some", "such", "than", "that", "their", "them", "then", "there", "these",
    "they", "this", "title", "those", "through", "using", "very", "want", "well", "what", "when",
    "where", "which", "while", "will", "with", "within", "would", "your",
];

/// Lowercase words of four or more letters, minus stop words, first occurrence kept
pub fn keywords(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
    {
        if word.chars().count() < 4 || STOP_WORDS.contains(&word.as_str()) {
            continue;
        }
        if !words.contains(&word) {
            words.push(word);
        }
    }
    words
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {:?}", css, e))
}

/// One listing scraped from the page
#[derive(Debug, Clone)]
struct Listing {
    name: String,
    description: String,
    url: String,
    matched: Vec<String>,
}

/// Catalog page scraped with CSS selectors
pub struct DirectorySource {
    name: String,
    url: String,
    item: Selector,
    title: Selector,
    description: Selector,
    link: Option<Selector>,
    result_limit: usize,
    http: HttpClient,
}

impl DirectorySource {
    pub fn new(config: &SourceConfig, http: HttpClient) -> Result<Self> {
        let url = config
            .url
            .clone()
            .ok_or_else(|| anyhow!("Source '{}' has no url", config.name))?;

        Ok(Self {
            name: config.name.clone(),
            url,
            item: selector(&config.item_selector)?,
            title: selector(&config.name_selector)?,
            description: selector(&config.description_selector)?,
            link: config.link_selector.as_deref().map(selector).transpose()?,
            result_limit: config.result_limit,
            http,
        })
    }

    fn page_url(&self, keywords: &[String]) -> String {
        let query = keywords
            .iter()
            .take(MAX_QUERY_KEYWORDS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        self.url.replace("{query}", &urlencoding::encode(&query))
    }

    fn parse_listings(&self, html: &str, base: &Url, keywords: &[String]) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for element in document.select(&self.item) {
            let title = match element.select(&self.title).next() {
                Some(t) => t,
                None => continue,
            };
            let name = collapse(title);
            if name.is_empty() {
                continue;
            }

            let description = element
                .select(&self.description)
                .next()
                .map(collapse)
                .unwrap_or_default();

            let href = match &self.link {
                Some(link) => element.select(link).next().and_then(|a| a.value().attr("href")),
                None => title.value().attr("href"),
            };
            let url = match href.and_then(|h| base.join(h.trim()).ok()) {
                Some(url) => url.to_string(),
                None => {
                    debug!("Skipping '{}' without a link", name);
                    continue;
                }
            };

            let haystack = format!("{} {}", name, description).to_lowercase();
            let matched: Vec<String> = keywords
                .iter()
                .filter(|k| haystack.contains(k.as_str()))
                .cloned()
                .collect();
            if matched.is_empty() {
                continue;
            }

            listings.push(Listing {
                name,
                description,
                url,
                matched,
            });
        }

        // Stable: equally relevant listings keep page order
        listings.sort_by(|a, b| b.matched.len().cmp(&a.matched.len()));
        listings.truncate(self.result_limit);
        listings
    }
}

fn collapse(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SourceHandler for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn about(&self) -> SourceAbout {
        let website = Url::parse(&self.url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| self.url.clone());
        SourceAbout::new()
            .website(website)
            .official_api(false)
            .results_format("HTML")
    }

    async fn search(&self, use_case_description: &str) -> Result<Vec<ResultRecord>> {
        let keywords = keywords(use_case_description);
        if keywords.is_empty() {
            debug!("No keywords in use case, skipping {}", self.name);
            return Ok(vec![]);
        }

        let page_url = self.page_url(&keywords);
        let response = self
            .http
            .get(&page_url)
            .await
            .with_context(|| format!("Failed to fetch {}", page_url))?;
        if !response.is_success() {
            return Err(anyhow!("HTTP error: {}", response.status));
        }

        let base = Url::parse(&response.url).or_else(|_| Url::parse(&page_url))?;
        let listings = self.parse_listings(&response.text, &base, &keywords);
        debug!("{} matched {} listings", self.name, listings.len());

        Ok(listings
            .into_iter()
            .map(|listing| {
                let mut record = ResultRecord::new(listing.name, listing.url)
                    .with_description(listing.description)
                    .with_reasoning(format!("Matched keywords: {}", listing.matched.join(", ")));
                record.source_name = self.name.clone();
                record
            })
            .collect())
    }
}
