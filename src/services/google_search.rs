use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::domain::org_domain::{
    build_board_search_query, build_official_website_query, extract_domain,
};

use super::{CandidateSearch, ContentFetcher};

pub const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

/// Google Custom Search JSON API, first result page only.
pub struct GoogleSearchClient {
    fetcher: ContentFetcher,
    base_url: String,
    api_key: String,
    engine_id: String,
}

impl GoogleSearchClient {
    pub fn new(
        fetcher: ContentFetcher,
        base_url: String,
        api_key: String,
        engine_id: String,
    ) -> Self {
        GoogleSearchClient {
            fetcher,
            base_url,
            api_key,
            engine_id,
        }
    }

    /// Result links in relevance order. A failed call or a response without
    /// `items` gives an empty list.
    pub async fn search(&self, query: &str) -> Vec<String> {
        let endpoint = format!("{}/customsearch/v1", self.base_url.trim_end_matches('/'));
        let url = match Url::parse_with_params(
            &endpoint,
            &[
                ("cx", self.engine_id.as_str()),
                ("key", self.api_key.as_str()),
                ("q", query),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Invalid search endpoint {}. Error: {:?}", endpoint, e);
                return vec![];
            }
        };

        match self.fetcher.get_url_json::<SearchResponse>(url.as_str()).await {
            Some(SearchResponse { items: Some(items) }) => {
                items.into_iter().map(|item| item.link).collect()
            }
            Some(SearchResponse { items: None }) => {
                log::error!("Found no results on query: {}", query);
                vec![]
            }
            None => vec![],
        }
    }

    /// Hostname of the top "official website" hit, without `www.`.
    pub async fn get_company_domain(&self, name: &str) -> Option<String> {
        let links = self.search(&build_official_website_query(name)).await;
        let link = links.first()?;
        extract_domain(link)
    }

    /// Candidate board pages. With `org_domain_only` the search is scoped to
    /// the organization's own host, and no host means no candidates.
    pub async fn get_likely_board_urls(&self, name: &str, org_domain_only: bool) -> Vec<String> {
        let domain = match org_domain_only {
            true => match self.get_company_domain(name).await {
                Some(domain) => Some(domain),
                None => {
                    log::error!("Could not resolve a website for {}", name);
                    return vec![];
                }
            },
            false => None,
        };

        let query = build_board_search_query(name, domain.as_deref());
        log::info!("{}", query);

        self.search(&query).await
    }
}

#[async_trait]
impl CandidateSearch for GoogleSearchClient {
    async fn likely_board_urls(&self, name: &str, org_domain_only: bool) -> Vec<String> {
        self.get_likely_board_urls(name, org_domain_only).await
    }
}
