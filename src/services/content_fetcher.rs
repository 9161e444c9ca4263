use std::time::Duration;

use async_trait::async_trait;
use fake_user_agent::get_rua as get_rand_user_agent;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::PageFetch;

/// Best-effort HTTP GET. Every failure is logged and turned into `None`.
#[derive(Clone)]
pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(get_rand_user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(ContentFetcher {
            client: builder.build()?,
        })
    }

    pub async fn get_url_text(&self, url: &str) -> Option<String> {
        let res = self.get(url).await?;
        match res.text().await {
            Ok(text) => Some(text),
            Err(e) => {
                log::error!("Error: {}", loggable_url(url));
                log::error!("Failed to read body as text. Error: {:?}", e);
                None
            }
        }
    }

    pub async fn get_url_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let res = self.get(url).await?;
        match res.json::<T>().await {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Error: {}", loggable_url(url));
                log::error!("Error when deserializing to json: {:?}", e);
                None
            }
        }
    }

    async fn get(&self, url: &str) -> Option<Response> {
        match self.client.get(url).send().await {
            Ok(res) if res.status().is_success() => Some(res),
            Ok(res) => {
                let status = res.status();
                log::error!("Error: {}", loggable_url(url));
                log::error!(
                    "Error: {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default()
                );
                None
            }
            Err(e) => {
                log::error!("Error: {}", loggable_url(url));
                log::error!("No response from reqwest, error: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl PageFetch for ContentFetcher {
    async fn fetch_html(&self, url: &str) -> Option<String> {
        self.get_url_text(url).await
    }
}

/// The url with any `key` query parameter masked.
fn loggable_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !parsed.query_pairs().any(|(k, _)| k == "key") {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| match k.as_ref() {
            "key" => (k.into_owned(), "<redacted>".to_string()),
            _ => (k.into_owned(), v.into_owned()),
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);

    parsed.to_string()
}
