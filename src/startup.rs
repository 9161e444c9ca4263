use std::time::Duration;

use anyhow::Context;

use crate::{
    configuration::Settings,
    services::{BoardDiscovery, ContentFetcher, Droid, GoogleSearchClient, OpenaiClient, TextTruncator},
};

pub type Discovery = BoardDiscovery<GoogleSearchClient, ContentFetcher, Droid, OpenaiClient>;

/// Wires the production collaborators together from `configuration`.
pub fn build_board_discovery(configuration: &Settings) -> anyhow::Result<Discovery> {
    let fetcher = ContentFetcher::new(configuration.fetch.timeout_secs.map(Duration::from_secs))
        .context("Failed to build http client")?;

    let search = GoogleSearchClient::new(
        fetcher.clone(),
        configuration.search.base_url.clone(),
        configuration.api_keys.google_search.clone(),
        configuration.api_keys.google_search_engine_id.clone(),
    );

    let truncator = TextTruncator::for_model(
        &configuration.openai.model,
        configuration.openai.max_context_tokens,
        configuration.openai.reserved_output_tokens,
    )?;
    let openai_client = OpenaiClient::new(
        configuration.api_keys.openai.clone(),
        configuration.openai.api_base.clone(),
        configuration.openai.model.clone(),
        truncator,
    );

    let droid = Droid::new(configuration.webdriver.url.clone());

    Ok(
        BoardDiscovery::new(search, fetcher, droid, openai_client)
            .with_acceptance_threshold(configuration.discovery.acceptance_threshold),
    )
}
