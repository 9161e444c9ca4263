use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::services::{
    ACCEPTANCE_THRESHOLD, GOOGLE_SEARCH_URL, MAX_TOKENS, OPENAI_MODEL, RESERVED_OUTPUT_TOKENS,
};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api_keys: ApiKeys,
    pub search: SearchSettings,
    pub openai: OpenaiSettings,
    pub webdriver: WebdriverSettings,
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub fetch: FetchSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApiKeys {
    pub openai: String,
    pub google_search: String,
    pub google_search_engine_id: String,
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("openai", &"<redacted>")
            .field("google_search", &"<redacted>")
            .field("google_search_engine_id", &self.google_search_engine_id)
            .finish()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SearchSettings {
    pub base_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct OpenaiSettings {
    #[serde(default)]
    pub api_base: Option<String>,
    pub model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_context_tokens: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub reserved_output_tokens: usize,
}

#[derive(Deserialize, Clone, Debug)]
pub struct WebdriverSettings {
    pub url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DiscoverySettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub acceptance_threshold: usize,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct FetchSettings {
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Defaults, then `configuration.yaml` if present, then `APP_*` variables
/// (e.g. `APP_WEBDRIVER__URL`), then the plain api key variables.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    default_settings()?
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("api_keys.openai", std::env::var("OPENAI_API_KEY").ok())?
        .set_override_option(
            "api_keys.google_search",
            std::env::var("GOOGLE_SEARCH_API_KEY").ok(),
        )?
        .set_override_option(
            "api_keys.google_search_engine_id",
            std::env::var("GOOGLE_SEARCH_ENGINE_ID").ok(),
        )?
        .build()?
        .try_deserialize::<Settings>()
}

fn default_settings() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("api_keys.openai", "")?
        .set_default("api_keys.google_search", "")?
        .set_default("api_keys.google_search_engine_id", "")?
        .set_default("search.base_url", GOOGLE_SEARCH_URL)?
        .set_default("openai.model", OPENAI_MODEL)?
        .set_default("openai.max_context_tokens", MAX_TOKENS as u64)?
        .set_default("openai.reserved_output_tokens", RESERVED_OUTPUT_TOKENS as u64)?
        .set_default("webdriver.url", "http://localhost:9515")?
        .set_default("discovery.acceptance_threshold", ACCEPTANCE_THRESHOLD as u64)
}
