use anyhow::Context;
use async_trait::async_trait;
use thirtyfour::{prelude::*, ChromiumLikeCapabilities};

use super::PageRender;

/// Headless Chrome behind a WebDriver server. Each call gets its own browser
/// session, which is quit before the call returns.
pub struct Droid {
    webdriver_url: String,
}

impl Droid {
    pub fn new(webdriver_url: String) -> Self {
        Droid { webdriver_url }
    }

    pub async fn get_url_text(&self, url: &str) -> anyhow::Result<String> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless()?;
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;

        let driver = WebDriver::new(self.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("Failed to connect to WebDriver at {}", self.webdriver_url))?;

        let result = async {
            driver
                .goto(url)
                .await
                .with_context(|| format!("Failed to navigate to {}", url))?;

            let body = driver
                .query(By::Tag("body"))
                .first()
                .await
                .context("Failed to find body element")?;

            body.text().await.context("Failed to read body text")
        }
        .await;

        if let Err(e) = driver.quit().await {
            log::error!("Failed to quit browser session: {:?}", e);
        }

        result
    }
}

#[async_trait]
impl PageRender for Droid {
    async fn rendered_text(&self, url: &str) -> anyhow::Result<String> {
        self.get_url_text(url).await
    }
}
