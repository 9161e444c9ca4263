use async_trait::async_trait;

use crate::domain::{
    board_member::{is_accepted, BoardMember, DiscoveryResult},
    page_text::html_to_text,
};

/// Board lists with this many members or fewer never stop the search early.
pub const ACCEPTANCE_THRESHOLD: usize = 2;

#[async_trait]
pub trait CandidateSearch: Send + Sync {
    async fn likely_board_urls(&self, name: &str, org_domain_only: bool) -> Vec<String>;
}

#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Option<String>;
}

#[async_trait]
pub trait PageRender: Send + Sync {
    async fn rendered_text(&self, url: &str) -> anyhow::Result<String>;
}

#[async_trait]
pub trait BoardExtract: Send + Sync {
    async fn extract_board(
        &self,
        text: &str,
        name: &str,
    ) -> anyhow::Result<Option<Vec<BoardMember>>>;
}

pub struct BoardDiscovery<S, F, R, E> {
    search: S,
    fetcher: F,
    renderer: R,
    extractor: E,
    acceptance_threshold: usize,
}

impl<S, F, R, E> BoardDiscovery<S, F, R, E>
where
    S: CandidateSearch,
    F: PageFetch,
    R: PageRender,
    E: BoardExtract,
{
    pub fn new(search: S, fetcher: F, renderer: R, extractor: E) -> Self {
        BoardDiscovery {
            search,
            fetcher,
            renderer,
            extractor,
            acceptance_threshold: ACCEPTANCE_THRESHOLD,
        }
    }

    pub fn with_acceptance_threshold(mut self, acceptance_threshold: usize) -> Self {
        self.acceptance_threshold = acceptance_threshold;
        self
    }

    /// Walks the search candidates in rank order until one yields an accepted
    /// board list.
    ///
    /// Only the first candidate gets a second, browser-rendered attempt. A
    /// failing extraction or render moves on to the next candidate; the last
    /// such error is returned only if no extraction succeeded at all.
    pub async fn get_board_members(
        &self,
        name: &str,
        org_domain_only: bool,
    ) -> anyhow::Result<DiscoveryResult> {
        let urls = self.search.likely_board_urls(name, org_domain_only).await;
        log::info!("Found possible urls: {:?}", urls);

        let mut result = DiscoveryResult::default();
        let mut extracted_any = false;
        let mut last_error = None;

        for (i, url) in urls.iter().enumerate() {
            result.url = Some(url.clone());
            log::info!("Looking for board members at {}", url);

            let Some(html) = self.fetcher.fetch_html(url).await else {
                continue;
            };

            let text = html_to_text(&html);
            match self.extractor.extract_board(&text, name).await {
                Ok(board) => {
                    extracted_any = true;
                    result.board = board;
                    if is_accepted(&result.board, self.acceptance_threshold) {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Extraction failed at {}. Error: {:?}", url, e);
                    last_error = Some(e);
                }
            }

            if i == 0 {
                log::info!("Trying again with headless browser at {}", url);
                match self.extract_rendered(url, name).await {
                    Ok(board) => {
                        extracted_any = true;
                        result.board = board;
                        if is_accepted(&result.board, self.acceptance_threshold) {
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!("Rendered extraction failed at {}. Error: {:?}", url, e);
                        last_error = Some(e);
                    }
                }
            }
        }

        match last_error {
            Some(e) if !extracted_any => Err(e),
            _ => {
                log::info!(
                    "Finished at {:?} with {} board members",
                    result.url,
                    result.board.as_ref().map_or(0, |b| b.len())
                );
                Ok(result)
            }
        }
    }

    async fn extract_rendered(
        &self,
        url: &str,
        name: &str,
    ) -> anyhow::Result<Option<Vec<BoardMember>>> {
        let text = self.renderer.rendered_text(url).await?;
        self.extractor.extract_board(&text, name).await
    }
}
