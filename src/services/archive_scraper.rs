use std::{path::PathBuf, time::Duration};

use scraper::Selector;
use url::Url;

use crate::{
    configuration::ScraperSettings,
    domain::{
        detail_page::find_full_size_image,
        metadata::{extract_metadata, MetadataTable},
        result_link::extract_result_links,
        search_prompt::SearchPrompt,
    },
};

use super::{markup_when_ready, ImageFetcher, PageSourceError, RenderedPageSource, SessionLauncher};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    PageSource(#[from] PageSourceError),

    #[error("Invalid search URL: {0}")]
    SearchUrl(#[from] url::ParseError),

    #[error("Invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

struct PageTimings {
    settle_timeout: Duration,
    poll_interval: Duration,
}

/// Crawls the archive search for one prompt at a time: results page, then
/// each result's detail page, downloading full-size images until the limit is
/// used up.
pub struct ArchiveScraper<L: SessionLauncher> {
    launcher: L,
    fetcher: ImageFetcher,
    search_base_url: String,
    search_ready: Selector,
    detail_ready: Selector,
    timings: PageTimings,
    images_dir: PathBuf,
}

impl<L: SessionLauncher> ArchiveScraper<L> {
    pub fn new(
        launcher: L,
        fetcher: ImageFetcher,
        settings: &ScraperSettings,
        images_dir: PathBuf,
    ) -> Result<Self, ScrapeError> {
        Ok(ArchiveScraper {
            launcher,
            fetcher,
            search_base_url: settings.search_base_url.clone(),
            search_ready: parse_selector(&settings.search_ready_selector)?,
            detail_ready: parse_selector(&settings.detail_ready_selector)?,
            timings: PageTimings {
                settle_timeout: settings.settle_timeout(),
                poll_interval: settings.poll_interval(),
            },
            images_dir,
        })
    }

    /// Runs one crawl in a fresh browser session. The session is closed
    /// whether or not the crawl succeeds.
    pub async fn run(
        &self,
        prompt: &SearchPrompt,
        download_limit: usize,
    ) -> Result<MetadataTable, ScrapeError> {
        let search_url = prompt.search_url(&self.search_base_url)?;

        let mut session = self.launcher.launch().await?;
        let result = self
            .crawl(&mut session, prompt, &search_url, download_limit)
            .await;

        if let Err(e) = session.close().await {
            log::error!("Failed to close browser session for {}: {:?}", prompt, e);
        }

        result
    }

    async fn crawl<S: RenderedPageSource>(
        &self,
        session: &mut S,
        prompt: &SearchPrompt,
        search_url: &Url,
        download_limit: usize,
    ) -> Result<MetadataTable, ScrapeError> {
        log::info!("Loading main page: {}", search_url);
        let markup = self.load(session, search_url, &self.search_ready).await?;

        let results = extract_result_links(&markup, search_url);
        log::info!("Found {} results for prompt {}", results.len(), prompt);

        let directory = self.images_dir.join(prompt.file_stem());
        let mut table = MetadataTable::new();
        let mut downloads = 0;

        for result in results {
            if downloads >= download_limit {
                log::info!(
                    "Reached the limit of {} images for prompt {}",
                    download_limit,
                    prompt
                );
                break;
            }

            log::info!("Navigating to: {}", result.url);
            let page = self.load(session, &result.url, &self.detail_ready).await?;

            table.append_stamped(&result.title, extract_metadata(&page));

            match find_full_size_image(&page, &result.url) {
                Some(image_url) => {
                    log::info!("Found image URL: {}", image_url);
                    // Counts as an attempt whether or not the download succeeds.
                    self.fetcher
                        .fetch_and_save(&image_url, &result.title, &directory)
                        .await;
                    downloads += 1;
                    log::info!(
                        "Progress: Downloaded {}/{} images.",
                        downloads,
                        download_limit
                    );
                }
                None => {
                    log::info!("No 'Full-size image' link found on page: {}", result.url);
                }
            }
        }

        log::info!(
            "Finished prompt {} with {} metadata records",
            prompt,
            table.len()
        );

        Ok(table)
    }

    async fn load<S: RenderedPageSource>(
        &self,
        session: &mut S,
        url: &Url,
        ready: &Selector,
    ) -> Result<String, PageSourceError> {
        session.navigate(url).await?;
        markup_when_ready(
            session,
            ready,
            self.timings.settle_timeout,
            self.timings.poll_interval,
        )
        .await
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::Selector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}
