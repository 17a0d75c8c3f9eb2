#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use trawl::{
    configuration::ScraperSettings,
    domain::search_prompt::SearchPrompt,
    services::{
        ArchiveScraper, ImageFetcher, PageSourceError, RenderedPageSource, SessionLauncher,
    },
};
use url::Url;

pub const SEARCH_BASE: &str = "http://archive.test/search?facet=photos&q=";

#[derive(Debug, Default)]
pub struct SiteLog {
    pub visits: Vec<String>,
    pub opened: usize,
    pub closed: usize,
}

/// In-memory archive: canned markup per URL, plus a record of what the
/// crawler did with it.
#[derive(Clone, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    broken: HashSet<String>,
    pub log: Arc<Mutex<SiteLog>>,
}

impl FakeSite {
    pub fn page(mut self, url: &str, markup: String) -> Self {
        self.pages.insert(url.to_string(), markup);
        self
    }

    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.log.lock().unwrap().visits.clone()
    }

    pub fn sessions(&self) -> (usize, usize) {
        let log = self.log.lock().unwrap();
        (log.opened, log.closed)
    }
}

pub struct FakeSession {
    site: FakeSite,
    current: Option<String>,
}

#[async_trait]
impl RenderedPageSource for FakeSession {
    async fn navigate(&mut self, url: &Url) -> Result<(), PageSourceError> {
        self.site.log.lock().unwrap().visits.push(url.to_string());
        if self.site.broken.contains(url.as_str()) {
            return Err(PageSourceError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn current_markup(&mut self) -> Result<String, PageSourceError> {
        Ok(self
            .current
            .as_ref()
            .and_then(|url| self.site.pages.get(url))
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_string()))
    }

    async fn close(&mut self) -> Result<(), PageSourceError> {
        self.site.log.lock().unwrap().closed += 1;
        Ok(())
    }
}

pub struct FakeLauncher {
    pub site: FakeSite,
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> Result<FakeSession, PageSourceError> {
        self.site.log.lock().unwrap().opened += 1;
        Ok(FakeSession {
            site: self.site.clone(),
            current: None,
        })
    }
}

pub fn scraper_settings(download_limit: usize) -> ScraperSettings {
    ScraperSettings {
        search_base_url: SEARCH_BASE.to_string(),
        download_limit,
        settle_timeout_ms: 50,
        poll_interval_ms: 5,
        search_ready_selector: "a.search-result-item-title".to_string(),
        detail_ready_selector: "h3".to_string(),
        request_timeout_secs: 5,
    }
}

pub fn build_scraper(site: &FakeSite, images_dir: PathBuf) -> ArchiveScraper<FakeLauncher> {
    ArchiveScraper::new(
        FakeLauncher { site: site.clone() },
        ImageFetcher::new(Duration::from_secs(5)).unwrap(),
        &scraper_settings(5),
        images_dir,
    )
    .unwrap()
}

pub fn search_url(prompt: &str) -> String {
    SearchPrompt::parse(prompt)
        .unwrap()
        .search_url(SEARCH_BASE)
        .unwrap()
        .to_string()
}

pub fn item_url(n: usize) -> String {
    format!("http://archive.test/item/p{}", n)
}

pub fn results_page(items: &[usize]) -> String {
    let links: String = items
        .iter()
        .map(|n| {
            format!(
                r#"<div class="search-result-item"><a class="search-result-item-title" href="/item/p{n}">Photo {n}</a></div>"#
            )
        })
        .collect();
    format!("<html><body><div class=\"results\">{}</div></body></html>", links)
}

pub fn detail_page(n: usize, image_href: Option<&str>) -> String {
    let download = image_href
        .map(|href| format!(r#"<a class="large-download" href="{}">Full-size image</a>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <h1>Photo {n}</h1>
            {download}
            <h3>Description</h3>
            <dl><dt>Title</dt><dd>Photo {n}</dd><dt>Creator</dt><dd>Unknown</dd></dl>
            <h3>Date</h3>
            <dl><dt>Date Created</dt><dd>19{n:02}</dd></dl>
        </body></html>"#
    )
}
