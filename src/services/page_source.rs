use std::time::Duration;

use async_trait::async_trait;
use scraper::Selector;
use thirtyfour::error::WebDriverError;
use tokio::time::Instant;
use url::Url;

use crate::domain::html_tag::contains_match;

#[derive(Debug, thiserror::Error)]
pub enum PageSourceError {
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("Failed to load {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Failed to start driver {path}: {reason}")]
    DriverStartup { path: String, reason: String },

    #[error("Invalid WebDriver endpoint {0}")]
    Endpoint(String),

    #[error("Browser session already closed")]
    SessionClosed,
}

/// A browser session that renders pages client side. The session is owned by
/// one crawl and must be closed when the crawl ends.
#[async_trait]
pub trait RenderedPageSource: Send {
    async fn navigate(&mut self, url: &Url) -> Result<(), PageSourceError>;

    async fn current_markup(&mut self) -> Result<String, PageSourceError>;

    async fn close(&mut self) -> Result<(), PageSourceError>;
}

/// Opens a fresh session for each crawl.
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: RenderedPageSource;

    async fn launch(&self) -> Result<Self::Session, PageSourceError>;
}

/// Polls the rendered markup until `ready` matches or `timeout` elapses and
/// returns the last markup read. Running out of time is not an error, the
/// caller parses whatever has rendered by then.
pub async fn markup_when_ready<S: RenderedPageSource>(
    source: &mut S,
    ready: &Selector,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<String, PageSourceError> {
    let deadline = Instant::now() + timeout;

    loop {
        let markup = source.current_markup().await?;
        if contains_match(&markup, ready) {
            return Ok(markup);
        }
        if Instant::now() + poll_interval > deadline {
            log::warn!(
                "Page not ready after {:?}, reading it as rendered so far",
                timeout
            );
            return Ok(markup);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use scraper::Selector;
    use url::Url;

    use super::{markup_when_ready, PageSourceError, RenderedPageSource};

    /// Renders `pending` for the first `renders_before_ready` reads.
    struct SlowPage {
        reads: usize,
        renders_before_ready: usize,
    }

    #[async_trait]
    impl RenderedPageSource for SlowPage {
        async fn navigate(&mut self, _url: &Url) -> Result<(), PageSourceError> {
            Ok(())
        }

        async fn current_markup(&mut self) -> Result<String, PageSourceError> {
            self.reads += 1;
            match self.reads > self.renders_before_ready {
                true => Ok("<h3>Description</h3><dl></dl>".to_string()),
                false => Ok("<p>Loading...</p>".to_string()),
            }
        }

        async fn close(&mut self) -> Result<(), PageSourceError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn markup_when_ready_polls_until_marker() {
        let mut page = SlowPage {
            reads: 0,
            renders_before_ready: 2,
        };
        let ready = Selector::parse("h3").unwrap();

        let markup = markup_when_ready(
            &mut page,
            &ready,
            Duration::from_secs(5),
            Duration::from_millis(1),
        )
        .await
        .unwrap();

        assert!(markup.contains("Description"));
        assert_eq!(page.reads, 3);
    }

    #[tokio::test]
    async fn markup_when_ready_returns_partial_markup_on_timeout() {
        let mut page = SlowPage {
            reads: 0,
            renders_before_ready: usize::MAX,
        };
        let ready = Selector::parse("h3").unwrap();

        let markup = markup_when_ready(
            &mut page,
            &ready,
            Duration::from_millis(30),
            Duration::from_millis(5),
        )
        .await
        .unwrap();

        assert_eq!(markup, "<p>Loading...</p>");
        assert!(page.reads >= 1);
    }
}
