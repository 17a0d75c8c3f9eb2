use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};
use tokio::{
    net::TcpStream,
    process::{Child, Command},
    time::Instant,
};
use url::Url;

use crate::configuration::BrowserSettings;

use super::{PageSourceError, RenderedPageSource, SessionLauncher};

const DRIVER_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A Chrome session driven over WebDriver, optionally together with the
/// driver process that serves it.
pub struct Droid {
    driver: Option<WebDriver>,
    driver_process: Option<Child>,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> Result<Self, PageSourceError> {
        let driver_process = match settings.driver_path {
            Some(ref path) => Some(spawn_driver(&path.to_string_lossy(), settings).await?),
            None => None,
        };

        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.add_arg("--headless=new")?;
        }

        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;
        if let Err(e) = driver.maximize_window().await {
            log::warn!("Could not maximize browser window: {:?}", e);
        }

        Ok(Droid {
            driver: Some(driver),
            driver_process,
        })
    }

    fn driver(&self) -> Result<&WebDriver, PageSourceError> {
        self.driver.as_ref().ok_or(PageSourceError::SessionClosed)
    }
}

#[async_trait]
impl RenderedPageSource for Droid {
    async fn navigate(&mut self, url: &Url) -> Result<(), PageSourceError> {
        self.driver()?
            .goto(url.as_str())
            .await
            .map_err(|e| PageSourceError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn current_markup(&mut self) -> Result<String, PageSourceError> {
        Ok(self.driver()?.source().await?)
    }

    async fn close(&mut self) -> Result<(), PageSourceError> {
        let quit_result = match self.driver.take() {
            Some(driver) => driver.quit().await.map_err(PageSourceError::from),
            None => Ok(()),
        };

        if let Some(mut process) = self.driver_process.take() {
            if let Err(e) = process.kill().await {
                log::error!("Failed to stop driver process: {:?}", e);
            }
        }

        quit_result
    }
}

pub struct DroidLauncher {
    settings: BrowserSettings,
}

impl DroidLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        DroidLauncher { settings }
    }
}

#[async_trait]
impl SessionLauncher for DroidLauncher {
    type Session = Droid;

    async fn launch(&self) -> Result<Droid, PageSourceError> {
        Droid::new(&self.settings).await
    }
}

/// Starts the driver binary on the endpoint's port and waits until it accepts
/// connections.
async fn spawn_driver(path: &str, settings: &BrowserSettings) -> Result<Child, PageSourceError> {
    let endpoint = Url::parse(&settings.webdriver_url)
        .map_err(|e| PageSourceError::Endpoint(format!("{}: {}", settings.webdriver_url, e)))?;
    let host = endpoint
        .host_str()
        .ok_or_else(|| PageSourceError::Endpoint(settings.webdriver_url.clone()))?
        .to_string();
    let port = endpoint.port_or_known_default().unwrap_or(9515);

    let startup_error = |reason: String| PageSourceError::DriverStartup {
        path: path.to_string(),
        reason,
    };

    log::info!("Starting driver {} on port {}", path, port);
    let mut child = Command::new(path)
        .arg(format!("--port={}", port))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| startup_error(e.to_string()))?;

    let deadline = Instant::now() + settings.startup_timeout();
    loop {
        if TcpStream::connect((host.as_str(), port)).await.is_ok() {
            return Ok(child);
        }
        if let Ok(Some(status)) = child.try_wait() {
            return Err(startup_error(format!("exited early with {}", status)));
        }
        if Instant::now() >= deadline {
            _ = child.kill().await;
            return Err(startup_error(format!(
                "not reachable after {:?}",
                settings.startup_timeout()
            )));
        }
        tokio::time::sleep(DRIVER_POLL_INTERVAL).await;
    }
}
