use std::path::PathBuf;

use anyhow::Context;

use crate::{
    configuration::Settings,
    services::{ArchiveScraper, BatchDriver, BatchReport, DroidLauncher, ImageFetcher},
};

pub struct Application {
    batch_driver: BatchDriver<DroidLauncher>,
    prompt_source: PathBuf,
}

impl Application {
    pub fn build(configuration: Settings) -> anyhow::Result<Self> {
        let fetcher = ImageFetcher::new(configuration.scraper.request_timeout())
            .context("Failed to build HTTP client")?;
        let launcher = DroidLauncher::new(configuration.browser.clone());

        let scraper = ArchiveScraper::new(
            launcher,
            fetcher,
            &configuration.scraper,
            configuration.storage.images_dir(),
        )
        .context("Invalid scraper configuration")?;

        let batch_driver = BatchDriver::new(
            scraper,
            configuration.scraper.download_limit,
            configuration.storage.prompt_column.clone(),
            configuration.storage.metadata_dir(),
        );

        Ok(Application {
            batch_driver,
            prompt_source: configuration.storage.input_path(),
        })
    }

    pub async fn run_until_done(self) -> anyhow::Result<BatchReport> {
        self.batch_driver.run_batch(&self.prompt_source).await
    }
}
