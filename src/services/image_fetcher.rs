use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Client;
use tokio::{fs, io::AsyncWriteExt};
use url::Url;

use crate::domain::file_name::file_stem;

use super::resolve_unique_path;

#[derive(Debug, thiserror::Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(ImageFetcher { client })
    }

    /// Downloads `image_url` into `{directory}/{title}.png`, or the next free
    /// numbered variant of it. Failures are logged and reported as `None`.
    pub async fn fetch_and_save(
        &self,
        image_url: &Url,
        title: &str,
        directory: &Path,
    ) -> Option<PathBuf> {
        match self.try_fetch_and_save(image_url, title, directory).await {
            Ok(path) => {
                log::info!("Image saved as {}", path.display());
                Some(path)
            }
            Err(FetchError::Status(status)) => {
                log::error!("Failed to download image: {} ({})", image_url, status);
                None
            }
            Err(e) => {
                log::error!("Error downloading image {}: {:?}", image_url, e);
                None
            }
        }
    }

    async fn try_fetch_and_save(
        &self,
        image_url: &Url,
        title: &str,
        directory: &Path,
    ) -> Result<PathBuf, FetchError> {
        fs::create_dir_all(directory).await?;

        let image_path = resolve_unique_path(&directory.join(image_file_name(title)));

        let mut response = self.client.get(image_url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let mut file = fs::File::create(&image_path).await?;
        let written = async {
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok::<(), FetchError>(())
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(remove_error) = fs::remove_file(&image_path).await {
                log::error!(
                    "Could not remove partial download {}: {:?}",
                    image_path.display(),
                    remove_error
                );
            }
            return Err(e);
        }

        Ok(image_path)
    }
}

/// `{title}.png` with characters that cannot appear in a file name replaced.
pub fn image_file_name(title: &str) -> String {
    match file_stem(title) {
        stem if stem.is_empty() => "untitled.png".to_string(),
        stem => format!("{}.png", stem),
    }
}
