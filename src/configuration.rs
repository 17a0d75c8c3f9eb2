use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub scraper: ScraperSettings,
    pub storage: StorageSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    /// Driver binary spawned per session. When absent, `webdriver_url` must
    /// already be served by a running driver.
    #[serde(default)]
    pub driver_path: Option<PathBuf>,
    #[serde(default, deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub startup_timeout_ms: u64,
}

impl BrowserSettings {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScraperSettings {
    pub search_base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub download_limit: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_ms: u64,
    pub search_ready_selector: String,
    pub detail_ready_selector: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub request_timeout_secs: u64,
}

impl ScraperSettings {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct StorageSettings {
    pub data_root: PathBuf,
    pub input_filename: String,
    pub prompt_column: String,
}

impl StorageSettings {
    pub fn input_path(&self) -> PathBuf {
        self.data_root.join(&self.input_filename)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_root.join("images")
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.data_root.join("metadata")
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        config::ConfigError::Message(format!("Failed to determine the current directory: {e}"))
    })?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename)).required(false),
        )
        // e.g. `APP_SCRAPER__DOWNLOAD_LIMIT=10` sets `Settings.scraper.download_limit`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}
