use std::{path::PathBuf, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::{deserialize_bool_from_anything, deserialize_number_from_string};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
    pub site: SiteSettings,
    pub timeouts: TimeoutSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebDriverSettings {
    pub server_url: String,
    #[serde(deserialize_with = "deserialize_bool_from_anything")]
    pub headless: bool,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_width: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_height: u32,
}

impl Default for WebDriverSettings {
    fn default() -> Self {
        WebDriverSettings {
            server_url: "http://localhost:4444".to_string(),
            headless: false,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub entry_url: String,
    /// Tried in order; the first one present on the page takes the query.
    pub query_inputs: Vec<String>,
    /// The first match is the results table.
    pub results_table: String,
    /// Rows of that table, looked up from the table element.
    pub results_rows: String,
    pub next_label: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            entry_url: "https://jobs.example.com/search".to_string(),
            query_inputs: vec![
                r#"input[name="keywords"]"#.to_string(),
                r#"input[type="text"]"#.to_string(),
                r#"input[type="search"]"#.to_string(),
                "input:not([type])".to_string(),
            ],
            results_table: "table".to_string(),
            results_rows: ":scope > thead > tr, :scope > tbody > tr, :scope > tr".to_string(),
            next_label: "Next".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimeoutSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_load_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub navigation_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub settle_millis: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_millis: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        TimeoutSettings {
            page_load_secs: 30,
            navigation_secs: 15,
            settle_millis: 3000,
            poll_millis: 250,
        }
    }
}

impl TimeoutSettings {
    pub fn page_load(&self) -> Duration {
        Duration::from_secs(self.page_load_secs)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_secs(self.navigation_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_millis)
    }

    pub fn poll(&self) -> Duration {
        // A zero interval would spin the runtime.
        Duration::from_millis(self.poll_millis.max(10))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub report_name: String,
    pub backup_name: String,
    pub snapshot_name: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: PathBuf::from("output"),
            report_name: "jobs.csv".to_string(),
            backup_name: "jobs.json".to_string(),
            snapshot_name: "entry_page.png".to_string(),
        }
    }
}

impl OutputSettings {
    pub fn report_path(&self) -> PathBuf {
        self.directory.join(&self.report_name)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.directory.join(&self.backup_name)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.directory.join(&self.snapshot_name)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to read current dir: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let settings = config::Config::builder()
        .add_source(
            config::File::from(configuration_directory.join("base.yaml")).required(false),
        )
        // e.g. `APP_WEBDRIVER__SERVER_URL=http://chrome:4444` sets `webdriver.server_url`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
