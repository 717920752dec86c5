//! Configuration types for the slot board service

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_booking_pages")]
    pub booking_pages: Vec<BookingPage>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            booking_pages: default_booking_pages(),
            fetch: FetchConfig::default(),
            refresh: RefreshConfig::default(),
            render: RenderConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// One tracked facility/category on the booking site
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPage {
    pub id: u64,
    pub label: String,
    pub table_id: String,
}

/// Where and how availability is fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub strategy: FetchStrategy,
    /// Look-ahead window in days, today included
    #[serde(default = "default_days")]
    pub days: u32,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            strategy: FetchStrategy::default(),
            days: default_days(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Fetch strategy with tagged enum for extensibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetchStrategy {
    /// First-party endpoint that proxies the booking site
    #[serde(rename = "proxy")]
    Proxy {
        #[serde(default = "default_proxy_base_url")]
        base_url: String,
    },
    /// Booking site API queried directly
    #[serde(rename = "direct")]
    Direct {
        #[serde(default = "default_direct_api_base")]
        api_base: String,
        #[serde(default = "default_merchant")]
        merchant: String,
    },
}

impl Default for FetchStrategy {
    fn default() -> Self {
        FetchStrategy::Proxy {
            base_url: default_proxy_base_url(),
        }
    }
}

impl FetchStrategy {
    pub fn type_name(&self) -> &str {
        match self {
            FetchStrategy::Proxy { .. } => "proxy",
            FetchStrategy::Direct { .. } => "direct",
        }
    }
}

/// Manual refresh gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default = "default_cooldown", with = "humantime_serde")]
    pub cooldown: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cooldown: default_cooldown(),
        }
    }
}

/// Table rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Start times shown as table columns, in display order
    #[serde(default = "default_hours")]
    pub hours: Vec<String>,
    /// Vacancies at or below this count are shown in the danger tier
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,
    #[serde(default = "default_booking_base_url")]
    pub booking_base_url: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hours: default_hours(),
            low_stock_threshold: default_low_stock_threshold(),
            booking_base_url: default_booking_base_url(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Reject configurations the board cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if self.booking_pages.is_empty() {
            return Err(crate::SlotBoardError::Config(
                "At least one booking page is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for page in &self.booking_pages {
            if !seen.insert(page.id) {
                return Err(crate::SlotBoardError::Config(format!(
                    "Duplicate booking page id {}",
                    page.id
                )));
            }
        }
        if self.fetch.days == 0 {
            return Err(crate::SlotBoardError::Config(
                "fetch.days must be at least 1".to_string(),
            ));
        }
        if self.refresh.cooldown.is_zero() {
            return Err(crate::SlotBoardError::Config(
                "refresh.cooldown must be greater than zero".to_string(),
            ));
        }
        if self.render.hours.is_empty() {
            return Err(crate::SlotBoardError::Config(
                "render.hours must not be empty".to_string(),
            ));
        }
        if let FetchStrategy::Proxy { base_url } = &self.fetch.strategy {
            if let Err(e) = reqwest::Url::parse(base_url) {
                return Err(crate::SlotBoardError::Config(format!(
                    "fetch.strategy.base_url '{}' is not a valid URL: {}",
                    base_url, e
                )));
            }
        }
        Ok(())
    }
}

fn default_booking_pages() -> Vec<BookingPage> {
    vec![
        BookingPage {
            id: 923258,
            label: "区民外".to_string(),
            table_id: "slots-body-out".to_string(),
        },
        BookingPage {
            id: 625571,
            label: "区内（豊島区民）".to_string(),
            table_id: "slots-body-in".to_string(),
        },
    ]
}

fn default_days() -> u32 {
    15
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_proxy_base_url() -> String {
    "http://localhost/wp-json/onthe6ks/v1/kidspark/slots".to_string()
}

fn default_direct_api_base() -> String {
    "https://coubic.com/api/v2".to_string()
}

fn default_merchant() -> String {
    "toshima-kidspark".to_string()
}

fn default_cooldown() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_hours() -> Vec<String> {
    ["10:00", "11:00", "12:00", "13:00", "14:00", "15:00"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_low_stock_threshold() -> u32 {
    5
}

fn default_booking_base_url() -> String {
    "https://coubic.com/toshima-kidspark".to_string()
}

fn default_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SlotBoardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
