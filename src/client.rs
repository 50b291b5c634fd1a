//! Radar service client.
//!
//! The service answers a time-window query with the grid's geographic corner
//! polygon, the pixel bounding box of the grid and one compressed record per
//! five-minute step.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{RadarError, Result};

/// One time step as delivered by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarRecord {
    /// ISO-8601 timestamp of the step
    pub timestamp: String,
    /// Base64 encoded zlib stream of little-endian `u16` samples
    pub precipitation_5: String,
}

/// Corner polygon of the returned grid, as `[lon, lat]` points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseGeometry {
    #[serde(default)]
    pub coordinates: Vec<Vec<f64>>,
}

/// Full response for one query window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarResponse {
    /// Geographic corners: top-left, top-right, bottom-right, bottom-left
    #[serde(default)]
    pub geometry: Option<ResponseGeometry>,
    /// Pixel bounding box `[top, left, bottom, right]`, inclusive
    #[serde(default)]
    pub bbox: Option<Vec<i64>>,
    /// Records in chronological order
    #[serde(default)]
    pub radar: Vec<RadarRecord>,
}

/// Time window of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Window starting at `start` and spanning `minutes`
    pub fn starting_at(start: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    /// Window starting now
    pub fn from_now(minutes: u32) -> Self {
        Self::starting_at(Utc::now(), minutes)
    }

    /// Start formatted the way the service expects
    pub fn start_param(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// End formatted the way the service expects
    pub fn end_param(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Anything that can produce radar responses for a time window
#[async_trait]
pub trait RadarSource: Send + Sync {
    /// Fetch all records inside the window
    async fn fetch(&self, window: &QueryWindow) -> Result<RadarResponse>;
}

/// HTTP client for the Bright Sky radar endpoint
pub struct BrightSkyClient {
    client: Client,
    config: SourceConfig,
    lat: f64,
    lon: f64,
}

impl BrightSkyClient {
    /// Create a client for a fixed location
    pub fn new(config: SourceConfig, lat: f64, lon: f64) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            lat,
            lon,
        })
    }

    /// Query parameters for a window
    pub fn query_params(&self, window: &QueryWindow) -> Vec<(&'static str, String)> {
        vec![
            ("tz", self.config.timezone.clone()),
            ("lat", self.lat.to_string()),
            ("lon", self.lon.to_string()),
            ("distance", self.config.distance_m.to_string()),
            ("date", window.start_param()),
            ("last_date", window.end_param()),
        ]
    }

    fn endpoint(&self) -> String {
        format!("{}/radar", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl RadarSource for BrightSkyClient {
    async fn fetch(&self, window: &QueryWindow) -> Result<RadarResponse> {
        let url = self.endpoint();
        debug!(url = %url, start = %window.start_param(), end = %window.end_param(), "Fetching radar data");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(window))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RadarError::Fetch {
                message: format!("radar service returned HTTP {}", status),
            });
        }

        response.json::<RadarResponse>().await.map_err(|e| RadarError::Fetch {
            message: format!("invalid response body: {}", e),
        })
    }
}
