//! Synthetic radar responses and scripted sources.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;

use regenradar::client::{QueryWindow, RadarRecord, RadarResponse, RadarSource, ResponseGeometry};
use regenradar::decoder::encode_grid;
use regenradar::{Config, RadarError, Result};

/// Corners of a small area around Kassel, clockwise from the top left
pub fn corners() -> Vec<Vec<f64>> {
    vec![
        vec![9.3, 51.4],
        vec![9.6, 51.4],
        vec![9.6, 51.2],
        vec![9.3, 51.2],
    ]
}

/// A record holding the given samples
pub fn record(timestamp: &str, samples: &[u16]) -> RadarRecord {
    RadarRecord {
        timestamp: timestamp.to_string(),
        precipitation_5: encode_grid(samples).unwrap(),
    }
}

/// A record whose payload is not valid base64
pub fn invalid_record(timestamp: &str) -> RadarRecord {
    RadarRecord {
        timestamp: timestamp.to_string(),
        precipitation_5: "not base64!!".to_string(),
    }
}

/// A response over a `[top, left, bottom, right]` pixel box
pub fn response(bbox: [i64; 4], records: Vec<RadarRecord>) -> RadarResponse {
    RadarResponse {
        geometry: Some(ResponseGeometry {
            coordinates: corners(),
        }),
        bbox: Some(bbox.to_vec()),
        radar: records,
    }
}

/// Three 2x2 records, five minutes apart
pub fn three_record_response() -> RadarResponse {
    response(
        [0, 0, 1, 1],
        vec![
            record("2024-05-01T14:00:00+02:00", &[0, 5, 50, 250]),
            record("2024-05-01T14:05:00+02:00", &[10, 0, 0, 10]),
            record("2024-05-01T14:10:00+02:00", &[250, 250, 0, 0]),
        ],
    )
}

/// Configuration for widget tests: one refresh per test unless time is advanced
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.card.lat = 51.3;
    config.card.lon = 9.45;
    config.card.autoplay_delay = Some(500);
    config.refresh_interval_secs = 3600;
    config
}

/// Source that replays a queue of results, one per fetch
#[derive(Default)]
pub struct ScriptedSource {
    results: Mutex<VecDeque<Result<RadarResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(results: Vec<Result<RadarResponse>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RadarSource for ScriptedSource {
    async fn fetch(&self, _window: &QueryWindow) -> Result<RadarResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.results.lock().pop_front();
        next.unwrap_or_else(|| {
            Err(RadarError::Fetch {
                message: "no scripted response left".to_string(),
            })
        })
    }
}

/// Source that holds every fetch until released
pub struct GatedSource {
    response: RadarResponse,
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn new(response: RadarResponse) -> Self {
        Self {
            response,
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Let one pending fetch complete
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RadarSource for GatedSource {
    async fn fetch(&self, _window: &QueryWindow) -> Result<RadarResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self.gate.acquire().await.map_err(|e| RadarError::Fetch {
            message: e.to_string(),
        })?;
        permit.forget();
        Ok(self.response.clone())
    }
}
