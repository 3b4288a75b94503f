use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::time::sleep;

use super::RecipeExtractor;
use crate::config::ExtractionConfig;
use crate::data::carbonara_recipe;
use crate::error::ExtractionError;
use crate::model::RecipeDocument;

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})").unwrap());

/// Pull the 11-character video id out of a video URL, if there is one.
pub fn video_id(url: &str) -> Option<&str> {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Stand-in for an AI extraction pipeline.
///
/// Ignores what the URL points at, waits out a fixed latency and always drafts
/// the same carbonara recipe. It never fails.
pub struct SimulatedExtractor {
    delay: Duration,
}

impl SimulatedExtractor {
    pub fn new(config: &ExtractionConfig) -> Self {
        Self::with_delay(Duration::from_millis(config.delay_ms))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedExtractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default())
    }
}

#[async_trait]
impl RecipeExtractor for SimulatedExtractor {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn extract(&self, url: &str) -> Result<RecipeDocument, ExtractionError> {
        match video_id(url) {
            Some(id) => info!("Simulating AI extraction for video {} ({})", id, url),
            None => info!("Simulating AI extraction for: {}", url),
        }

        debug!("Waiting {:?} of simulated latency", self.delay);
        sleep(self.delay).await;

        Ok(carbonara_recipe())
    }
}
