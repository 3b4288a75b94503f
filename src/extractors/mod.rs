mod simulated;

pub use simulated::{video_id, SimulatedExtractor};

use async_trait::async_trait;

use crate::error::ExtractionError;
use crate::model::RecipeDocument;

/// Source of replacement recipes drafted from a pasted URL
#[async_trait]
pub trait RecipeExtractor: Send + Sync {
    /// Get the extractor name (e.g., "simulated")
    fn name(&self) -> &str;

    /// Produce a complete recipe for `url`
    async fn extract(&self, url: &str) -> Result<RecipeDocument, ExtractionError>;
}
