pub mod config;
pub mod data;
pub mod editor;
pub mod error;
pub mod export;
pub mod extractors;
pub mod images;
pub mod ingredients;
pub mod model;
pub mod presenter;
pub mod session;

pub use config::Settings;
pub use editor::{Editor, EditorEvent, Notice, NoticeLevel};
pub use error::{EditError, ExportError, ExtractionError, ImageError, RecipeError};
pub use export::{ExportOutcome, ExportPipeline, ExportedFile};
pub use ingredients::{parse_ingredient, scale_ingredient, ParsedIngredient};
pub use model::{Field, ImageSource, Instruction, RecipeDocument, StepField};
pub use presenter::Mode;

use std::path::Path;

use crate::config::ExportConfig;
use crate::extractors::{RecipeExtractor, SimulatedExtractor};

/// Draft a recipe from a video URL with the simulated extraction service.
pub async fn draft_recipe(url: &str, settings: &Settings) -> Result<RecipeDocument, ExtractionError> {
    SimulatedExtractor::new(&settings.extraction).extract(url).await
}

/// Export `document` as a PDF into `output_dir` with default layout settings.
pub async fn export_recipe(
    document: &RecipeDocument,
    output_dir: &Path,
) -> Result<ExportOutcome, ExportError> {
    let config = ExportConfig {
        output_dir: output_dir.to_path_buf(),
        ..ExportConfig::default()
    };
    ExportPipeline::new(config).export(document).await
}
