use thiserror::Error;

/// Errors raised by document edit operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The editor is in view mode
    #[error("Recipe is read-only in view mode; switch to edit mode first")]
    ReadOnly,

    /// A list index did not refer to an existing entry
    #[error("No {list} entry at position {index} (list has {len})")]
    IndexOutOfRange {
        list: &'static str,
        index: usize,
        len: usize,
    },

    /// The servings field does not hold a whole number
    #[error("Servings '{0}' is not a whole number")]
    InvalidServings(String),

    /// Supplied image bytes were rejected
    #[error("Image rejected: {0}")]
    Image(#[from] ImageError),
}

/// Errors raised while accepting a user-supplied image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// Failed to read the image file
    #[error("Failed to read image file: {0}")]
    Read(String),

    /// The bytes are not in a recognised image format
    #[error("Could not detect image format")]
    UnknownFormat,

    /// The format was detected but is not accepted
    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),

    /// The data looks like an image but does not decode
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The image is larger than allowed
    #[error("Image is {size} bytes, more than the {max} byte limit")]
    TooLarge { size: usize, max: usize },
}

/// Errors that can occur while drafting a recipe from a URL
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The extractor could not produce a recipe for this source
    #[error("Failed to extract recipe from '{url}': {reason}")]
    Failed { url: String, reason: String },

    /// The background task running the extraction died
    #[error("Extraction task failed: {0}")]
    Task(String),
}

/// Errors that can occur while exporting the recipe to PDF
#[derive(Error, Debug)]
pub enum ExportError {
    /// The laid-out document has no height to render
    #[error("Nothing to render: laid-out document is empty")]
    EmptyRender,

    /// Rasterization of the display list failed
    #[error("Rasterization failed: {0}")]
    Raster(String),

    /// Assembling the PDF document failed
    #[error("PDF assembly failed: {0}")]
    Pdf(String),

    /// Writing the output file failed
    #[error("Failed to write PDF: {0}")]
    Io(#[from] std::io::Error),

    /// The background render task died
    #[error("Render task failed: {0}")]
    Task(String),
}

/// Top-level errors for the interactive session
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Terminal input/output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
