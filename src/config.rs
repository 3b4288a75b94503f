use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Settings for the editor session
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// PDF export configuration
    #[serde(default)]
    pub export: ExportConfig,
    /// Recipe extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Configuration for the PDF export pipeline
#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Logical width (px) the document is laid out at before rasterizing.
    /// Independent of the terminal the session runs in.
    #[serde(default = "default_render_width")]
    pub render_width: u32,
    /// Supersampling factor applied when rasterizing
    #[serde(default = "default_supersample")]
    pub supersample: u32,
    /// Output page width in millimetres
    #[serde(default = "default_page_width_mm")]
    pub page_width_mm: f32,
    /// Output page height in millimetres
    #[serde(default = "default_page_height_mm")]
    pub page_height_mm: f32,
    /// Directory exported PDFs are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            render_width: default_render_width(),
            supersample: default_supersample(),
            page_width_mm: default_page_width_mm(),
            page_height_mm: default_page_height_mm(),
            output_dir: default_output_dir(),
        }
    }
}

/// Configuration for the recipe extraction service
#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Simulated latency of the extraction call in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
        }
    }
}

// Default value functions
fn default_render_width() -> u32 {
    1000
}

fn default_supersample() -> u32 {
    2
}

// A4 portrait
fn default_page_width_mm() -> f32 {
    210.0
}

fn default_page_height_mm() -> f32 {
    297.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_delay_ms() -> u64 {
    2000
}

impl Settings {
    /// Load settings from file and environment variables
    ///
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_PRINTER__ prefix
    /// 2. recipe-printer.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_PRINTER__EXPORT__OUTPUT_DIR
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("recipe-printer").required(false))
            .add_source(
                Environment::with_prefix("RECIPE_PRINTER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        assert_eq!(default_render_width(), 1000);
        assert_eq!(default_supersample(), 2);
        assert_eq!(default_page_width_mm(), 210.0);
        assert_eq!(default_page_height_mm(), 297.0);
        assert_eq!(default_delay_ms(), 2000);
    }

    #[test]
    fn test_settings_default_matches_field_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.export.render_width, 1000);
        assert_eq!(settings.export.output_dir, PathBuf::from("."));
        assert_eq!(settings.extraction.delay_ms, 2000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[export]\noutput_dir = \"out\"\nsupersample = 3\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.export.output_dir, PathBuf::from("out"));
        assert_eq!(settings.export.supersample, 3);
        assert_eq!(settings.export.render_width, 1000);
        assert_eq!(settings.extraction.delay_ms, 2000);
    }

    #[test]
    fn test_empty_source_deserializes() {
        let settings: Settings = Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.export.page_height_mm, 297.0);
    }
}
