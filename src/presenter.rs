//! Read and edit presentations of a recipe.
//!
//! The terminal rendering is what the session shows after every command. The
//! [`Snapshot`] is the same presentation frozen into a value so the export
//! pipeline can lay it out and rasterize it away from the live document.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::model::{ImageSource, RecipeDocument};

/// Presentation mode of the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    View,
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::View => Mode::Edit,
            Mode::Edit => Mode::View,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::View => "View Mode",
            Mode::Edit => "Edit Mode",
        }
    }
}

pub const INGREDIENTS_HEADING: &str = "Ingredients";
pub const INSTRUCTIONS_HEADING: &str = "Instructions";
pub const TIPS_HEADING: &str = "Tips and Variations";

/// One rendered instruction step
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotStep {
    pub number: String,
    pub title: String,
    pub text: String,
}

/// The presentation of a recipe frozen at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub hero: ImageSource,
    /// Bytes of a local hero image, taken when the snapshot was captured
    pub hero_bytes: Option<Arc<[u8]>>,
    pub title: String,
    pub meta: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<SnapshotStep>,
    pub tips: String,
    /// Page shadow shown around the recipe on screen
    pub shadow: bool,
}

impl Snapshot {
    /// Capture how `document` currently presents in view mode.
    pub fn capture(document: &RecipeDocument) -> Self {
        Self {
            hero: document.image_url.clone(),
            hero_bytes: document.image_url.transient().and_then(|handle| handle.bytes()),
            title: document.title.clone(),
            meta: meta_line(document).to_uppercase(),
            ingredients: document.ingredients.clone(),
            steps: document
                .instructions
                .iter()
                .enumerate()
                .map(|(i, step)| SnapshotStep {
                    number: (i + 1).to_string(),
                    title: step.title.clone(),
                    text: step.text.clone(),
                })
                .collect(),
            tips: document.tips.clone(),
            shadow: true,
        }
    }

    /// The same snapshot with on-screen-only decoration removed.
    pub fn for_print(mut self) -> Self {
        self.shadow = false;
        self
    }
}

fn meta_line(document: &RecipeDocument) -> String {
    format!(
        "Servings: {}  |  Prep: {}  |  Cook: {}",
        document.servings, document.prep_time, document.cook_time
    )
}

/// Render the recipe for the terminal.
///
/// In edit mode list entries carry the 1-based position the session commands
/// address them by.
pub fn render_text(document: &RecipeDocument, mode: Mode) -> String {
    let mut out = String::new();
    let editing = mode == Mode::Edit;

    let _ = writeln!(out, "[{}]  image: {}", mode.label(), document.image_url);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", document.title);
    let _ = writeln!(out, "{}", "=".repeat(document.title.chars().count().max(1)));
    let _ = writeln!(out, "{}", meta_line(document));
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", INGREDIENTS_HEADING);
    for (i, ingredient) in document.ingredients.iter().enumerate() {
        if editing {
            let _ = writeln!(out, "  {:>2}. {}", i + 1, ingredient);
        } else {
            let _ = writeln!(out, "  - {}", ingredient);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", INSTRUCTIONS_HEADING);
    for step in &document.instructions {
        if editing {
            let _ = writeln!(out, "  {:>2}. title: {}", step.step, step.title);
            let _ = writeln!(out, "      text:  {}", step.text);
        } else {
            let _ = writeln!(out, "  {}. {} {}", step.step, step.title, step.text);
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "{}", TIPS_HEADING);
    let _ = writeln!(out, "  {}", document.tips);
    out
}
