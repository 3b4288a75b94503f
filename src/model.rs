use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EditError;
use crate::images::TransientImage;
use crate::ingredients::scale_ingredient;

/// One numbered instruction step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub step: usize,
    pub title: String,
    pub text: String,
}

/// Where the recipe's hero image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Stable remote URL
    Remote(String),
    /// Locally supplied bytes behind a revocable handle
    Transient(Arc<TransientImage>),
}

impl ImageSource {
    pub fn url(&self) -> String {
        match self {
            ImageSource::Remote(url) => url.clone(),
            ImageSource::Transient(handle) => handle.url(),
        }
    }

    pub fn transient(&self) -> Option<&Arc<TransientImage>> {
        match self {
            ImageSource::Transient(handle) => Some(handle),
            ImageSource::Remote(_) => None,
        }
    }
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Remote(String::new())
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

impl Serialize for ImageSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.url())
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ImageSource::Remote)
    }
}

/// Text fields that are replaced verbatim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Servings,
    PrepTime,
    CookTime,
    Tips,
}

/// Editable part of an instruction step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepField {
    Title,
    Text,
}

/// The complete in-memory recipe.
///
/// Every edit returns a new document; nothing mutates a document in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDocument {
    pub title: String,
    pub servings: String,
    pub prep_time: String,
    pub cook_time: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<Instruction>,
    pub tips: String,
    pub image_url: ImageSource,
}

impl Default for RecipeDocument {
    fn default() -> Self {
        crate::data::initial_recipe()
    }
}

impl RecipeDocument {
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            Field::Title => next.title = value,
            Field::Servings => next.servings = value,
            Field::PrepTime => next.prep_time = value,
            Field::CookTime => next.cook_time = value,
            Field::Tips => next.tips = value,
        }
        next
    }

    pub fn with_ingredient(&self, index: usize, value: impl Into<String>) -> Result<Self, EditError> {
        check_index("ingredient", index, self.ingredients.len())?;
        let mut next = self.clone();
        next.ingredients[index] = value.into();
        Ok(next)
    }

    pub fn with_empty_ingredient(&self) -> Self {
        let mut next = self.clone();
        next.ingredients.push(String::new());
        next
    }

    pub fn without_ingredient(&self, index: usize) -> Result<Self, EditError> {
        check_index("ingredient", index, self.ingredients.len())?;
        let mut next = self.clone();
        next.ingredients.remove(index);
        Ok(next)
    }

    pub fn with_step_field(
        &self,
        index: usize,
        field: StepField,
        value: impl Into<String>,
    ) -> Result<Self, EditError> {
        check_index("step", index, self.instructions.len())?;
        let mut next = self.clone();
        let step = &mut next.instructions[index];
        match field {
            StepField::Title => step.title = value.into(),
            StepField::Text => step.text = value.into(),
        }
        Ok(next)
    }

    pub fn with_empty_step(&self) -> Self {
        let mut next = self.clone();
        next.instructions.push(Instruction {
            step: next.instructions.len() + 1,
            title: String::new(),
            text: String::new(),
        });
        next
    }

    pub fn without_step(&self, index: usize) -> Result<Self, EditError> {
        check_index("step", index, self.instructions.len())?;
        let mut next = self.clone();
        next.instructions.remove(index);
        renumber(&mut next.instructions);
        Ok(next)
    }

    /// Shift servings by `delta`, never below 1, rescaling every ingredient.
    ///
    /// Returns `Ok(None)` when the servings count would not change.
    pub fn with_servings_delta(&self, delta: i64) -> Result<Option<Self>, EditError> {
        let current = parse_servings(&self.servings)?;
        let target = current.saturating_add(delta).max(1);
        if target == current {
            return Ok(None);
        }

        let mut next = self.clone();
        next.servings = target.to_string();
        // Nothing sensible to scale from when the old count was zero or less
        if current >= 1 {
            let factor = target as f64 / current as f64;
            next.ingredients = self
                .ingredients
                .iter()
                .map(|line| scale_ingredient(line, factor))
                .collect();
        }
        Ok(Some(next))
    }

    pub fn with_image(&self, source: ImageSource) -> Self {
        let mut next = self.clone();
        next.image_url = source;
        next
    }

    /// Whether every step number matches its 1-based position.
    pub fn steps_are_sequential(&self) -> bool {
        self.instructions
            .iter()
            .enumerate()
            .all(|(i, instruction)| instruction.step == i + 1)
    }
}

fn renumber(instructions: &mut [Instruction]) {
    for (i, instruction) in instructions.iter_mut().enumerate() {
        instruction.step = i + 1;
    }
}

fn check_index(list: &'static str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { list, index, len })
    }
}

fn parse_servings(servings: &str) -> Result<i64, EditError> {
    servings
        .trim()
        .parse::<i64>()
        .map_err(|_| EditError::InvalidServings(servings.to_string()))
}
