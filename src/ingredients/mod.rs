//! Free-text ingredient lines: splitting them into amount, unit and name, and
//! rescaling the amount when the servings count changes.

mod parser;
mod scaler;

pub use parser::{parse_ingredient, ParsedIngredient, UNITS};
pub use scaler::{format_amount, parse_amount, scale_ingredient};
