use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cooking units recognised after the quantity, singular form.
/// A trailing "s" is accepted for each.
pub const UNITS: &[&str] = &[
    "tbsp", "tsp", "cup", "oz", "lb", "g", "kg", "ml", "l", "clove", "pinch", "slice", "piece",
    "can", "jar", "package", "bunch", "sprig",
];

// (quantity)? (unit)? name
// quantity: "2", "1.5", "1/2", and "1 2" (second integer is kept but never combined)
static INGREDIENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^((?:\d+\s?/|[\d.]+)\s?\d*)?\s?((?:{})s?)?\s+(.*)$",
        UNITS.join("|")
    ))
    .unwrap()
});

/// An ingredient line split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIngredient {
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub name: String,
}

impl ParsedIngredient {
    fn unparsed(line: &str) -> Self {
        Self {
            amount: None,
            unit: None,
            name: line.to_string(),
        }
    }
}

/// Split a free-text ingredient line into amount, unit and name.
///
/// Never fails: a line that does not look like `[quantity] [unit] name` comes
/// back whole as the name.
pub fn parse_ingredient(line: &str) -> ParsedIngredient {
    let Some(caps) = INGREDIENT_RE.captures(line) else {
        return ParsedIngredient::unparsed(line);
    };

    let part = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    ParsedIngredient {
        amount: part(1),
        unit: part(2),
        name: part(3).unwrap_or_else(|| line.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(amount: Option<&str>, unit: Option<&str>, name: &str) -> ParsedIngredient {
        ParsedIngredient {
            amount: amount.map(String::from),
            unit: unit.map(String::from),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_amount_unit_name() {
        assert_eq!(
            parse_ingredient("2 cups flour"),
            parsed(Some("2"), Some("cups"), "flour")
        );
    }

    #[test]
    fn test_fraction() {
        assert_eq!(
            parse_ingredient("1/2 tsp salt"),
            parsed(Some("1/2"), Some("tsp"), "salt")
        );
    }

    #[test]
    fn test_decimal() {
        assert_eq!(
            parse_ingredient("1.5 kg potatoes"),
            parsed(Some("1.5"), Some("kg"), "potatoes")
        );
    }

    #[test]
    fn test_no_amount_keeps_line() {
        assert_eq!(
            parse_ingredient("Salt to taste"),
            parsed(None, None, "Salt to taste")
        );
        assert_eq!(
            parse_ingredient("Zest of 1 lemon"),
            parsed(None, None, "Zest of 1 lemon")
        );
    }

    #[test]
    fn test_amount_without_unit() {
        assert_eq!(
            parse_ingredient("4 large eggs"),
            parsed(Some("4"), None, "large eggs")
        );
    }

    #[test]
    fn test_unit_must_be_whole_word() {
        // "l" must not be taken from "lemons"
        assert_eq!(
            parse_ingredient("2 lemons"),
            parsed(Some("2"), None, "lemons")
        );
        assert_eq!(
            parse_ingredient("3 garlic cloves"),
            parsed(Some("3"), None, "garlic cloves")
        );
    }

    #[test]
    fn test_unit_is_case_insensitive() {
        assert_eq!(
            parse_ingredient("2 Tbsp olive oil"),
            parsed(Some("2"), Some("Tbsp"), "olive oil")
        );
    }

    #[test]
    fn test_name_keeps_commas() {
        assert_eq!(
            parse_ingredient("1 lb large shrimp, peeled and deveined"),
            parsed(Some("1"), Some("lb"), "large shrimp, peeled and deveined")
        );
    }

    #[test]
    fn test_second_integer_stays_in_amount() {
        // Mixed-number limitation: "1 2" is one positional amount
        assert_eq!(
            parse_ingredient("1 2 cups milk"),
            parsed(Some("1 2"), Some("cups"), "milk")
        );
    }

    #[test]
    fn test_unit_without_amount() {
        assert_eq!(
            parse_ingredient("cup of tea"),
            parsed(None, Some("cup"), "of tea")
        );
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_ingredient(""), parsed(None, None, ""));
    }

    #[test]
    fn test_empty_remainder_falls_back_to_line() {
        assert_eq!(
            parse_ingredient("2 cups "),
            parsed(Some("2"), Some("cups"), "2 cups ")
        );
    }
}
