use recipe_printer::ingredients::{format_amount, parse_amount};
use recipe_printer::{parse_ingredient, scale_ingredient, ParsedIngredient};

fn parsed(amount: Option<&str>, unit: Option<&str>, name: &str) -> ParsedIngredient {
    ParsedIngredient {
        amount: amount.map(String::from),
        unit: unit.map(String::from),
        name: name.to_string(),
    }
}

#[test]
fn test_parses_common_shapes() {
    assert_eq!(
        parse_ingredient("2 cups flour"),
        parsed(Some("2"), Some("cups"), "flour")
    );
    assert_eq!(
        parse_ingredient("1/2 tsp salt"),
        parsed(Some("1/2"), Some("tsp"), "salt")
    );
    assert_eq!(
        parse_ingredient("Salt to taste"),
        parsed(None, None, "Salt to taste")
    );
}

#[test]
fn test_parser_never_fails() {
    for line in ["", " ", "???", "1/", "/2 cups", "🍋 zest", "cups", "12345678901234567890 g sugar"] {
        let result = parse_ingredient(line);
        assert!(!result.name.is_empty() || line.is_empty(), "line {:?}", line);
    }
}

#[test]
fn test_default_recipe_lines_without_amount_are_untouched() {
    let untouched = [
        "Salt to taste",
        "Black pepper to taste",
        "Zest of 1 lemon",
        "Grated Parmesan cheese for serving",
        "",
    ];
    for line in untouched {
        for factor in [0.25, 0.5, 2.0, 3.0] {
            assert_eq!(scale_ingredient(line, factor), line);
        }
    }
}

#[test]
fn test_scale_round_trip() {
    let doubled = scale_ingredient("2 cups flour", 2.0);
    assert_eq!(doubled, "4 cups flour");
    assert_eq!(scale_ingredient(&doubled, 0.5), "2 cups flour");
}

#[test]
fn test_scale_identity() {
    for line in ["2 cups flour", "8 oz linguine pasta", "0.75 l stock", "3 eggs"] {
        assert_eq!(scale_ingredient(line, 1.0), line);
    }
}

#[test]
fn test_fractions_become_decimals() {
    assert_eq!(scale_ingredient("1/2 cup chicken broth", 2.0), "1 cup chicken broth");
    assert_eq!(scale_ingredient("1/3 cup sugar", 1.0), "0.33 cup sugar");
}

#[test]
fn test_amount_helpers() {
    assert_eq!(parse_amount("3/4"), Some(0.75));
    assert_eq!(parse_amount("1 2"), Some(1.0));
    assert_eq!(parse_amount("1/0"), None);
    assert_eq!(format_amount(2.0), "2");
    assert_eq!(format_amount(2.499), "2.5");
    assert_eq!(format_amount(-0.001), "0");
}
