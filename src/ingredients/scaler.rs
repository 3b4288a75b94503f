use super::parser::parse_ingredient;

/// Multiply the amount of an ingredient line by `factor`.
///
/// Lines without a recognisable amount are returned unchanged. The result is
/// rebuilt as `"<amount> <unit> <name>"`, dropping the unit segment when the
/// line had none. Amounts are written as decimals, never as fractions.
pub fn scale_ingredient(line: &str, factor: f64) -> String {
    let parsed = parse_ingredient(line);

    let Some(amount) = parsed.amount.as_deref() else {
        return line.to_string();
    };
    let Some(value) = parse_amount(amount) else {
        return line.to_string();
    };

    let scaled = format_amount(value * factor);
    match parsed.unit {
        Some(unit) => format!("{} {} {}", scaled, unit, parsed.name),
        None => format!("{} {}", scaled, parsed.name),
    }
}

/// Numeric value of an amount token: `a/b` or a leading decimal number.
///
/// For a mixed amount such as `1 2` only the leading number counts.
pub fn parse_amount(amount: &str) -> Option<f64> {
    let value = match amount.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            num / den
        }
        None => leading_number(amount)?,
    };
    value.is_finite().then_some(value)
}

/// Round to at most two decimals and strip trailing zeros.
///
/// Rounding works on the exact binary value, so `0.015` (stored just below
/// the midpoint) gives `0.01`. Exact midpoints round away from zero.
pub fn format_amount(value: f64) -> String {
    let magnitude = value.abs();
    // A double sits exactly on a .xx5 midpoint only when it is an odd number of eighths
    let eighths = magnitude * 8.0;
    let rounded = if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        (magnitude * 100.0).round() / 100.0
    } else {
        format!("{:.2}", magnitude).parse().unwrap_or(magnitude)
    };

    // Avoid printing "-0"
    if rounded == 0.0 {
        "0".to_string()
    } else if value < 0.0 {
        format!("-{}", rounded)
    } else {
        rounded.to_string()
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_whole_number() {
        assert_eq!(scale_ingredient("2 cups flour", 2.0), "4 cups flour");
    }

    #[test]
    fn test_scale_round_trip() {
        let doubled = scale_ingredient("2 cups flour", 2.0);
        assert_eq!(scale_ingredient(&doubled, 0.5), "2 cups flour");
    }

    #[test]
    fn test_scale_identity() {
        for line in ["2 cups flour", "8 oz linguine pasta", "1.25 kg beef", "3 eggs"] {
            assert_eq!(scale_ingredient(line, 1.0), line);
        }
    }

    #[test]
    fn test_scale_without_amount_is_unchanged() {
        for factor in [0.5, 1.0, 2.0, 3.7] {
            assert_eq!(scale_ingredient("Salt to taste", factor), "Salt to taste");
            assert_eq!(scale_ingredient("", factor), "");
        }
    }

    #[test]
    fn test_scale_fraction_becomes_decimal() {
        assert_eq!(scale_ingredient("1/2 tsp salt", 1.0), "0.5 tsp salt");
        assert_eq!(scale_ingredient("1/2 cup broth", 3.0), "1.5 cup broth");
    }

    #[test]
    fn test_scale_without_unit() {
        assert_eq!(scale_ingredient("4 large eggs", 1.5), "6 large eggs");
    }

    #[test]
    fn test_scale_rounds_to_two_decimals() {
        assert_eq!(scale_ingredient("1 cup sugar", 1.0 / 3.0), "0.33 cup sugar");
        assert_eq!(scale_ingredient("1/2 cup broth", 1.25), "0.63 cup broth");
    }

    #[test]
    fn test_scale_mixed_number_uses_leading_value() {
        assert_eq!(scale_ingredient("1 2 cups milk", 2.0), "2 cups milk");
    }

    #[test]
    fn test_unparseable_amount_is_unchanged() {
        assert_eq!(scale_ingredient("1/0 cup water", 2.0), "1/0 cup water");
        assert_eq!(scale_ingredient(". cup water", 2.0), ". cup water");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(4.0), "4");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(1.0 / 3.0), "0.33");
        assert_eq!(format_amount(-0.001), "0");
    }

    #[test]
    fn test_format_amount_uses_exact_value() {
        // Stored slightly below the midpoint
        assert_eq!(format_amount(0.015), "0.01");
        assert_eq!(format_amount(1.005), "1");
        assert_eq!(format_amount(2.675), "2.67");
        // Exact midpoints
        assert_eq!(format_amount(0.375), "0.38");
        assert_eq!(format_amount(0.625), "0.63");
        assert_eq!(format_amount(-0.125), "-0.13");
        assert_eq!(format_amount(-1.5), "-1.5");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1/2"), Some(0.5));
        assert_eq!(parse_amount("1 /4"), Some(0.25));
        assert_eq!(parse_amount("1.5"), Some(1.5));
        assert_eq!(parse_amount("1 2"), Some(1.0));
        assert_eq!(parse_amount("1/"), None);
        assert_eq!(parse_amount("."), None);
    }
}
