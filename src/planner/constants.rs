/// Smallest portion count accepted for entries and attachments.
pub const MIN_PORTIONS: u32 = 1;

/// Largest portion count accepted for entries, attachments and recipes.
pub const MAX_PORTIONS: u32 = 500;

/// Reference portions for a recipe created without one.
pub const DEFAULT_RECIPE_PORTIONS: u32 = 4;

/// Percent a day may exceed its budget before it is flagged.
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 10.0;

/// Minor units per major currency unit.
pub const CENTS_PER_UNIT: f64 = 100.0;

pub const CURRENCY_SYMBOL: &str = "€";

/// Suffix appended to the name of a duplicated plan.
pub const COPY_SUFFIX: &str = " (copy)";

/// Check a portion count against `MIN_PORTIONS..=MAX_PORTIONS`.
pub fn portions_in_range(portions: u32) -> bool {
    (MIN_PORTIONS..=MAX_PORTIONS).contains(&portions)
}

/// Render a cent amount in major units with two decimals.
pub fn format_money(cents: f64) -> String {
    format!("{:.2} {}", cents / CENTS_PER_UNIT, CURRENCY_SYMBOL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portions_in_range() {
        assert!(!portions_in_range(0));
        assert!(portions_in_range(1));
        assert!(portions_in_range(500));
        assert!(!portions_in_range(501));
    }

    #[test]
    fn test_format_money_rounds() {
        assert_eq!(format_money(400.0), "4.00 €");
        assert_eq!(format_money(1234.0), "12.34 €");
        assert_eq!(format_money(-250.0), "-2.50 €");
        assert_eq!(format_money(0.0), "0.00 €");
    }
}
