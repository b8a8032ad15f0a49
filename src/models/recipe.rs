use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MenuError;

/// Dish category shown on the recipe list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    #[default]
    MainCourse,
    Side,
    Dessert,
    Starter,
    Drink,
    Other,
}

impl RecipeCategory {
    pub const ALL: [RecipeCategory; 6] = [
        RecipeCategory::MainCourse,
        RecipeCategory::Side,
        RecipeCategory::Dessert,
        RecipeCategory::Starter,
        RecipeCategory::Drink,
        RecipeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::MainCourse => "main_course",
            RecipeCategory::Side => "side",
            RecipeCategory::Dessert => "dessert",
            RecipeCategory::Starter => "starter",
            RecipeCategory::Drink => "drink",
            RecipeCategory::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecipeCategory::MainCourse => "Main course",
            RecipeCategory::Side => "Side",
            RecipeCategory::Dessert => "Dessert",
            RecipeCategory::Starter => "Starter",
            RecipeCategory::Drink => "Drink",
            RecipeCategory::Other => "Other",
        }
    }
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for RecipeCategory {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| MenuError::InvalidInput(format!("Unknown recipe category '{}'", s)))
    }
}

/// One line of a recipe's ingredient list.
///
/// `price_per_unit` is the cost in cents of this line at the recipe's
/// reference portion count, not the price of a single unit of `quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Free-text magnitude as entered by the user ("500", "1.5", "2 large").
    pub quantity: String,

    pub unit: String,

    #[serde(default)]
    pub price_per_unit: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Ingredient {
    pub fn new(name: &str, quantity: &str, unit: &str, price_per_unit: i64) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
            price_per_unit,
            notes: None,
        }
    }

    /// Numeric value of `quantity`, or 0.0 when it cannot be read.
    pub fn amount(&self) -> f64 {
        parse_quantity(&self.quantity).unwrap_or_else(|| {
            tracing::warn!(
                ingredient = %self.name,
                quantity = %self.quantity,
                "unparseable ingredient quantity, counting as 0"
            );
            0.0
        })
    }

    /// Consolidation key. Exact match, no case folding.
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.unit)
    }
}

/// Parse the leading decimal number of a quantity string.
///
/// Accepts a decimal comma and ignores trailing text, so "1,5 kg" reads as 1.5.
pub fn parse_quantity(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, ch) in normalized.char_indices() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '-' | '+' if i == 0 => {}
            _ => break,
        }
        end = i + ch.len_utf8();
    }

    if !seen_digit {
        return None;
    }

    normalized[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// A recipe with its ingredient list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u32,

    pub owner_id: u32,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub category: RecipeCategory,

    /// Reference portion count the ingredient list is written for.
    pub default_portions: u32,

    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Sum of all ingredient prices at the reference portion count.
    pub fn base_cost(&self) -> i64 {
        self.ingredients.iter().map(|i| i.price_per_unit).sum()
    }

    /// Reference portions used as divisor; a stored 0 counts as 1.
    pub fn reference_portions(&self) -> u32 {
        if self.default_portions == 0 {
            tracing::warn!(recipe = self.id, "recipe has 0 default portions, using 1");
            1
        } else {
            self.default_portions
        }
    }

    /// Ratio applied to reference quantities for `portions` servings.
    pub fn scale_factor(&self, portions: u32) -> f64 {
        portions as f64 / self.reference_portions() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_plain_and_decimal() {
        assert_eq!(parse_quantity("500"), Some(500.0));
        assert_eq!(parse_quantity(" 1.5 "), Some(1.5));
        assert_eq!(parse_quantity("1,5"), Some(1.5));
        assert_eq!(parse_quantity("2."), Some(2.0));
    }

    #[test]
    fn test_parse_quantity_trailing_text() {
        assert_eq!(parse_quantity("2 large"), Some(2.0));
        assert_eq!(parse_quantity("250g"), Some(250.0));
    }

    #[test]
    fn test_parse_quantity_malformed() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("a pinch"), None);
        assert_eq!(parse_quantity("."), None);
    }

    #[test]
    fn test_amount_defaults_to_zero() {
        let ing = Ingredient::new("Salt", "to taste", "g", 5);
        assert_eq!(ing.amount(), 0.0);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(
            "main course".parse::<RecipeCategory>().unwrap(),
            RecipeCategory::MainCourse
        );
        assert_eq!("Dessert".parse::<RecipeCategory>().unwrap(), RecipeCategory::Dessert);
        assert!("soup".parse::<RecipeCategory>().is_err());
    }

    #[test]
    fn test_reference_portions_guard() {
        let recipe = Recipe {
            id: 1,
            owner_id: 1,
            name: "Broken".to_string(),
            description: None,
            category: RecipeCategory::Other,
            default_portions: 0,
            ingredients: vec![Ingredient::new("Water", "1", "l", 10)],
        };
        assert_eq!(recipe.reference_portions(), 1);
        assert_eq!(recipe.scale_factor(3), 3.0);
    }
}
