use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::EnrichedOrderItem;

/// One merged ingredient bucket of an order day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedIngredient {
    pub name: String,
    pub unit: String,

    /// Summed scaled quantity; unparseable quantities contributed 0.
    pub total_quantity: f64,

    /// Summed scaled price in cents.
    pub total_price: f64,

    /// Reference price of the merged lines; the highest one if they differ.
    pub price_per_unit: i64,
}

/// Consolidated ingredients keyed by actual order day, ascending.
pub type IngredientsByDay = BTreeMap<NaiveDate, Vec<ConsolidatedIngredient>>;

/// Expand order items into their recipes' ingredients and merge them.
///
/// Items are grouped by `order_day - lead_time`. Within a day, ingredients
/// with identical `(name, unit)` are summed; quantities and prices are scaled
/// by `portions / default_portions`. Buckets are sorted by name then unit, so
/// the result does not depend on item order.
pub fn consolidate_ingredients(items: &[EnrichedOrderItem]) -> IngredientsByDay {
    let mut days: BTreeMap<NaiveDate, BTreeMap<(String, String), ConsolidatedIngredient>> =
        BTreeMap::new();

    for EnrichedOrderItem { item, recipe } in items {
        let day = item.actual_order_day();
        let factor = recipe.scale_factor(item.portions);
        let buckets = days.entry(day).or_default();

        for ingredient in &recipe.ingredients {
            let quantity = ingredient.amount() * factor;
            let price = ingredient.price_per_unit as f64 * factor;

            let (name, unit) = ingredient.key();
            let bucket = buckets
                .entry((name.to_string(), unit.to_string()))
                .or_insert_with(|| ConsolidatedIngredient {
                    name: ingredient.name.clone(),
                    unit: ingredient.unit.clone(),
                    total_quantity: 0.0,
                    total_price: 0.0,
                    price_per_unit: ingredient.price_per_unit,
                });

            bucket.total_quantity += quantity;
            bucket.total_price += price;
            bucket.price_per_unit = bucket.price_per_unit.max(ingredient.price_per_unit);
        }
    }

    days.into_iter()
        .map(|(day, buckets)| (day, buckets.into_values().collect()))
        .collect()
}

/// Sum of `total_price` over one day's buckets.
pub fn day_total(ingredients: &[ConsolidatedIngredient]) -> f64 {
    ingredients.iter().map(|i| i.total_price).sum()
}

/// Sum of `total_price` over every day.
pub fn list_total(by_day: &IngredientsByDay) -> f64 {
    by_day.values().map(|day| day_total(day)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ingredient, OrderListItem, Recipe, RecipeCategory};

    fn recipe(id: u32, default_portions: u32, ingredients: Vec<Ingredient>) -> Recipe {
        Recipe {
            id,
            owner_id: 1,
            name: format!("Recipe {}", id),
            description: None,
            category: RecipeCategory::MainCourse,
            default_portions,
            ingredients,
        }
    }

    fn item(id: u32, recipe_id: u32, portions: u32, day: u32, lead_time: u32) -> OrderListItem {
        OrderListItem {
            id,
            recipe_id,
            portions,
            order_day: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            preparation_time: 0,
            lead_time,
        }
    }

    #[test]
    fn test_lead_time_moves_bucket() {
        let r = recipe(1, 4, vec![Ingredient::new("Flour", "500", "g", 120)]);
        let it = item(1, 1, 4, 10, 2);
        let enriched = [EnrichedOrderItem {
            item: &it,
            recipe: &r,
        }];

        let by_day = consolidate_ingredients(&enriched);
        assert_eq!(by_day.len(), 1);
        let day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        assert!(by_day.contains_key(&day));
    }

    #[test]
    fn test_merge_is_exact_on_name_and_unit() {
        let r = recipe(
            1,
            2,
            vec![
                Ingredient::new("Milk", "200", "ml", 50),
                Ingredient::new("milk", "200", "ml", 50),
                Ingredient::new("Milk", "1", "l", 120),
            ],
        );
        let it = item(1, 1, 2, 10, 0);
        let enriched = [EnrichedOrderItem {
            item: &it,
            recipe: &r,
        }];

        let by_day = consolidate_ingredients(&enriched);
        let day = by_day.values().next().unwrap();
        assert_eq!(day.len(), 3);
    }

    #[test]
    fn test_scaling_and_bad_quantity() {
        let r = recipe(
            1,
            4,
            vec![
                Ingredient::new("Eggs", "4", "pc", 160),
                Ingredient::new("Salt", "a pinch", "g", 4),
            ],
        );
        let it = item(1, 1, 10, 10, 0);
        let enriched = [EnrichedOrderItem {
            item: &it,
            recipe: &r,
        }];

        let by_day = consolidate_ingredients(&enriched);
        let day = by_day.values().next().unwrap();

        let eggs = day.iter().find(|i| i.name == "Eggs").unwrap();
        assert!((eggs.total_quantity - 10.0).abs() < 1e-9);
        assert!((eggs.total_price - 400.0).abs() < 1e-9);
        assert_eq!(eggs.price_per_unit, 160);

        let salt = day.iter().find(|i| i.name == "Salt").unwrap();
        assert_eq!(salt.total_quantity, 0.0);
        assert!((salt.total_price - 10.0).abs() < 1e-9);

        assert!((day_total(day) - 410.0).abs() < 1e-9);
        assert!((list_total(&by_day) - 410.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_items() {
        assert!(consolidate_ingredients(&[]).is_empty());
    }
}
