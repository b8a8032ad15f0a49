use crate::models::{EnrichedEntry, Ingredient, Recipe};

/// Cost of an ingredient list for `target_portions`, in (fractional) cents.
///
/// Formula: sum(price_per_unit) * target_portions / default_portions.
/// A `default_portions` of 0 is treated as 1.
pub fn scaled_cost(ingredients: &[Ingredient], target_portions: u32, default_portions: u32) -> f64 {
    let base: i64 = ingredients.iter().map(|i| i.price_per_unit).sum();
    let divisor = default_portions.max(1);
    base as f64 * target_portions as f64 / divisor as f64
}

/// Cost of cooking `portions` servings of a recipe.
pub fn recipe_cost(recipe: &Recipe, portions: u32) -> f64 {
    scaled_cost(&recipe.ingredients, portions, recipe.reference_portions())
}

/// Cost of one meal entry: the primary recipe plus every selected attachment.
///
/// Alternatives are summed like any other selected attachment.
pub fn compute_entry_cost(entry: &EnrichedEntry) -> f64 {
    let primary = recipe_cost(entry.recipe, entry.entry.portions);
    let extras: f64 = entry
        .selected()
        .map(|a| recipe_cost(a.recipe, a.attachment.portions))
        .sum();
    primary + extras
}

/// Per-recipe line of an entry's cost breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CostLine {
    pub recipe_id: u32,
    pub recipe_name: String,
    pub portions: u32,
    pub cost: f64,
    pub is_alternative: bool,
}

/// Itemized version of `compute_entry_cost`, primary first.
pub fn entry_cost_breakdown(entry: &EnrichedEntry) -> Vec<CostLine> {
    let mut lines = vec![CostLine {
        recipe_id: entry.recipe.id,
        recipe_name: entry.recipe.name.clone(),
        portions: entry.entry.portions,
        cost: recipe_cost(entry.recipe, entry.entry.portions),
        is_alternative: false,
    }];

    lines.extend(entry.selected().map(|a| CostLine {
        recipe_id: a.recipe.id,
        recipe_name: a.recipe.name.clone(),
        portions: a.attachment.portions,
        cost: recipe_cost(a.recipe, a.attachment.portions),
        is_alternative: a.attachment.is_alternative,
    }));

    lines
}
