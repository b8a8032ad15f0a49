use dialoguer::{Confirm, Select};
use strsim::jaro_winkler;

use crate::error::{MenuError, Result};
use crate::models::Recipe;

/// Minimum Jaro-Winkler similarity for a fuzzy recipe match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Maximum candidates offered in a selection prompt.
const MAX_CANDIDATES: usize = 5;

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Ask before a destructive action unless `assume_yes` is set.
pub fn confirm_delete(what: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no(&format!("Delete {}?", what), false)
}

/// Recipes whose name resembles `query`, best match first.
pub fn rank_recipe_matches<'a>(recipes: &[&'a Recipe], query: &str) -> Vec<(&'a Recipe, f64)> {
    let query = query.trim().to_lowercase();
    let mut candidates: Vec<(&Recipe, f64)> = recipes
        .iter()
        .map(|r| (*r, jaro_winkler(&r.name.to_lowercase(), &query)))
        .filter(|(_, score)| *score > FUZZY_THRESHOLD)
        .collect();

    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Resolve a recipe given by id or by name.
///
/// Tries the numeric id, then an exact case-insensitive name, then fuzzy
/// matching with a confirmation or selection prompt. With `assume_yes` a
/// single fuzzy candidate is taken without asking.
pub fn resolve_recipe(recipes: &[&Recipe], reference: &str, assume_yes: bool) -> Result<u32> {
    let reference = reference.trim();

    if let Ok(id) = reference.parse::<u32>() {
        return Ok(id);
    }

    if let Some(recipe) = recipes
        .iter()
        .find(|r| r.name.to_lowercase() == reference.to_lowercase())
    {
        return Ok(recipe.id);
    }

    let candidates = rank_recipe_matches(recipes, reference);
    match candidates.as_slice() {
        [] => Err(MenuError::InvalidInput(format!(
            "No recipe matches '{}'",
            reference
        ))),
        [(recipe, _)] => {
            if assume_yes || prompt_yes_no(&format!("Did you mean '{}'?", recipe.name), true)? {
                Ok(recipe.id)
            } else {
                Err(MenuError::InvalidInput(format!(
                    "No recipe chosen for '{}'",
                    reference
                )))
            }
        }
        _ if assume_yes => Err(MenuError::InvalidInput(format!(
            "'{}' matches several recipes; use the recipe id",
            reference
        ))),
        _ => {
            let mut options: Vec<String> = candidates.iter().map(|(r, _)| r.name.clone()).collect();
            options.push("None of these".to_string());

            let selection = Select::new()
                .with_prompt("Which recipe did you mean?")
                .items(&options)
                .default(0)
                .interact()?;

            candidates
                .get(selection)
                .map(|(r, _)| r.id)
                .ok_or_else(|| {
                    MenuError::InvalidInput(format!("No recipe chosen for '{}'", reference))
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecipeCategory;

    fn recipe(id: u32, name: &str) -> Recipe {
        Recipe {
            id,
            owner_id: 1,
            name: name.to_string(),
            description: None,
            category: RecipeCategory::MainCourse,
            default_portions: 4,
            ingredients: Vec::new(),
        }
    }

    #[test]
    fn test_resolve_by_id_and_exact_name() {
        let a = recipe(3, "Tiramisu");
        let b = recipe(4, "Goulash Soup");
        let recipes = vec![&a, &b];

        assert_eq!(resolve_recipe(&recipes, "4", true).unwrap(), 4);
        assert_eq!(resolve_recipe(&recipes, "tiramisu", true).unwrap(), 3);
    }

    #[test]
    fn test_resolve_single_fuzzy_with_assume_yes() {
        let a = recipe(3, "Tiramisu");
        let b = recipe(4, "Goulash Soup");
        let recipes = vec![&a, &b];

        assert_eq!(resolve_recipe(&recipes, "Tiramisù", true).unwrap(), 3);
        assert!(resolve_recipe(&recipes, "Pizza", true).is_err());
    }

    #[test]
    fn test_rank_best_first() {
        let a = recipe(1, "Chicken Soup");
        let b = recipe(2, "Goulash Soup");
        let recipes = vec![&a, &b];

        let ranked = rank_recipe_matches(&recipes, "goulash sop");
        assert_eq!(ranked[0].0.id, 2);
    }
}
