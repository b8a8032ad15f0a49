use crate::error::Result;
use crate::models::{Ingredient, RecipeCategory};
use crate::state::store::{MenuStore, NewRecipe};

type DemoRecipe = (
    &'static str,
    &'static str,
    RecipeCategory,
    u32,
    &'static [(&'static str, &'static str, &'static str, i64)],
);

const DEMO_RECIPES: &[DemoRecipe] = &[
    (
        "Spaghetti Bolognese",
        "Classic Italian pasta with meat sauce",
        RecipeCategory::MainCourse,
        4,
        &[
            ("Spaghetti", "500", "g", 150),
            ("Minced meat", "400", "g", 450),
            ("Tomatoes", "400", "g", 200),
            ("Onions", "2", "pc", 30),
            ("Garlic", "2", "cloves", 10),
        ],
    ),
    (
        "Mixed Salad",
        "Fresh salad with tomatoes, cucumber and dressing",
        RecipeCategory::Side,
        4,
        &[
            ("Lettuce", "1", "pc", 120),
            ("Tomatoes", "200", "g", 100),
            ("Cucumber", "1", "pc", 80),
            ("Dressing", "100", "ml", 150),
        ],
    ),
    (
        "Tiramisu",
        "Italian dessert with mascarpone and coffee",
        RecipeCategory::Dessert,
        6,
        &[
            ("Mascarpone", "500", "g", 450),
            ("Ladyfingers", "200", "g", 250),
            ("Espresso", "200", "ml", 100),
            ("Eggs", "4", "pc", 40),
            ("Sugar", "100", "g", 50),
        ],
    ),
    (
        "Chicken Soup",
        "Homemade chicken broth with vegetables",
        RecipeCategory::Starter,
        4,
        &[
            ("Chicken broth", "1", "l", 300),
            ("Chicken", "300", "g", 400),
            ("Carrots", "200", "g", 80),
            ("Celery", "100", "g", 60),
            ("Noodles", "100", "g", 80),
        ],
    ),
    (
        "Schnitzel with Fries",
        "Breaded schnitzel with crispy fries",
        RecipeCategory::MainCourse,
        4,
        &[
            ("Pork schnitzel", "600", "g", 800),
            ("Breadcrumbs", "100", "g", 100),
            ("Eggs", "2", "pc", 40),
            ("Fries", "500", "g", 200),
            ("Oil", "100", "ml", 150),
        ],
    ),
    (
        "Mashed Potatoes",
        "Creamy mashed potatoes with butter",
        RecipeCategory::Side,
        4,
        &[
            ("Potatoes", "800", "g", 120),
            ("Butter", "50", "g", 80),
            ("Milk", "200", "ml", 100),
            ("Salt", "5", "g", 5),
        ],
    ),
    (
        "Apple Strudel",
        "Traditional Austrian apple strudel",
        RecipeCategory::Dessert,
        8,
        &[
            ("Strudel dough", "250", "g", 200),
            ("Apples", "600", "g", 180),
            ("Sugar", "80", "g", 40),
            ("Cinnamon", "10", "g", 30),
            ("Raisins", "50", "g", 100),
        ],
    ),
    (
        "Goulash Soup",
        "Hearty Hungarian goulash soup",
        RecipeCategory::MainCourse,
        6,
        &[
            ("Beef", "500", "g", 600),
            ("Bell pepper", "200", "g", 150),
            ("Onions", "200", "g", 60),
            ("Tomato paste", "50", "g", 80),
            ("Paprika powder", "20", "g", 50),
        ],
    ),
];

/// Add the demo recipes for `owner`, skipping names the owner already has.
///
/// Returns the number of recipes created.
pub fn seed_demo_recipes(store: &mut MenuStore, owner: u32) -> Result<usize> {
    let mut created = 0;

    for (name, description, category, portions, ingredients) in DEMO_RECIPES {
        let exists = store.recipes(owner).iter().any(|r| r.name == *name);
        if exists {
            tracing::debug!(recipe = name, "demo recipe already present");
            continue;
        }

        store.create_recipe(
            owner,
            NewRecipe {
                name: name.to_string(),
                description: Some(description.to_string()),
                category: *category,
                default_portions: *portions,
                ingredients: ingredients
                    .iter()
                    .map(|(n, q, u, p)| Ingredient::new(n, q, u, *p))
                    .collect(),
            },
        )?;
        created += 1;
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let mut store = MenuStore::default();
        assert_eq!(seed_demo_recipes(&mut store, 1).unwrap(), DEMO_RECIPES.len());
        assert_eq!(seed_demo_recipes(&mut store, 1).unwrap(), 0);
        assert_eq!(store.recipes(1).len(), DEMO_RECIPES.len());
    }

    #[test]
    fn test_seed_per_owner() {
        let mut store = MenuStore::default();
        seed_demo_recipes(&mut store, 1).unwrap();
        assert_eq!(seed_demo_recipes(&mut store, 2).unwrap(), DEMO_RECIPES.len());
    }
}
