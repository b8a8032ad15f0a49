mod persistence;
mod seed;
mod store;

pub use persistence::{load_store, save_store};
pub use seed::seed_demo_recipes;
pub use store::{
    MenuStore, NewEntry, NewPlan, NewRecipe, OrderListUpdate, PlanUpdate, RecipeUpdate, StoreData,
};
