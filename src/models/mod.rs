pub mod order;
pub mod plan;
pub mod recipe;
pub mod snapshot;

pub use order::{OrderList, OrderListItem, OrderListStatus};
pub use plan::{MealType, MenuPlan, MenuPlanEntry, MenuPlanRecipe, PlanStatus};
pub use recipe::{Ingredient, Recipe, RecipeCategory, parse_quantity};
pub use snapshot::{
    EnrichedAttachment, EnrichedEntry, EnrichedOrderItem, OrderListSnapshot, PlanSnapshot,
};
