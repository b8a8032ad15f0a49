pub mod budget;
pub mod consolidate;
pub mod constants;
pub mod cost;
pub mod orders;

pub use budget::{
    BudgetSummary, DayBudget, budget_limit, compute_budget_by_day, compute_plan_total,
    is_over_budget, summarize_budget,
};
pub use consolidate::{
    ConsolidatedIngredient, IngredientsByDay, consolidate_ingredients, day_total, list_total,
};
pub use constants::*;
pub use cost::{CostLine, compute_entry_cost, entry_cost_breakdown, recipe_cost, scaled_cost};
pub use orders::{default_order_list_name, generate_order_items, generate_order_list};
