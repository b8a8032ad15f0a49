pub mod export;
pub mod prompts;
pub mod render;

pub use export::{
    ExportFormat, default_export_file_name, export_order_list, order_csv, order_json,
    write_order_csv,
};
pub use prompts::{confirm_delete, prompt_yes_no, rank_recipe_matches, resolve_recipe};
pub use render::{
    display_budget, display_consolidated, display_order_list, display_plan, display_plan_list,
    display_recipe, display_recipe_list,
};
