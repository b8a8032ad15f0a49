use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::interface::ExportFormat;
use crate::models::{MealType, OrderListStatus, PlanStatus, RecipeCategory};
use crate::planner::constants::DEFAULT_RECIPE_PORTIONS;

/// Menu planner: recipe costing, daily budgets, and procurement order lists.
#[derive(Parser, Debug)]
#[command(name = "menu_planner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the JSON store file.
    #[arg(short, long, env = "MENU_PLANNER_FILE", default_value = "menu_store.json", global = true)]
    pub file: String,

    /// Id of the user whose data is read and written.
    #[arg(short, long, env = "MENU_PLANNER_USER", default_value_t = 1, global = true)]
    pub user: u32,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage recipes and their ingredients.
    #[command(subcommand)]
    Recipe(RecipeCommand),

    /// Manage menu plans and view their budget.
    #[command(subcommand)]
    Plan(PlanCommand),

    /// Manage the meals scheduled in a plan.
    #[command(subcommand)]
    Entry(EntryCommand),

    /// Manage additional recipes attached to a meal.
    #[command(subcommand)]
    Attach(AttachCommand),

    /// Manage procurement order lists.
    #[command(subcommand)]
    Order(OrderCommand),

    /// Add the demo recipes to the current user's collection.
    Seed,
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan(PlanCommand::List)
    }
}

/// Parse `YYYY-MM-DD`.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}

/// Parse a money amount in major units ("12.50") into cents.
fn parse_money(s: &str) -> Result<i64, String> {
    let value: f64 = s
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| format!("invalid amount '{}'", s))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("amount must be a non-negative number, got '{}'", s));
    }
    Ok((value * 100.0).round() as i64)
}

fn parse_category(s: &str) -> Result<RecipeCategory, String> {
    s.parse().map_err(|e: crate::error::MenuError| e.to_string())
}

fn parse_meal(s: &str) -> Result<MealType, String> {
    s.parse().map_err(|e: crate::error::MenuError| e.to_string())
}

fn parse_plan_status(s: &str) -> Result<PlanStatus, String> {
    s.parse().map_err(|e: crate::error::MenuError| e.to_string())
}

fn parse_order_status(s: &str) -> Result<OrderListStatus, String> {
    s.parse().map_err(|e: crate::error::MenuError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// List recipes.
    List,

    /// Show a recipe with its ingredients.
    Show {
        /// Recipe id or name.
        recipe: String,
    },

    /// Create a recipe.
    Add(RecipeArgs),

    /// Change a recipe. Given ingredients replace the whole list.
    Update {
        /// Recipe id or name.
        recipe: String,

        #[command(flatten)]
        fields: RecipeUpdateArgs,
    },

    /// Delete a recipe and its ingredients.
    Delete {
        /// Recipe id or name.
        recipe: String,
    },
}

#[derive(Args, Debug)]
pub struct RecipeArgs {
    /// Recipe name.
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// main_course, side, dessert, starter, drink or other.
    #[arg(long, value_parser = parse_category, default_value = "main_course")]
    pub category: RecipeCategory,

    /// Reference portions the ingredient list is written for.
    #[arg(long, default_value_t = DEFAULT_RECIPE_PORTIONS)]
    pub portions: u32,

    /// Ingredient as "name;quantity;unit;price" with price in major units. Repeatable.
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RecipeUpdateArgs {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_parser = parse_category)]
    pub category: Option<RecipeCategory>,

    #[arg(long)]
    pub portions: Option<u32>,

    /// Ingredient as "name;quantity;unit;price". Repeatable.
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// List menu plans.
    List,

    /// Show a plan's meals and costs.
    Show { plan: u32 },

    /// Create a menu plan.
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// First day, YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        /// Last day (inclusive), YYYY-MM-DD.
        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,

        /// draft, template, active or archived.
        #[arg(long, value_parser = parse_plan_status, default_value = "draft")]
        status: PlanStatus,

        /// Maximum spend per day in major units; 0 means no limit.
        #[arg(long, value_parser = parse_money)]
        budget: Option<i64>,

        /// Percent a day may exceed the budget.
        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Change a plan's settings.
    Update {
        plan: u32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        #[arg(long, value_parser = parse_plan_status)]
        status: Option<PlanStatus>,

        #[arg(long, value_parser = parse_money)]
        budget: Option<i64>,

        #[arg(long)]
        tolerance: Option<f64>,
    },

    /// Delete a plan with all its meals.
    Delete { plan: u32 },

    /// Copy a plan to a new date range.
    Duplicate {
        plan: u32,

        #[arg(long, value_parser = parse_date)]
        start: NaiveDate,

        #[arg(long, value_parser = parse_date)]
        end: NaiveDate,
    },

    /// Show per-day costs against the daily budget.
    Budget { plan: u32 },
}

#[derive(Subcommand, Debug)]
pub enum EntryCommand {
    /// Schedule a meal.
    Add {
        #[arg(long)]
        plan: u32,

        #[arg(long, value_parser = parse_date)]
        date: NaiveDate,

        /// breakfast, lunch, dinner or snack.
        #[arg(long, value_parser = parse_meal)]
        meal: MealType,

        /// Recipe id or name.
        #[arg(long)]
        recipe: String,

        #[arg(long)]
        portions: u32,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change portions or notes of a meal.
    Update {
        entry: u32,

        #[arg(long)]
        portions: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a meal and its attached recipes.
    Remove { entry: u32 },
}

#[derive(Subcommand, Debug)]
pub enum AttachCommand {
    /// Attach another recipe to a meal.
    Add {
        #[arg(long)]
        entry: u32,

        /// Recipe id or name.
        #[arg(long)]
        recipe: String,

        #[arg(long)]
        portions: u32,

        /// Label the recipe as an alternative.
        #[arg(long)]
        alternative: bool,
    },

    /// Change portions or selection of an attached recipe.
    Update {
        attachment: u32,

        #[arg(long)]
        portions: Option<u32>,

        /// Whether the recipe counts towards cost and ordering.
        #[arg(long)]
        selected: Option<bool>,
    },

    /// Detach a recipe from its meal.
    Remove { attachment: u32 },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommand {
    /// List order lists.
    List,

    /// Show an order list with ingredients grouped by order day.
    Show { order: u32 },

    /// Create an order list from a plan.
    Generate {
        plan: u32,

        #[arg(long)]
        name: Option<String>,
    },

    /// Create an empty order list.
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        plan: Option<u32>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Change name, status or notes of an order list.
    Update {
        order: u32,

        #[arg(long)]
        name: Option<String>,

        /// draft, confirmed, ordered or archived.
        #[arg(long, value_parser = parse_order_status)]
        status: Option<OrderListStatus>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Set how many days ahead an item's ingredients must be ordered.
    LeadTime {
        order: u32,

        item: u32,

        /// Days before the cooking day.
        days: u32,

        /// Preparation time in hours.
        #[arg(long)]
        prep: Option<u32>,
    },

    /// Delete an order list.
    Delete { order: u32 },

    /// Write an order list to a CSV or JSON file.
    Export {
        order: u32,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output path; defaults to the list name in the current directory.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}
