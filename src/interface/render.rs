use crate::models::{MenuPlan, OrderListSnapshot, PlanSnapshot, Recipe};
use crate::planner::constants::format_money;
use crate::planner::{
    BudgetSummary, IngredientsByDay, compute_entry_cost, day_total, entry_cost_breakdown,
    list_total, recipe_cost,
};

/// Display recipes with their cost at reference portions.
pub fn display_recipe_list(recipes: &[&Recipe]) {
    if recipes.is_empty() {
        println!("No recipes yet. Use 'recipe add' or 'seed' to create some.");
        return;
    }

    let name_width = recipes.iter().map(|r| r.name.len()).max().unwrap_or(10);

    println!();
    println!("=== Recipes ({}) ===", recipes.len());
    println!();
    for recipe in recipes {
        println!(
            "{:>4}  {:<width$}  {:<12} {:>3} portions  {:>10}",
            recipe.id,
            recipe.name,
            recipe.category.label(),
            recipe.default_portions,
            format_money(recipe.base_cost() as f64),
            width = name_width
        );
    }
    println!();
}

/// Display one recipe with its ingredient list.
pub fn display_recipe(recipe: &Recipe) {
    println!();
    println!("=== {} (#{}) ===", recipe.name, recipe.id);
    if let Some(description) = &recipe.description {
        println!("{}", description);
    }
    println!(
        "Category: {}  |  Reference portions: {}",
        recipe.category, recipe.default_portions
    );
    println!();

    if recipe.ingredients.is_empty() {
        println!("  (no ingredients)");
    }
    for ing in &recipe.ingredients {
        println!(
            "  {:<24} {:>8} {:<8} {:>10}",
            ing.name,
            ing.quantity,
            ing.unit,
            format_money(ing.price_per_unit as f64)
        );
    }

    println!();
    println!(
        "Cost for {} portions: {}",
        recipe.default_portions,
        format_money(recipe_cost(recipe, recipe.default_portions))
    );
    println!();
}

/// Display plan headers.
pub fn display_plan_list(plans: &[&MenuPlan]) {
    if plans.is_empty() {
        println!("No menu plans yet. Use 'plan create' to start one.");
        return;
    }

    println!();
    println!("=== Menu plans ({}) ===", plans.len());
    println!();
    for plan in plans {
        let budget = plan
            .daily_budget()
            .map(|b| format!("{}/day", format_money(b as f64)))
            .unwrap_or_else(|| "no budget".to_string());
        println!(
            "{:>4}  {:<24} {} .. {}  {:<8} {:>3} entries  {}",
            plan.id,
            plan.name,
            plan.start_date,
            plan.end_date,
            plan.status,
            plan.entries.len(),
            budget
        );
    }
    println!();
}

/// Display a plan's entries day by day with their costs.
pub fn display_plan(snapshot: &PlanSnapshot) {
    let plan = snapshot.plan;

    println!();
    println!("=== {} (#{}) ===", plan.name, plan.id);
    if let Some(description) = &plan.description {
        println!("{}", description);
    }
    println!(
        "{} .. {} ({} days)  |  Status: {}",
        plan.start_date,
        plan.end_date,
        plan.day_count(),
        plan.status
    );
    println!();

    for day in plan.days() {
        let entries: Vec<_> = snapshot
            .entries
            .iter()
            .filter(|e| e.entry.date == day)
            .collect();
        if entries.is_empty() {
            continue;
        }

        println!("{} ({})", day, day.format("%A"));
        for entry in entries {
            println!(
                "  {:<10} {:>10}  (entry #{})",
                entry.entry.meal_type,
                format_money(compute_entry_cost(entry)),
                entry.entry.id
            );
            for line in entry_cost_breakdown(entry) {
                let tag = if line.is_alternative { " (alternative)" } else { "" };
                println!(
                    "      {} x{} {}{}",
                    line.recipe_name,
                    line.portions,
                    format_money(line.cost),
                    tag
                );
            }
            for attachment in entry.attachments.iter().filter(|a| !a.attachment.is_selected) {
                println!(
                    "      {} x{} (not selected, #{})",
                    attachment.recipe.name, attachment.attachment.portions, attachment.attachment.id
                );
            }
            if let Some(notes) = &entry.entry.notes {
                println!("      Note: {}", notes);
            }
        }
    }
    println!();
}

/// Display per-day costs against the daily budget.
pub fn display_budget(summary: &BudgetSummary) {
    println!();
    println!("=== Budget ===");
    println!();

    let limit = summary.day_limit();
    for day in &summary.days {
        let marker = if day.is_over_budget { "  OVER BUDGET" } else { "" };
        let against = summary
            .max_budget_per_day
            .map(|max| format!(" / {}", format_money(max as f64)))
            .unwrap_or_default();
        println!(
            "{} {}  {:>2} meals  {:>10}{}{}",
            day.date,
            day.date.format("%a"),
            day.entry_count,
            format_money(day.cost),
            against,
            marker
        );
    }

    println!();
    println!("--- Summary ---");
    println!("Total cost: {}", format_money(summary.total_cost));
    println!("Average per day: {}", format_money(summary.average_per_day()));
    match (summary.max_budget_per_day, limit) {
        (Some(max), Some(limit)) => {
            println!(
                "Daily budget: {} (+{}% tolerance = {})",
                format_money(max as f64),
                summary.budget_tolerance,
                format_money(limit)
            );
            println!("Days over budget: {}", summary.over_budget_count());
        }
        _ => println!("Daily budget: not set"),
    }
    println!();
}

/// Display order list header and items.
pub fn display_order_list(snapshot: &OrderListSnapshot) {
    let list = snapshot.order_list;

    println!();
    println!("=== {} (#{}) ===", list.name, list.id);
    let source = list
        .menu_plan_id
        .map(|id| format!("plan #{}", id))
        .unwrap_or_else(|| "manual".to_string());
    println!(
        "Status: {}  |  Created: {}  |  Source: {}",
        list.status, list.created_on, source
    );
    if let Some(notes) = &list.notes {
        println!("Notes: {}", notes);
    }
    println!();

    if snapshot.items.is_empty() {
        println!("  (no items)");
    }
    for enriched in &snapshot.items {
        let item = enriched.item;
        println!(
            "{:>4}. {}  {:<28} x{:<4} lead {}d, prep {}h -> order on {}",
            item.id,
            item.order_day,
            enriched.recipe.name,
            item.portions,
            item.lead_time,
            item.preparation_time,
            item.actual_order_day()
        );
    }
    println!();
}

/// Display consolidated ingredients by order day.
pub fn display_consolidated(by_day: &IngredientsByDay) {
    if by_day.is_empty() {
        println!("Nothing to order.");
        return;
    }

    println!("=== Ingredients by order day ===");
    for (day, ingredients) in by_day {
        println!();
        println!("{} ({})", day, day.format("%A"));
        for ing in ingredients {
            println!(
                "  {:<24} {:>10.2} {:<8} {:>10}",
                ing.name,
                ing.total_quantity,
                ing.unit,
                format_money(ing.total_price)
            );
        }
        println!("  {:<44}{:>10}", "Day total", format_money(day_total(ingredients)));
    }

    println!();
    println!("Order list total: {}", format_money(list_total(by_day)));
    println!();
}
