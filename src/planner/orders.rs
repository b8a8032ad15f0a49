use chrono::NaiveDate;

use crate::models::{MenuPlan, OrderList, OrderListItem, OrderListStatus};

/// Procurement lines for a plan.
///
/// One line per entry for its primary recipe, followed by one line per
/// selected attachment (alternatives included), all on the entry's date.
/// Entries are walked by date then meal type so the list reads chronologically.
pub fn generate_order_items(plan: &MenuPlan) -> Vec<OrderListItem> {
    let mut entries: Vec<_> = plan.entries.iter().collect();
    entries.sort_by_key(|e| (e.date, e.meal_type, e.id));

    let mut items = Vec::new();
    let mut push = |recipe_id: u32, portions: u32, order_day: NaiveDate| {
        items.push(OrderListItem {
            id: items.len() as u32 + 1,
            recipe_id,
            portions,
            order_day,
            preparation_time: 0,
            lead_time: 0,
        });
    };

    for entry in entries {
        push(entry.recipe_id, entry.portions, entry.date);
        for attachment in entry.selected_attachments() {
            push(attachment.recipe_id, attachment.portions, entry.date);
        }
    }

    items
}

/// Name given to a generated list when the caller provides none.
pub fn default_order_list_name(created_on: NaiveDate) -> String {
    format!("Order list {}", created_on.format("%Y-%m-%d"))
}

/// Draft order list for `plan`, not yet persisted (`id` is 0).
pub fn generate_order_list(plan: &MenuPlan, name: Option<&str>, created_on: NaiveDate) -> OrderList {
    let items = generate_order_items(plan);
    tracing::debug!(plan = plan.id, items = items.len(), "order list generated");

    OrderList {
        id: 0,
        owner_id: plan.owner_id,
        menu_plan_id: Some(plan.id),
        name: name
            .map(str::to_string)
            .unwrap_or_else(|| default_order_list_name(created_on)),
        status: OrderListStatus::Draft,
        notes: None,
        created_on,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealType, MenuPlanEntry, MenuPlanRecipe, PlanStatus};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn attachment(id: u32, recipe_id: u32, selected: bool, alt: bool) -> MenuPlanRecipe {
        MenuPlanRecipe {
            id,
            recipe_id,
            portions: 3,
            is_selected: selected,
            is_alternative: alt,
            sort_order: id,
        }
    }

    fn plan_with(entries: Vec<MenuPlanEntry>) -> MenuPlan {
        MenuPlan {
            id: 9,
            owner_id: 2,
            name: "Spring".to_string(),
            description: None,
            start_date: date(10),
            end_date: date(16),
            status: PlanStatus::Active,
            max_budget_per_day: None,
            budget_tolerance: 10.0,
            entries,
        }
    }

    #[test]
    fn test_items_per_entry_and_selected_attachment() {
        let plan = plan_with(vec![
            MenuPlanEntry {
                id: 1,
                date: date(11),
                meal_type: MealType::Dinner,
                recipe_id: 5,
                portions: 20,
                notes: None,
                attachments: vec![
                    attachment(1, 6, true, false),
                    attachment(2, 7, false, false),
                    attachment(3, 8, true, true),
                ],
            },
            MenuPlanEntry {
                id: 2,
                date: date(10),
                meal_type: MealType::Lunch,
                recipe_id: 4,
                portions: 10,
                notes: None,
                attachments: Vec::new(),
            },
        ]);

        let items = generate_order_items(&plan);
        assert_eq!(items.len(), 4);

        let recipes: Vec<u32> = items.iter().map(|i| i.recipe_id).collect();
        assert_eq!(recipes, vec![4, 5, 6, 8]);
        assert_eq!(items[0].order_day, date(10));
        assert!(items[1..].iter().all(|i| i.order_day == date(11)));
        assert!(items.iter().all(|i| i.lead_time == 0 && i.preparation_time == 0));
        assert_eq!(items[2].portions, 3);

        let ids: Vec<u32> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_generate_order_list_is_draft() {
        let plan = plan_with(Vec::new());
        let list = generate_order_list(&plan, None, date(1));
        assert_eq!(list.status, OrderListStatus::Draft);
        assert_eq!(list.menu_plan_id, Some(9));
        assert_eq!(list.owner_id, 2);
        assert_eq!(list.name, "Order list 2024-03-01");
        assert!(list.items.is_empty());

        let named = generate_order_list(&plan, Some("Kitchen week 11"), date(1));
        assert_eq!(named.name, "Kitchen week 11");
    }
}
