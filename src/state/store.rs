use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::models::{
    EnrichedAttachment, EnrichedEntry, EnrichedOrderItem, Ingredient, MealType, MenuPlan,
    MenuPlanEntry, MenuPlanRecipe, OrderList, OrderListSnapshot, OrderListStatus, PlanSnapshot,
    PlanStatus, Recipe, RecipeCategory,
};
use crate::planner::constants::{
    COPY_SUFFIX, DEFAULT_BUDGET_TOLERANCE, MAX_PORTIONS, portions_in_range,
};
use crate::planner::orders;

/// Serialized form of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub recipes: Vec<Recipe>,

    #[serde(default)]
    pub menu_plans: Vec<MenuPlan>,

    #[serde(default)]
    pub order_lists: Vec<OrderList>,

    /// Last id handed out, shared by every entity kind.
    #[serde(default)]
    pub last_id: u32,
}

/// Fields for a new recipe.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub category: RecipeCategory,
    pub default_portions: u32,
    pub ingredients: Vec<Ingredient>,
}

/// Partial recipe update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<RecipeCategory>,
    pub default_portions: Option<u32>,
    /// Replaces the whole ingredient list.
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Fields for a new plan.
#[derive(Debug, Clone)]
pub struct NewPlan {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PlanStatus,
    pub max_budget_per_day: Option<i64>,
    pub budget_tolerance: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<PlanStatus>,
    pub max_budget_per_day: Option<i64>,
    pub budget_tolerance: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: u32,
    pub portions: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct OrderListUpdate {
    pub name: Option<String>,
    pub status: Option<OrderListStatus>,
    pub notes: Option<String>,
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(MenuError::InvalidInput("Name must not be empty".to_string()));
    }
    Ok(())
}

fn check_portions(portions: u32) -> Result<()> {
    if !portions_in_range(portions) {
        return Err(MenuError::InvalidInput(format!(
            "Portions must be between 1 and {}, got {}",
            MAX_PORTIONS, portions
        )));
    }
    Ok(())
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end < start {
        return Err(MenuError::InvalidInput(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }
    Ok(())
}

fn check_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(MenuError::InvalidInput(format!(
            "Budget tolerance must be a non-negative percent, got {}",
            tolerance
        )));
    }
    Ok(())
}

fn check_budget(budget: i64) -> Result<()> {
    if budget < 0 {
        return Err(MenuError::InvalidInput(format!(
            "Daily budget must not be negative, got {}",
            budget
        )));
    }
    Ok(())
}

/// Recipes, plans and order lists of every user.
///
/// Every lookup is scoped by owner; rows of another user report not-found.
#[derive(Debug, Clone, Default)]
pub struct MenuStore {
    data: StoreData,
}

impl MenuStore {
    pub fn new(data: StoreData) -> Self {
        Self { data }
    }

    pub fn to_data(&self) -> StoreData {
        self.data.clone()
    }

    fn next_id(&mut self) -> u32 {
        self.data.last_id += 1;
        self.data.last_id
    }

    // ── Recipes ────────────────────────────────────────────────────────────

    /// Recipes of `owner`, sorted by name.
    pub fn recipes(&self, owner: u32) -> Vec<&Recipe> {
        let mut recipes: Vec<&Recipe> = self
            .data
            .recipes
            .iter()
            .filter(|r| r.owner_id == owner)
            .collect();
        recipes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        recipes
    }

    pub fn recipe(&self, owner: u32, id: u32) -> Result<&Recipe> {
        self.data
            .recipes
            .iter()
            .find(|r| r.id == id && r.owner_id == owner)
            .ok_or(MenuError::RecipeNotFound(id))
    }

    fn recipe_mut(&mut self, owner: u32, id: u32) -> Result<&mut Recipe> {
        self.data
            .recipes
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner)
            .ok_or(MenuError::RecipeNotFound(id))
    }

    pub fn create_recipe(&mut self, owner: u32, new: NewRecipe) -> Result<&Recipe> {
        check_name(&new.name)?;
        check_portions(new.default_portions)?;

        let id = self.next_id();
        self.data.recipes.push(Recipe {
            id,
            owner_id: owner,
            name: new.name,
            description: new.description,
            category: new.category,
            default_portions: new.default_portions,
            ingredients: new.ingredients,
        });
        tracing::info!(recipe = id, owner, "recipe created");
        self.recipe(owner, id)
    }

    pub fn update_recipe(&mut self, owner: u32, id: u32, update: RecipeUpdate) -> Result<&Recipe> {
        if let Some(name) = &update.name {
            check_name(name)?;
        }
        if let Some(portions) = update.default_portions {
            check_portions(portions)?;
        }

        let recipe = self.recipe_mut(owner, id)?;
        if let Some(name) = update.name {
            recipe.name = name;
        }
        if let Some(description) = update.description {
            recipe.description = Some(description);
        }
        if let Some(category) = update.category {
            recipe.category = category;
        }
        if let Some(portions) = update.default_portions {
            recipe.default_portions = portions;
        }
        if let Some(ingredients) = update.ingredients {
            recipe.ingredients = ingredients;
        }
        tracing::info!(recipe = id, "recipe updated");
        self.recipe(owner, id)
    }

    /// Delete a recipe and its ingredients. References from plans and order
    /// lists are left in place.
    pub fn delete_recipe(&mut self, owner: u32, id: u32) -> Result<Recipe> {
        let pos = self
            .data
            .recipes
            .iter()
            .position(|r| r.id == id && r.owner_id == owner)
            .ok_or(MenuError::RecipeNotFound(id))?;
        tracing::info!(recipe = id, "recipe deleted");
        Ok(self.data.recipes.remove(pos))
    }

    // ── Menu plans ─────────────────────────────────────────────────────────

    /// Plans of `owner`, newest start date first.
    pub fn plans(&self, owner: u32) -> Vec<&MenuPlan> {
        let mut plans: Vec<&MenuPlan> = self
            .data
            .menu_plans
            .iter()
            .filter(|p| p.owner_id == owner)
            .collect();
        plans.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(b.id.cmp(&a.id)));
        plans
    }

    pub fn plan(&self, owner: u32, id: u32) -> Result<&MenuPlan> {
        self.data
            .menu_plans
            .iter()
            .find(|p| p.id == id && p.owner_id == owner)
            .ok_or(MenuError::PlanNotFound(id))
    }

    fn plan_mut(&mut self, owner: u32, id: u32) -> Result<&mut MenuPlan> {
        self.data
            .menu_plans
            .iter_mut()
            .find(|p| p.id == id && p.owner_id == owner)
            .ok_or(MenuError::PlanNotFound(id))
    }

    pub fn create_plan(&mut self, owner: u32, new: NewPlan) -> Result<&MenuPlan> {
        check_name(&new.name)?;
        check_range(new.start_date, new.end_date)?;
        let tolerance = new.budget_tolerance.unwrap_or(DEFAULT_BUDGET_TOLERANCE);
        check_tolerance(tolerance)?;
        if let Some(budget) = new.max_budget_per_day {
            check_budget(budget)?;
        }

        let id = self.next_id();
        self.data.menu_plans.push(MenuPlan {
            id,
            owner_id: owner,
            name: new.name,
            description: new.description,
            start_date: new.start_date,
            end_date: new.end_date,
            status: new.status,
            max_budget_per_day: new.max_budget_per_day,
            budget_tolerance: tolerance,
            entries: Vec::new(),
        });
        tracing::info!(plan = id, owner, "menu plan created");
        self.plan(owner, id)
    }

    /// Apply a partial update. A changed date range must still contain every
    /// existing entry.
    pub fn update_plan(&mut self, owner: u32, id: u32, update: PlanUpdate) -> Result<&MenuPlan> {
        if let Some(name) = &update.name {
            check_name(name)?;
        }
        if let Some(tolerance) = update.budget_tolerance {
            check_tolerance(tolerance)?;
        }
        if let Some(budget) = update.max_budget_per_day {
            check_budget(budget)?;
        }

        let plan = self.plan_mut(owner, id)?;
        let start = update.start_date.unwrap_or(plan.start_date);
        let end = update.end_date.unwrap_or(plan.end_date);
        check_range(start, end)?;
        if let Some(outside) = plan
            .entries
            .iter()
            .find(|e| e.date < start || e.date > end)
        {
            return Err(MenuError::InvalidInput(format!(
                "Entry {} on {} would fall outside {} .. {}",
                outside.id, outside.date, start, end
            )));
        }

        plan.start_date = start;
        plan.end_date = end;
        if let Some(name) = update.name {
            plan.name = name;
        }
        if let Some(description) = update.description {
            plan.description = Some(description);
        }
        if let Some(status) = update.status {
            plan.status = status;
        }
        if let Some(budget) = update.max_budget_per_day {
            plan.max_budget_per_day = Some(budget);
        }
        if let Some(tolerance) = update.budget_tolerance {
            plan.budget_tolerance = tolerance;
        }
        tracing::info!(plan = id, "menu plan updated");
        self.plan(owner, id)
    }

    /// Delete a plan with its entries and attachments.
    pub fn delete_plan(&mut self, owner: u32, id: u32) -> Result<MenuPlan> {
        let pos = self
            .data
            .menu_plans
            .iter()
            .position(|p| p.id == id && p.owner_id == owner)
            .ok_or(MenuError::PlanNotFound(id))?;
        tracing::info!(plan = id, "menu plan deleted");
        Ok(self.data.menu_plans.remove(pos))
    }

    /// Copy a plan to a new date range.
    ///
    /// Entries move by the distance between the old and new start dates;
    /// attachments keep their flags and sort order.
    pub fn duplicate_plan(
        &mut self,
        owner: u32,
        id: u32,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> Result<&MenuPlan> {
        check_range(new_start, new_end)?;
        let source = self.plan(owner, id)?.clone();
        let shift = new_start - source.start_date;

        let new_id = self.next_id();
        let mut entries = Vec::with_capacity(source.entries.len());
        for entry in &source.entries {
            let entry_id = self.next_id();
            let attachments = entry
                .attachments
                .iter()
                .map(|a| MenuPlanRecipe {
                    id: self.next_id(),
                    ..a.clone()
                })
                .collect();
            let date = entry.date.checked_add_signed(shift).ok_or_else(|| {
                MenuError::InvalidInput(format!("Cannot move entry {} by {}", entry.id, shift))
            })?;
            entries.push(MenuPlanEntry {
                id: entry_id,
                date,
                attachments,
                ..entry.clone()
            });
        }

        if let Some(outside) = entries
            .iter()
            .find(|e| e.date < new_start || e.date > new_end)
        {
            return Err(MenuError::InvalidInput(format!(
                "Entry copied to {} would fall outside {} .. {}",
                outside.date, new_start, new_end
            )));
        }

        self.data.menu_plans.push(MenuPlan {
            id: new_id,
            name: format!("{}{}", source.name, COPY_SUFFIX),
            start_date: new_start,
            end_date: new_end,
            entries,
            ..source
        });
        tracing::info!(plan = new_id, source = id, "menu plan duplicated");
        self.plan(owner, new_id)
    }

    // ── Entries and attachments ────────────────────────────────────────────

    /// Find the plan holding `entry_id`.
    fn plan_of_entry(&self, owner: u32, entry_id: u32) -> Result<&MenuPlan> {
        self.data
            .menu_plans
            .iter()
            .filter(|p| p.owner_id == owner)
            .find(|p| p.entries.iter().any(|e| e.id == entry_id))
            .ok_or(MenuError::EntryNotFound(entry_id))
    }

    fn entry_mut(&mut self, owner: u32, entry_id: u32) -> Result<&mut MenuPlanEntry> {
        self.data
            .menu_plans
            .iter_mut()
            .filter(|p| p.owner_id == owner)
            .flat_map(|p| p.entries.iter_mut())
            .find(|e| e.id == entry_id)
            .ok_or(MenuError::EntryNotFound(entry_id))
    }

    pub fn entry(&self, owner: u32, entry_id: u32) -> Result<&MenuPlanEntry> {
        self.plan_of_entry(owner, entry_id)?
            .entry(entry_id)
            .ok_or(MenuError::EntryNotFound(entry_id))
    }

    /// Plan id of the plan that holds `entry_id`.
    pub fn entry_plan_id(&self, owner: u32, entry_id: u32) -> Result<u32> {
        Ok(self.plan_of_entry(owner, entry_id)?.id)
    }

    pub fn add_entry(&mut self, owner: u32, plan_id: u32, new: NewEntry) -> Result<&MenuPlanEntry> {
        check_portions(new.portions)?;
        self.recipe(owner, new.recipe_id)?;

        let plan = self.plan(owner, plan_id)?;
        if !plan.contains_date(new.date) {
            return Err(MenuError::InvalidInput(format!(
                "Date {} is outside plan range {} .. {}",
                new.date, plan.start_date, plan.end_date
            )));
        }

        let id = self.next_id();
        let plan = self.plan_mut(owner, plan_id)?;
        plan.entries.push(MenuPlanEntry {
            id,
            date: new.date,
            meal_type: new.meal_type,
            recipe_id: new.recipe_id,
            portions: new.portions,
            notes: new.notes,
            attachments: Vec::new(),
        });
        tracing::info!(plan = plan_id, entry = id, "entry added");
        self.entry(owner, id)
    }

    pub fn update_entry(
        &mut self,
        owner: u32,
        entry_id: u32,
        portions: Option<u32>,
        notes: Option<String>,
    ) -> Result<&MenuPlanEntry> {
        if let Some(p) = portions {
            check_portions(p)?;
        }
        let entry = self.entry_mut(owner, entry_id)?;
        if let Some(p) = portions {
            entry.portions = p;
        }
        if let Some(n) = notes {
            entry.notes = Some(n);
        }
        tracing::info!(entry = entry_id, "entry updated");
        self.entry(owner, entry_id)
    }

    /// Remove an entry and its attachments.
    pub fn delete_entry(&mut self, owner: u32, entry_id: u32) -> Result<MenuPlanEntry> {
        let plan_id = self.entry_plan_id(owner, entry_id)?;
        let plan = self.plan_mut(owner, plan_id)?;
        let pos = plan
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(MenuError::EntryNotFound(entry_id))?;
        tracing::info!(plan = plan_id, entry = entry_id, "entry deleted");
        Ok(plan.entries.remove(pos))
    }

    /// Attach another recipe to an entry, selected and last in sort order.
    pub fn add_attachment(
        &mut self,
        owner: u32,
        entry_id: u32,
        recipe_id: u32,
        portions: u32,
        is_alternative: bool,
    ) -> Result<&MenuPlanRecipe> {
        check_portions(portions)?;
        self.recipe(owner, recipe_id)?;

        let id = self.next_id();
        let entry = self.entry_mut(owner, entry_id)?;
        let sort_order = entry.attachments.len() as u32;
        entry.attachments.push(MenuPlanRecipe {
            id,
            recipe_id,
            portions,
            is_selected: true,
            is_alternative,
            sort_order,
        });
        tracing::info!(entry = entry_id, attachment = id, "recipe attached");
        self.attachment(owner, id)
    }

    pub fn attachment(&self, owner: u32, attachment_id: u32) -> Result<&MenuPlanRecipe> {
        self.data
            .menu_plans
            .iter()
            .filter(|p| p.owner_id == owner)
            .flat_map(|p| p.entries.iter())
            .flat_map(|e| e.attachments.iter())
            .find(|a| a.id == attachment_id)
            .ok_or(MenuError::AttachmentNotFound(attachment_id))
    }

    /// Entry holding `attachment_id`.
    pub fn attachment_entry_id(&self, owner: u32, attachment_id: u32) -> Result<u32> {
        self.data
            .menu_plans
            .iter()
            .filter(|p| p.owner_id == owner)
            .flat_map(|p| p.entries.iter())
            .find(|e| e.attachments.iter().any(|a| a.id == attachment_id))
            .map(|e| e.id)
            .ok_or(MenuError::AttachmentNotFound(attachment_id))
    }

    fn attachment_mut(&mut self, owner: u32, attachment_id: u32) -> Result<&mut MenuPlanRecipe> {
        self.data
            .menu_plans
            .iter_mut()
            .filter(|p| p.owner_id == owner)
            .flat_map(|p| p.entries.iter_mut())
            .flat_map(|e| e.attachments.iter_mut())
            .find(|a| a.id == attachment_id)
            .ok_or(MenuError::AttachmentNotFound(attachment_id))
    }

    pub fn update_attachment(
        &mut self,
        owner: u32,
        attachment_id: u32,
        portions: Option<u32>,
        is_selected: Option<bool>,
    ) -> Result<&MenuPlanRecipe> {
        if let Some(p) = portions {
            check_portions(p)?;
        }
        let attachment = self.attachment_mut(owner, attachment_id)?;
        if let Some(p) = portions {
            attachment.portions = p;
        }
        if let Some(selected) = is_selected {
            attachment.is_selected = selected;
        }
        tracing::info!(attachment = attachment_id, "attachment updated");
        self.attachment(owner, attachment_id)
    }

    pub fn remove_attachment(&mut self, owner: u32, attachment_id: u32) -> Result<MenuPlanRecipe> {
        let entry_id = self.attachment_entry_id(owner, attachment_id)?;
        let entry = self.entry_mut(owner, entry_id)?;
        let pos = entry
            .attachments
            .iter()
            .position(|a| a.id == attachment_id)
            .ok_or(MenuError::AttachmentNotFound(attachment_id))?;
        tracing::info!(entry = entry_id, attachment = attachment_id, "attachment removed");
        Ok(entry.attachments.remove(pos))
    }

    /// Resolve every recipe a plan references.
    ///
    /// Fails with `RecipeNotFound` on the first dangling reference.
    pub fn plan_snapshot(&self, owner: u32, plan_id: u32) -> Result<PlanSnapshot<'_>> {
        let plan = self.plan(owner, plan_id)?;

        let mut entries = Vec::with_capacity(plan.entries.len());
        for entry in &plan.entries {
            let recipe = self.recipe(owner, entry.recipe_id)?;
            let mut attachments = Vec::with_capacity(entry.attachments.len());
            for attachment in entry.attachments_sorted() {
                attachments.push(EnrichedAttachment {
                    attachment,
                    recipe: self.recipe(owner, attachment.recipe_id)?,
                });
            }
            entries.push(EnrichedEntry {
                entry,
                recipe,
                attachments,
            });
        }
        entries.sort_by_key(|e| (e.entry.date, e.entry.meal_type, e.entry.id));

        Ok(PlanSnapshot { plan, entries })
    }

    // ── Order lists ────────────────────────────────────────────────────────

    /// Order lists of `owner`, newest first.
    pub fn order_lists(&self, owner: u32) -> Vec<&OrderList> {
        let mut lists: Vec<&OrderList> = self
            .data
            .order_lists
            .iter()
            .filter(|l| l.owner_id == owner)
            .collect();
        lists.sort_by(|a, b| b.created_on.cmp(&a.created_on).then(b.id.cmp(&a.id)));
        lists
    }

    pub fn order_list(&self, owner: u32, id: u32) -> Result<&OrderList> {
        self.data
            .order_lists
            .iter()
            .find(|l| l.id == id && l.owner_id == owner)
            .ok_or(MenuError::OrderListNotFound(id))
    }

    fn order_list_mut(&mut self, owner: u32, id: u32) -> Result<&mut OrderList> {
        self.data
            .order_lists
            .iter_mut()
            .find(|l| l.id == id && l.owner_id == owner)
            .ok_or(MenuError::OrderListNotFound(id))
    }

    /// Store `list` under a fresh id, owned by `owner`.
    fn insert_order_list(&mut self, owner: u32, mut list: OrderList) -> Result<&OrderList> {
        check_name(&list.name)?;
        let id = self.next_id();
        list.id = id;
        list.owner_id = owner;
        self.data.order_lists.push(list);
        self.order_list(owner, id)
    }

    /// Empty list created by hand, optionally tied to a plan.
    pub fn create_order_list(
        &mut self,
        owner: u32,
        name: &str,
        menu_plan_id: Option<u32>,
        notes: Option<String>,
        created_on: NaiveDate,
    ) -> Result<&OrderList> {
        if let Some(plan_id) = menu_plan_id {
            self.plan(owner, plan_id)?;
        }
        let list = OrderList {
            id: 0,
            owner_id: owner,
            menu_plan_id,
            name: name.to_string(),
            status: OrderListStatus::Draft,
            notes,
            created_on,
            items: Vec::new(),
        };
        let list = self.insert_order_list(owner, list)?;
        tracing::info!(order_list = list.id, "order list created");
        Ok(list)
    }

    /// Build and store a draft order list from a plan's entries.
    pub fn generate_order_list(
        &mut self,
        owner: u32,
        plan_id: u32,
        name: Option<&str>,
        created_on: NaiveDate,
    ) -> Result<&OrderList> {
        let snapshot = self.plan_snapshot(owner, plan_id)?;
        let list = orders::generate_order_list(snapshot.plan, name, created_on);
        let list = self.insert_order_list(owner, list)?;
        tracing::info!(
            order_list = list.id,
            plan = plan_id,
            items = list.items.len(),
            "order list generated from plan"
        );
        Ok(list)
    }

    pub fn update_order_list(
        &mut self,
        owner: u32,
        id: u32,
        update: OrderListUpdate,
    ) -> Result<&OrderList> {
        if let Some(name) = &update.name {
            check_name(name)?;
        }
        let list = self.order_list_mut(owner, id)?;
        if let Some(name) = update.name {
            list.name = name;
        }
        if let Some(status) = update.status {
            list.status = status;
        }
        if let Some(notes) = update.notes {
            list.notes = Some(notes);
        }
        tracing::info!(order_list = id, "order list updated");
        self.order_list(owner, id)
    }

    pub fn delete_order_list(&mut self, owner: u32, id: u32) -> Result<OrderList> {
        let pos = self
            .data
            .order_lists
            .iter()
            .position(|l| l.id == id && l.owner_id == owner)
            .ok_or(MenuError::OrderListNotFound(id))?;
        tracing::info!(order_list = id, "order list deleted");
        Ok(self.data.order_lists.remove(pos))
    }

    /// Set the lead time (days) and optionally preparation time (hours) of one item.
    pub fn set_item_timing(
        &mut self,
        owner: u32,
        list_id: u32,
        item_id: u32,
        lead_time: u32,
        preparation_time: Option<u32>,
    ) -> Result<&OrderList> {
        let list = self.order_list_mut(owner, list_id)?;
        let item = list
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or(MenuError::OrderItemNotFound {
                list: list_id,
                item: item_id,
            })?;
        item.lead_time = lead_time;
        if let Some(hours) = preparation_time {
            item.preparation_time = hours;
        }
        tracing::info!(order_list = list_id, item = item_id, lead_time, "item timing set");
        self.order_list(owner, list_id)
    }

    /// Resolve the recipe of every order item.
    pub fn order_list_snapshot(&self, owner: u32, id: u32) -> Result<OrderListSnapshot<'_>> {
        let order_list = self.order_list(owner, id)?;
        let items = order_list
            .items
            .iter()
            .map(|item| {
                Ok(EnrichedOrderItem {
                    item,
                    recipe: self.recipe(owner, item.recipe_id)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(OrderListSnapshot { order_list, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: u32 = 1;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn store_with_recipe() -> (MenuStore, u32) {
        let mut store = MenuStore::default();
        let id = store
            .create_recipe(
                OWNER,
                NewRecipe {
                    name: "Goulash".to_string(),
                    description: None,
                    category: RecipeCategory::MainCourse,
                    default_portions: 4,
                    ingredients: vec![Ingredient::new("Beef", "500", "g", 600)],
                },
            )
            .unwrap()
            .id;
        (store, id)
    }

    fn new_plan() -> NewPlan {
        NewPlan {
            name: "Week".to_string(),
            description: None,
            start_date: date(10),
            end_date: date(16),
            status: PlanStatus::Draft,
            max_budget_per_day: None,
            budget_tolerance: None,
        }
    }

    fn new_entry(recipe_id: u32, day: u32, portions: u32) -> NewEntry {
        NewEntry {
            date: date(day),
            meal_type: MealType::Lunch,
            recipe_id,
            portions,
            notes: None,
        }
    }

    #[test]
    fn test_owner_scoping() {
        let (store, recipe_id) = store_with_recipe();
        assert!(store.recipe(OWNER, recipe_id).is_ok());
        assert!(matches!(
            store.recipe(2, recipe_id),
            Err(MenuError::RecipeNotFound(_))
        ));
        assert!(store.recipes(2).is_empty());
    }

    #[test]
    fn test_create_recipe_validation() {
        let mut store = MenuStore::default();
        let result = store.create_recipe(
            OWNER,
            NewRecipe {
                name: "  ".to_string(),
                description: None,
                category: RecipeCategory::Other,
                default_portions: 4,
                ingredients: Vec::new(),
            },
        );
        assert!(matches!(result, Err(MenuError::InvalidInput(_))));
    }

    #[test]
    fn test_plan_defaults_and_range_check() {
        let mut store = MenuStore::default();
        let plan = store.create_plan(OWNER, new_plan()).unwrap();
        assert_eq!(plan.budget_tolerance, DEFAULT_BUDGET_TOLERANCE);

        let mut bad = new_plan();
        bad.end_date = date(1);
        assert!(store.create_plan(OWNER, bad).is_err());
    }

    #[test]
    fn test_add_entry_validates() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;

        assert!(store.add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 10)).is_ok());
        // Outside range
        assert!(store.add_entry(OWNER, plan_id, new_entry(recipe_id, 20, 10)).is_err());
        // Portions out of bounds
        assert!(store.add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 0)).is_err());
        assert!(store.add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 501)).is_err());
        // Unknown recipe
        assert!(matches!(
            store.add_entry(OWNER, plan_id, new_entry(999, 11, 4)),
            Err(MenuError::RecipeNotFound(999))
        ));

        assert_eq!(store.plan(OWNER, plan_id).unwrap().entries.len(), 1);
    }

    #[test]
    fn test_attachment_sort_order_and_cascade() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        let entry_id = store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 4))
            .unwrap()
            .id;

        let first = store
            .add_attachment(OWNER, entry_id, recipe_id, 2, false)
            .unwrap()
            .clone();
        let second = store
            .add_attachment(OWNER, entry_id, recipe_id, 2, true)
            .unwrap()
            .clone();
        assert_eq!(first.sort_order, 0);
        assert_eq!(second.sort_order, 1);
        assert!(second.is_selected);
        assert!(second.is_alternative);

        store.delete_entry(OWNER, entry_id).unwrap();
        assert!(store.attachment(OWNER, first.id).is_err());
    }

    #[test]
    fn test_update_plan_keeps_entries_in_range() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 15, 4))
            .unwrap();

        let shrink = PlanUpdate {
            end_date: Some(date(12)),
            ..Default::default()
        };
        assert!(store.update_plan(OWNER, plan_id, shrink).is_err());

        let rename = PlanUpdate {
            name: Some("Renamed".to_string()),
            status: Some(PlanStatus::Active),
            ..Default::default()
        };
        let plan = store.update_plan(OWNER, plan_id, rename).unwrap();
        assert_eq!(plan.name, "Renamed");
        assert_eq!(plan.status, PlanStatus::Active);
    }

    #[test]
    fn test_duplicate_plan_shifts_entries() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        let entry_id = store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 12, 4))
            .unwrap()
            .id;
        store
            .add_attachment(OWNER, entry_id, recipe_id, 3, true)
            .unwrap();

        let copy = store
            .duplicate_plan(OWNER, plan_id, date(17), date(23))
            .unwrap();
        assert_eq!(copy.name, "Week (copy)");
        assert_eq!(copy.entries.len(), 1);
        assert_eq!(copy.entries[0].date, date(19));
        assert_ne!(copy.entries[0].id, entry_id);
        assert_eq!(copy.entries[0].attachments.len(), 1);
        assert!(copy.entries[0].attachments[0].is_alternative);
    }

    #[test]
    fn test_duplicate_plan_rejects_too_short_range() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 15, 4))
            .unwrap();
        let plans_before = store.plans(OWNER).len();

        let result = store.duplicate_plan(OWNER, plan_id, date(20), date(21));
        assert!(matches!(result, Err(MenuError::InvalidInput(_))));
        assert_eq!(store.plans(OWNER).len(), plans_before);
    }

    #[test]
    fn test_generate_order_list_reports_dangling_recipe() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 4))
            .unwrap();
        store.delete_recipe(OWNER, recipe_id).unwrap();

        let result = store.generate_order_list(OWNER, plan_id, None, date(1));
        assert!(matches!(
            result,
            Err(MenuError::RecipeNotFound(id)) if id == recipe_id
        ));
        assert!(store.order_lists(OWNER).is_empty());
    }

    #[test]
    fn test_snapshot_reports_dangling_recipe() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 4))
            .unwrap();
        assert!(store.plan_snapshot(OWNER, plan_id).is_ok());

        store.delete_recipe(OWNER, recipe_id).unwrap();
        assert!(matches!(
            store.plan_snapshot(OWNER, plan_id),
            Err(MenuError::RecipeNotFound(id)) if id == recipe_id
        ));
    }

    #[test]
    fn test_item_timing() {
        let (mut store, recipe_id) = store_with_recipe();
        let plan_id = store.create_plan(OWNER, new_plan()).unwrap().id;
        store
            .add_entry(OWNER, plan_id, new_entry(recipe_id, 11, 4))
            .unwrap();
        let list_id = store
            .generate_order_list(OWNER, plan_id, None, date(1))
            .unwrap()
            .id;

        let list = store
            .set_item_timing(OWNER, list_id, 1, 3, Some(2))
            .unwrap();
        assert_eq!(list.items[0].lead_time, 3);
        assert_eq!(list.items[0].preparation_time, 2);

        assert!(matches!(
            store.set_item_timing(OWNER, list_id, 42, 1, None),
            Err(MenuError::OrderItemNotFound { item: 42, .. })
        ));
    }
}
