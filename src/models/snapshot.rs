//! Recipe-resolved views of plans and order lists.
//!
//! The store builds these from its rows; the planner only ever reads them.

use crate::models::{MenuPlan, MenuPlanEntry, MenuPlanRecipe, OrderList, OrderListItem, Recipe};

#[derive(Debug, Clone)]
pub struct EnrichedAttachment<'a> {
    pub attachment: &'a MenuPlanRecipe,
    pub recipe: &'a Recipe,
}

#[derive(Debug, Clone)]
pub struct EnrichedEntry<'a> {
    pub entry: &'a MenuPlanEntry,
    pub recipe: &'a Recipe,
    pub attachments: Vec<EnrichedAttachment<'a>>,
}

impl<'a> EnrichedEntry<'a> {
    /// Attachments that count towards cost and ordering.
    pub fn selected(&self) -> impl Iterator<Item = &EnrichedAttachment<'a>> {
        self.attachments.iter().filter(|a| a.attachment.is_selected)
    }
}

#[derive(Debug, Clone)]
pub struct PlanSnapshot<'a> {
    pub plan: &'a MenuPlan,
    pub entries: Vec<EnrichedEntry<'a>>,
}

#[derive(Debug, Clone)]
pub struct EnrichedOrderItem<'a> {
    pub item: &'a OrderListItem,
    pub recipe: &'a Recipe,
}

#[derive(Debug, Clone)]
pub struct OrderListSnapshot<'a> {
    pub order_list: &'a OrderList,
    pub items: Vec<EnrichedOrderItem<'a>>,
}
