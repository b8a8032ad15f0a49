use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MenuError;
use crate::planner::constants::DEFAULT_BUDGET_TOLERANCE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(MenuError::InvalidInput(format!("Unknown meal type '{}'", s))),
        }
    }
}

/// Lifecycle label of a plan. Transitions are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Draft,
    Template,
    Active,
    Archived,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Draft => "draft",
            PlanStatus::Template => "template",
            PlanStatus::Active => "active",
            PlanStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PlanStatus {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(PlanStatus::Draft),
            "template" => Ok(PlanStatus::Template),
            "active" => Ok(PlanStatus::Active),
            "archived" => Ok(PlanStatus::Archived),
            _ => Err(MenuError::InvalidInput(format!("Unknown plan status '{}'", s))),
        }
    }
}

fn default_tolerance() -> f64 {
    DEFAULT_BUDGET_TOLERANCE
}

fn default_selected() -> bool {
    true
}

/// An additional recipe linked to an entry beyond its primary recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPlanRecipe {
    pub id: u32,

    pub recipe_id: u32,

    pub portions: u32,

    /// Unselected attachments are ignored by cost and order aggregation.
    #[serde(default = "default_selected")]
    pub is_selected: bool,

    /// Display label only; does not affect aggregation.
    #[serde(default)]
    pub is_alternative: bool,

    #[serde(default)]
    pub sort_order: u32,
}

/// One scheduled meal within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPlanEntry {
    pub id: u32,

    pub date: NaiveDate,

    pub meal_type: MealType,

    pub recipe_id: u32,

    pub portions: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub attachments: Vec<MenuPlanRecipe>,
}

impl MenuPlanEntry {
    /// All attachments ordered by `sort_order`.
    pub fn attachments_sorted(&self) -> Vec<&MenuPlanRecipe> {
        let mut sorted: Vec<&MenuPlanRecipe> = self.attachments.iter().collect();
        sorted.sort_by_key(|a| (a.sort_order, a.id));
        sorted
    }

    /// Attachments that take part in aggregation, in sort order.
    pub fn selected_attachments(&self) -> impl Iterator<Item = &MenuPlanRecipe> {
        self.attachments_sorted()
            .into_iter()
            .filter(|a| a.is_selected)
    }
}

/// A dated menu plan with its entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPlan {
    pub id: u32,

    pub owner_id: u32,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    /// Inclusive.
    pub end_date: NaiveDate,

    #[serde(default)]
    pub status: PlanStatus,

    /// Cents; `None` or 0 leaves days unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget_per_day: Option<i64>,

    /// Percent above the daily budget still accepted.
    #[serde(default = "default_tolerance")]
    pub budget_tolerance: f64,

    #[serde(default)]
    pub entries: Vec<MenuPlanEntry>,
}

impl MenuPlan {
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Every calendar day of the plan, start to end inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }

    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Daily budget in cents when one is configured.
    pub fn daily_budget(&self) -> Option<i64> {
        self.max_budget_per_day.filter(|b| *b > 0)
    }

    pub fn entry(&self, entry_id: u32) -> Option<&MenuPlanEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample_plan() -> MenuPlan {
        MenuPlan {
            id: 1,
            owner_id: 1,
            name: "Week 12".to_string(),
            description: None,
            start_date: date("2024-03-18"),
            end_date: date("2024-03-24"),
            status: PlanStatus::Draft,
            max_budget_per_day: Some(0),
            budget_tolerance: 10.0,
            entries: Vec::new(),
        }
    }

    #[test]
    fn test_days_inclusive() {
        let plan = sample_plan();
        let days: Vec<NaiveDate> = plan.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(plan.day_count(), 7);
        assert_eq!(days[0], date("2024-03-18"));
        assert_eq!(days[6], date("2024-03-24"));
    }

    #[test]
    fn test_zero_budget_is_unconstrained() {
        let mut plan = sample_plan();
        assert_eq!(plan.daily_budget(), None);
        plan.max_budget_per_day = Some(5000);
        assert_eq!(plan.daily_budget(), Some(5000));
    }

    #[test]
    fn test_selected_attachments_order() {
        let entry = MenuPlanEntry {
            id: 1,
            date: date("2024-03-18"),
            meal_type: MealType::Lunch,
            recipe_id: 1,
            portions: 4,
            notes: None,
            attachments: vec![
                MenuPlanRecipe {
                    id: 3,
                    recipe_id: 7,
                    portions: 2,
                    is_selected: true,
                    is_alternative: false,
                    sort_order: 1,
                },
                MenuPlanRecipe {
                    id: 4,
                    recipe_id: 8,
                    portions: 2,
                    is_selected: false,
                    is_alternative: false,
                    sort_order: 0,
                },
                MenuPlanRecipe {
                    id: 5,
                    recipe_id: 9,
                    portions: 2,
                    is_selected: true,
                    is_alternative: true,
                    sort_order: 0,
                },
            ],
        };

        let ids: Vec<u32> = entry.selected_attachments().map(|a| a.recipe_id).collect();
        assert_eq!(ids, vec![9, 7]);
    }

    #[test]
    fn test_status_and_meal_parse() {
        assert_eq!("Active".parse::<PlanStatus>().unwrap(), PlanStatus::Active);
        assert_eq!("DINNER".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_missing_tolerance_defaults() {
        let json = r#"{"id":1,"owner_id":1,"name":"X","start_date":"2024-01-01","end_date":"2024-01-02"}"#;
        let plan: MenuPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.budget_tolerance, 10.0);
        assert_eq!(plan.status, PlanStatus::Draft);
        assert!(plan.entries.is_empty());
    }
}
