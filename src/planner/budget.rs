use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::PlanSnapshot;
use crate::planner::cost::compute_entry_cost;

/// Cost of one calendar day of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBudget {
    pub date: NaiveDate,
    pub cost: f64,
    pub entry_count: usize,
    pub is_over_budget: bool,
}

/// Budget view of a whole plan.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub days: Vec<DayBudget>,

    /// Sum of every entry cost, independent of day grouping.
    pub total_cost: f64,

    /// Configured daily budget in cents, `None` when unconstrained.
    pub max_budget_per_day: Option<i64>,

    pub budget_tolerance: f64,
}

impl BudgetSummary {
    /// Highest accepted day cost, budget plus tolerance.
    pub fn day_limit(&self) -> Option<f64> {
        self.max_budget_per_day
            .map(|max| budget_limit(max, self.budget_tolerance))
    }

    pub fn over_budget_days(&self) -> impl Iterator<Item = &DayBudget> {
        self.days.iter().filter(|d| d.is_over_budget)
    }

    pub fn over_budget_count(&self) -> usize {
        self.over_budget_days().count()
    }

    /// Average cost per planned day.
    pub fn average_per_day(&self) -> f64 {
        if self.days.is_empty() {
            0.0
        } else {
            self.total_cost / self.days.len() as f64
        }
    }
}

/// Highest accepted day cost for a budget and tolerance percent.
pub fn budget_limit(max_budget_per_day: i64, tolerance_percent: f64) -> f64 {
    max_budget_per_day as f64 * (1.0 + tolerance_percent / 100.0)
}

/// A day is over budget when a positive budget is set and its cost exceeds
/// the budget widened by the tolerance.
pub fn is_over_budget(day_cost: f64, max_budget_per_day: i64, tolerance_percent: f64) -> bool {
    max_budget_per_day > 0 && day_cost > budget_limit(max_budget_per_day, tolerance_percent)
}

/// Sum of all entry costs in the plan.
pub fn compute_plan_total(snapshot: &PlanSnapshot) -> f64 {
    snapshot.entries.iter().map(compute_entry_cost).sum()
}

/// Entry costs grouped by calendar day.
///
/// Every day of the plan range is present, days without entries at 0.
/// Entries dated outside the range still get their own key so the values
/// always add up to the plan total.
pub fn compute_budget_by_day(snapshot: &PlanSnapshot) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, f64> = snapshot.plan.days().map(|d| (d, 0.0)).collect();

    for entry in &snapshot.entries {
        let date = entry.entry.date;
        if !snapshot.plan.contains_date(date) {
            tracing::warn!(
                plan = snapshot.plan.id,
                entry = entry.entry.id,
                %date,
                "entry dated outside its plan range"
            );
        }
        *by_day.entry(date).or_insert(0.0) += compute_entry_cost(entry);
    }

    by_day
}

/// Per-day costs with over-budget flags plus the plan total.
pub fn summarize_budget(snapshot: &PlanSnapshot) -> BudgetSummary {
    let plan = snapshot.plan;
    let max_budget = plan.daily_budget();
    let by_day = compute_budget_by_day(snapshot);

    let days: Vec<DayBudget> = by_day
        .into_iter()
        .map(|(date, cost)| DayBudget {
            date,
            cost,
            entry_count: snapshot
                .entries
                .iter()
                .filter(|e| e.entry.date == date)
                .count(),
            is_over_budget: max_budget
                .map(|max| is_over_budget(cost, max, plan.budget_tolerance))
                .unwrap_or(false),
        })
        .collect();

    let summary = BudgetSummary {
        total_cost: compute_plan_total(snapshot),
        days,
        max_budget_per_day: max_budget,
        budget_tolerance: plan.budget_tolerance,
    };

    tracing::debug!(
        plan = plan.id,
        total = summary.total_cost,
        over_budget = summary.over_budget_count(),
        "budget summarized"
    );

    summary
}
