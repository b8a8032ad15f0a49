use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::MenuError;

/// Lifecycle label of an order list. Transitions are not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderListStatus {
    #[default]
    Draft,
    Confirmed,
    Ordered,
    Archived,
}

impl OrderListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderListStatus::Draft => "draft",
            OrderListStatus::Confirmed => "confirmed",
            OrderListStatus::Ordered => "ordered",
            OrderListStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for OrderListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderListStatus {
    type Err = MenuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(OrderListStatus::Draft),
            "confirmed" => Ok(OrderListStatus::Confirmed),
            "ordered" => Ok(OrderListStatus::Ordered),
            "archived" => Ok(OrderListStatus::Archived),
            _ => Err(MenuError::InvalidInput(format!(
                "Unknown order list status '{}'",
                s
            ))),
        }
    }
}

/// One procurement line: a recipe instance to cook on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderListItem {
    /// Position-based id, unique within its list.
    pub id: u32,

    pub recipe_id: u32,

    pub portions: u32,

    /// Nominal day, taken from the originating plan entry.
    pub order_day: NaiveDate,

    /// Hours. Informational.
    #[serde(default)]
    pub preparation_time: u32,

    /// Days to order ahead of `order_day`.
    #[serde(default)]
    pub lead_time: u32,
}

impl OrderListItem {
    /// Day the ingredients have to be ordered: `order_day - lead_time`.
    pub fn actual_order_day(&self) -> NaiveDate {
        self.order_day
            .checked_sub_days(Days::new(u64::from(self.lead_time)))
            .unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderList {
    pub id: u32,

    pub owner_id: u32,

    /// Plan the list was generated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_plan_id: Option<u32>,

    pub name: String,

    #[serde(default)]
    pub status: OrderListStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_on: NaiveDate,

    #[serde(default)]
    pub items: Vec<OrderListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(order_day: &str, lead_time: u32) -> OrderListItem {
        OrderListItem {
            id: 1,
            recipe_id: 1,
            portions: 4,
            order_day: NaiveDate::parse_from_str(order_day, "%Y-%m-%d").unwrap(),
            preparation_time: 0,
            lead_time,
        }
    }

    #[test]
    fn test_actual_order_day_subtracts_lead_time() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        assert_eq!(item("2024-03-10", 2).actual_order_day(), expected);
    }

    #[test]
    fn test_actual_order_day_crosses_month() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(item("2024-03-01", 2).actual_order_day(), expected);
    }

    #[test]
    fn test_zero_lead_time_keeps_day() {
        let it = item("2024-03-10", 0);
        assert_eq!(it.actual_order_day(), it.order_day);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "Confirmed".parse::<OrderListStatus>().unwrap(),
            OrderListStatus::Confirmed
        );
        assert!("shipped".parse::<OrderListStatus>().is_err());
    }
}
