use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{MenuError, Result};
use crate::models::{Ingredient, OrderListSnapshot, OrderListStatus};
use crate::planner::constants::CENTS_PER_UNIT;
use crate::planner::{IngredientsByDay, consolidate_ingredients, list_total};

/// Output format of `order export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportItem<'a> {
    order_day: NaiveDate,
    actual_order_day: NaiveDate,
    recipe: &'a str,
    portions: u32,
    lead_time: u32,
    ingredients: &'a [Ingredient],
}

#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    name: &'a str,
    status: OrderListStatus,
    created_on: NaiveDate,
    menu_plan_id: Option<u32>,
    items: Vec<ExportItem<'a>>,
    ingredients_by_day: &'a IngredientsByDay,
    total_price: f64,
}

fn major_units(cents: f64) -> String {
    format!("{:.2}", cents / CENTS_PER_UNIT)
}

/// Write the CSV export: an item section followed by an ingredient section.
pub fn write_order_csv<W: Write>(
    snapshot: &OrderListSnapshot,
    by_day: &IngredientsByDay,
    writer: W,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["order_day", "recipe", "portions"])?;
    for enriched in &snapshot.items {
        wtr.write_record([
            enriched.item.order_day.to_string(),
            enriched.recipe.name.clone(),
            enriched.item.portions.to_string(),
        ])?;
    }

    wtr.write_record(["order_day", "ingredient", "quantity", "unit", "price"])?;
    for (day, ingredients) in by_day {
        for ing in ingredients {
            wtr.write_record([
                day.to_string(),
                ing.name.clone(),
                format!("{:.2}", ing.total_quantity),
                ing.unit.clone(),
                major_units(ing.total_price),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// CSV export as a string.
pub fn order_csv(snapshot: &OrderListSnapshot) -> Result<String> {
    let by_day = consolidate_ingredients(&snapshot.items);
    let mut buf = Vec::new();
    write_order_csv(snapshot, &by_day, &mut buf)?;
    String::from_utf8(buf).map_err(|e| MenuError::InvalidInput(e.to_string()))
}

/// JSON export: list header, items with their recipe ingredients, and the
/// consolidated ingredients by order day.
pub fn order_json(snapshot: &OrderListSnapshot) -> Result<String> {
    let by_day = consolidate_ingredients(&snapshot.items);
    let list = snapshot.order_list;

    let document = ExportDocument {
        name: &list.name,
        status: list.status,
        created_on: list.created_on,
        menu_plan_id: list.menu_plan_id,
        items: snapshot
            .items
            .iter()
            .map(|e| ExportItem {
                order_day: e.item.order_day,
                actual_order_day: e.item.actual_order_day(),
                recipe: &e.recipe.name,
                portions: e.item.portions,
                lead_time: e.item.lead_time,
                ingredients: &e.recipe.ingredients,
            })
            .collect(),
        ingredients_by_day: &by_day,
        total_price: list_total(&by_day),
    };

    Ok(serde_json::to_string_pretty(&document)?)
}

/// Render the export and write it to `path`.
pub fn export_order_list(
    snapshot: &OrderListSnapshot,
    format: ExportFormat,
    path: &Path,
) -> Result<()> {
    let content = match format {
        ExportFormat::Csv => order_csv(snapshot)?,
        ExportFormat::Json => order_json(snapshot)?,
    };
    fs::write(path, content)?;
    tracing::info!(
        order_list = snapshot.order_list.id,
        path = %path.display(),
        format = format.extension(),
        "order list exported"
    );
    Ok(())
}

/// File name derived from the list name, safe for most file systems.
pub fn default_export_file_name(list_name: &str, format: ExportFormat) -> String {
    let stem: String = list_name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.is_empty() { "order_list".to_string() } else { stem };
    format!("{}.{}", stem, format.extension())
}
