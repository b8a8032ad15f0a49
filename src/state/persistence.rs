use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::state::store::StoreData;

/// Load the store from a JSON file.
///
/// A missing file is an empty store, so the first command on a fresh
/// directory works without setup.
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<StoreData> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file missing, starting empty");
        return Ok(StoreData::default());
    }

    let content = fs::read_to_string(path)?;
    let data: StoreData = serde_json::from_str(&content)?;

    tracing::debug!(
        path = %path.display(),
        recipes = data.recipes.len(),
        plans = data.menu_plans.len(),
        order_lists = data.order_lists.len(),
        "store loaded"
    );
    Ok(data)
}

/// Save the store to a JSON file.
pub fn save_store<P: AsRef<Path>>(path: P, data: &StoreData) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path.as_ref(), json)?;
    tracing::debug!(path = %path.as_ref().display(), "store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempdir().unwrap();
        let data = load_store(dir.path().join("nothing.json")).unwrap();
        assert!(data.recipes.is_empty());
        assert_eq!(data.last_id, 0);
    }

    #[test]
    fn test_load_hand_written_store() {
        let json = r#"{
            "recipes": [
                {"id": 1, "owner_id": 1, "name": "Soup", "default_portions": 4,
                 "ingredients": [{"name": "Carrots", "quantity": "200", "unit": "g", "price_per_unit": 80}]}
            ],
            "menu_plans": [
                {"id": 2, "owner_id": 1, "name": "Week", "start_date": "2024-03-10", "end_date": "2024-03-16",
                 "max_budget_per_day": 5000,
                 "entries": [{"id": 3, "date": "2024-03-11", "meal_type": "lunch", "recipe_id": 1, "portions": 8,
                              "attachments": [{"id": 4, "recipe_id": 1, "portions": 2}]}]}
            ],
            "last_id": 4
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let data = load_store(file.path()).unwrap();
        assert_eq!(data.recipes.len(), 1);
        assert_eq!(data.menu_plans[0].budget_tolerance, 10.0);
        let attachment = &data.menu_plans[0].entries[0].attachments[0];
        assert!(attachment.is_selected);
        assert!(!attachment.is_alternative);
        assert!(data.order_lists.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let json = r#"{"recipes": [{"id": 1, "owner_id": 7, "name": "Tea", "category": "drink", "default_portions": 1}], "last_id": 1}"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let data = load_store(file.path()).unwrap();

        let out = NamedTempFile::new().unwrap();
        save_store(out.path(), &data).unwrap();

        let reloaded = load_store(out.path()).unwrap();
        assert_eq!(reloaded.recipes.len(), 1);
        assert_eq!(reloaded.recipes[0].owner_id, 7);
        assert_eq!(reloaded.last_id, 1);
    }
}
