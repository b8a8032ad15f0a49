use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Recipe not found: {0}")]
    RecipeNotFound(u32),

    #[error("Menu plan not found: {0}")]
    PlanNotFound(u32),

    #[error("Menu plan entry not found: {0}")]
    EntryNotFound(u32),

    #[error("Recipe attachment not found: {0}")]
    AttachmentNotFound(u32),

    #[error("Order list not found: {0}")]
    OrderListNotFound(u32),

    #[error("Order list {list} has no item {item}")]
    OrderItemNotFound { list: u32, item: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Date error: {0}")]
    Date(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, MenuError>;
