use serde::{Deserialize, Serialize};

/// A catalog product a savings goal can target.
///
/// Read-only to this crate; goal creation copies `name` and `image_url` into
/// the goal as a snapshot so later catalog edits do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub image_url: Option<String>,
    /// Price in the smallest currency unit.
    pub price: i64,
    pub available: bool,
}
