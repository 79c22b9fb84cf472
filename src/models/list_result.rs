use serde::{Deserialize, Serialize};

/// A single page of a paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        ListResult {
            page: 1,
            per_page: 0,
            total_items: 0,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}
