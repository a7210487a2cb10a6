use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named entry in the pantry or on the grocery list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PantryItem {
    pub id: i64,
    pub name: String,
}

/// Grocery entries share the pantry shape but live in their own collection.
pub type GroceryItem = PantryItem;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct NewItem {
    #[validate(length(min = 1, max = 200, message = "Enter an item name"))]
    pub name: String,
}

impl NewItem {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }
}

/// Query parameters forwarded verbatim to list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ListFilter {
    pub fn search(query: &str) -> Self {
        Self {
            search: Some(query.to_string()).filter(|q| !q.is_empty()),
            category: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }
}
