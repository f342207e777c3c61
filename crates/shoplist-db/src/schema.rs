//! Row and input types for the `shopping_list` table
//!
//! `price` is NUMERIC(12,2) in storage and travels as text in both directions.
//! Values are normalized to two decimal places: "5" reads back as "5.00" and
//! "0.999" as "1.00".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored shopping list row
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Primary key, assigned at creation
    pub id: i32,
    pub name: String,
    pub date_added: DateTime<Utc>,
    /// Decimal rendered as text with two decimal places
    pub price: String,
    pub category: String,
    pub checked: bool,
}

/// Insert payload. `None` fields are left to the column defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewShoppingListItem {
    /// Caller-chosen id; normally `None` so storage assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub name: String,
    pub date_added: DateTime<Utc>,
    pub price: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl NewShoppingListItem {
    pub fn new(
        name: impl Into<String>,
        date_added: DateTime<Utc>,
        price: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            date_added,
            price: price.into(),
            category: category.into(),
            checked: None,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }
}

impl From<ShoppingListItem> for NewShoppingListItem {
    fn from(item: ShoppingListItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name,
            date_added: item.date_added,
            price: item.price,
            category: item.category,
            checked: Some(item.checked),
        }
    }
}

/// Partial update. Only `Some` fields are written; the rest stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl ShoppingListItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date_added.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.checked.is_none()
    }

    /// Apply the patch to an in-memory copy, mirroring what the UPDATE does.
    pub fn apply_to(&self, item: &mut ShoppingListItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(date_added) = self.date_added {
            item.date_added = date_added;
        }
        if let Some(price) = &self.price {
            item.price = price.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(checked) = self.checked {
            item.checked = checked;
        }
    }
}

/// Table names
pub mod tables {
    pub const SHOPPING_LIST: &str = "shopping_list";
}

/// Column projection shared by every read. `price` is cast so it decodes as text.
pub const ITEM_COLUMNS: &str = "id, name, date_added, price::text AS price, category, checked";
