//! Core types for the shopping list.

use crate::error::{ListError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Unique identifier for an item.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    /// Parse an id from a request path segment.
    ///
    /// Anything other than a non-negative integer is rejected with
    /// [`ListError::InvalidId`].
    pub fn parse(segment: &str) -> Result<Self> {
        // u64::from_str also takes a leading '+'
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ListError::InvalidId(segment.to_string()));
        }
        segment
            .parse::<u64>()
            .map(ItemId)
            .map_err(|_| ListError::InvalidId(segment.to_string()))
    }

    pub fn next(self) -> Self {
        ItemId(self.0 + 1)
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemId({})", self.0)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single shopping list entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub completed: bool,
}

impl Item {
    /// Merge the fields present in `patch`. Absent fields are left untouched.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(ref name) = patch.name {
            self.name = name.clone();
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Input for creating an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    /// Falls back to an empty tag at the store level; the HTTP surface
    /// always requires it.
    pub category: Option<String>,
    /// Defaults to `false`.
    pub completed: Option<bool>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
            completed: None,
        }
    }

    /// Set the completed flag.
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Validate an untrusted create body.
    ///
    /// Requires `name` (non-blank string) and `category` (string);
    /// `completed` is optional. Unknown fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self> {
        let obj = as_object(body)?;

        let name = match obj.get("name") {
            Some(value) => name_field(value)?,
            None => return Err(ListError::Validation("name is required".to_string())),
        };

        let category = match obj.get("category") {
            Some(value) => string_field("category", value)?,
            None => return Err(ListError::Validation("category is required".to_string())),
        };

        let completed = obj
            .get("completed")
            .map(|value| bool_field("completed", value))
            .transpose()?;

        Ok(Self {
            name,
            category: Some(category),
            completed,
        })
    }
}

/// Partial update for an item.
///
/// Each field is independently present or absent, so an explicit `false`
/// or empty string is distinguishable from an omitted field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub completed: Option<bool>,
}

impl ItemPatch {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// True if no field is present.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.completed.is_none()
    }

    /// Validate an untrusted update body. Unknown fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self> {
        let obj = as_object(body)?;

        Ok(Self {
            name: obj.get("name").map(name_field).transpose()?,
            category: obj
                .get("category")
                .map(|value| string_field("category", value))
                .transpose()?,
            completed: obj
                .get("completed")
                .map(|value| bool_field("completed", value))
                .transpose()?,
        })
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| ListError::Validation("body must be a JSON object".to_string()))
}

fn string_field(field: &str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ListError::Validation(format!("{} must be a string", field)))
}

fn name_field(value: &Value) -> Result<String> {
    let name = string_field("name", value)?;
    if name.trim().is_empty() {
        return Err(ListError::Validation("name must not be empty".to_string()));
    }
    Ok(name)
}

fn bool_field(field: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| ListError::Validation(format!("{} must be a boolean", field)))
}

/// Store statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of live items.
    pub items: usize,
    /// Id the next create will receive.
    pub next_id: ItemId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_id() {
        assert_eq!(ItemId::parse("42").unwrap(), ItemId(42));
        assert_eq!(ItemId::parse("0").unwrap(), ItemId(0));
        assert!(matches!(ItemId::parse("abc"), Err(ListError::InvalidId(_))));
        assert!(matches!(ItemId::parse("-1"), Err(ListError::InvalidId(_))));
        assert!(matches!(ItemId::parse("1.5"), Err(ListError::InvalidId(_))));
        assert!(matches!(ItemId::parse(""), Err(ListError::InvalidId(_))));
        assert!(matches!(ItemId::parse("+1"), Err(ListError::InvalidId(_))));
        assert!(matches!(ItemId::parse(" 1"), Err(ListError::InvalidId(_))));
        assert_eq!(ItemId::parse("007").unwrap(), ItemId(7));
    }

    #[test]
    fn test_item_serializes_flat() {
        let item = Item {
            id: ItemId(1),
            name: "milk".to_string(),
            category: "dairy".to_string(),
            completed: false,
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": 1, "name": "milk", "category": "dairy", "completed": false})
        );
    }

    #[test]
    fn test_new_item_requires_name_and_category() {
        let ok = NewItem::from_json(&json!({"name": "milk", "category": "dairy"})).unwrap();
        assert_eq!(ok, NewItem::new("milk", "dairy"));

        for body in [
            json!({"category": "dairy"}),
            json!({"name": "milk"}),
            json!({"name": "", "category": "dairy"}),
            json!({"name": "   ", "category": "dairy"}),
            json!({"name": 5, "category": "dairy"}),
            json!({"name": "milk", "category": null}),
            json!({"name": "milk", "category": "dairy", "completed": "yes"}),
            json!(["milk"]),
            json!("milk"),
        ] {
            assert!(
                matches!(NewItem::from_json(&body), Err(ListError::Validation(_))),
                "expected rejection for {}",
                body
            );
        }
    }

    #[test]
    fn test_new_item_ignores_unknown_fields() {
        let item = NewItem::from_json(&json!({
            "name": "eggs",
            "category": "dairy",
            "completed": true,
            "quantity": 12
        }))
        .unwrap();
        assert_eq!(item.completed, Some(true));
    }

    #[test]
    fn test_patch_distinguishes_false_from_absent() {
        let patch = ItemPatch::from_json(&json!({"completed": false})).unwrap();
        assert_eq!(patch.completed, Some(false));
        assert!(patch.name.is_none());

        let empty = ItemPatch::from_json(&json!({})).unwrap();
        assert!(empty.is_empty());

        let blank_category = ItemPatch::from_json(&json!({"category": ""})).unwrap();
        assert_eq!(blank_category.category.as_deref(), Some(""));
    }

    #[test]
    fn test_patch_rejects_wrong_types() {
        for body in [
            json!({"completed": "true"}),
            json!({"completed": null}),
            json!({"category": 3}),
            json!({"name": ""}),
            json!(null),
        ] {
            assert!(matches!(
                ItemPatch::from_json(&body),
                Err(ListError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_apply_merges_present_fields() {
        let mut item = Item {
            id: ItemId(3),
            name: "bread".to_string(),
            category: "bakery".to_string(),
            completed: true,
        };

        item.apply(&ItemPatch::default());
        assert_eq!(item.name, "bread");
        assert!(item.completed);

        item.apply(&ItemPatch::default().completed(false).category(""));
        assert_eq!(item.id, ItemId(3));
        assert_eq!(item.name, "bread");
        assert_eq!(item.category, "");
        assert!(!item.completed);
    }
}
