//! Cart data model.
//!
//! A [`Cart`] is an immutable snapshot: every change produces a new value
//! and lines that did not change are shared with the previous snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Externally assigned catalog identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One line of the cart.
///
/// Catalog fields (title, price, image, ...) are opaque to the cart and are
/// kept verbatim next to `id` and `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub amount: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Item {
    /// Build a fresh line with `amount = 1` from a catalog record.
    pub fn from_catalog(entry: CatalogEntry) -> Self {
        let mut details = entry.details;
        // the line's own amount is authoritative
        details.remove("amount");
        Self {
            id: entry.id,
            amount: 1,
            details,
        }
    }

    pub fn with_amount(&self, amount: i64) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}

/// Stock available for one item, as reported by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: ItemId,
    pub amount: i64,
}

/// Catalog record for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: ItemId,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Ordered, id-unique sequence of lines.
///
/// Serializes as a plain JSON array of items. Deserializing applies the same
/// repairs as [`Cart::from_lines`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<Arc<Item>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw lines, dropping lines with `amount < 1` and
    /// repeated ids (first occurrence wins). Returns the cart and the number
    /// of lines discarded.
    pub fn from_lines(items: impl IntoIterator<Item = Item>) -> (Self, usize) {
        let mut lines: Vec<Arc<Item>> = Vec::new();
        let mut dropped = 0;
        for item in items {
            if item.amount < 1 || lines.iter().any(|l| l.id == item.id) {
                dropped += 1;
                continue;
            }
            lines.push(Arc::new(item));
        }
        (Self { lines }, dropped)
    }

    pub fn line(&self, id: ItemId) -> Option<&Item> {
        self.lines.iter().find(|l| l.id == id).map(Arc::as_ref)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.lines.iter().position(|l| l.id == id)
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Amount currently held for `id`, 0 when absent.
    pub fn amount_of(&self, id: ItemId) -> i64 {
        self.line(id).map(|l| l.amount).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.lines.iter().map(Arc::as_ref)
    }

    /// Lines behind their shared pointers; untouched lines are pointer-equal
    /// across snapshots.
    pub fn lines(&self) -> &[Arc<Item>] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line amounts, saturating at `i64::MAX`.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |total, l| total.saturating_add(l.amount))
    }

    /// New cart with `item` appended. The caller guarantees the id is absent.
    pub fn with_line(&self, item: Item) -> Self {
        let mut lines = self.lines.clone();
        lines.push(Arc::new(item));
        Self { lines }
    }

    /// New cart with the line for `id` set to `amount`, or `None` if absent.
    pub fn with_amount(&self, id: ItemId, amount: i64) -> Option<Self> {
        let index = self.position(id)?;
        let mut lines = self.lines.clone();
        lines[index] = Arc::new(self.lines[index].with_amount(amount));
        Some(Self { lines })
    }

    /// New cart without the line for `id`, or `None` if absent.
    pub fn without(&self, id: ItemId) -> Option<Self> {
        let index = self.position(id)?;
        let mut lines = self.lines.clone();
        lines.remove(index);
        Some(Self { lines })
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Item>::deserialize(deserializer).map(|items| Cart::from_lines(items).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id: i64, amount: i64) -> Item {
        Item {
            id: ItemId::new(id),
            amount,
            details: Map::new(),
        }
    }

    fn cart(lines: &[(i64, i64)]) -> Cart {
        Cart::from_lines(lines.iter().map(|&(id, amount)| item(id, amount))).0
    }

    #[test]
    fn test_item_serializes_flat() {
        let entry: CatalogEntry = serde_json::from_value(json!({
            "id": 4,
            "title": "Running shoe",
            "price": 139.9,
            "image": "https://cdn.example.com/shoe.jpg"
        }))
        .unwrap();

        let line = Item::from_catalog(entry);
        let value = serde_json::to_value(&line).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 4,
                "amount": 1,
                "title": "Running shoe",
                "price": 139.9,
                "image": "https://cdn.example.com/shoe.jpg"
            })
        );
    }

    #[test]
    fn test_catalog_amount_does_not_duplicate() {
        let entry: CatalogEntry =
            serde_json::from_value(json!({"id": 2, "amount": 40, "title": "Sock"})).unwrap();
        let line = Item::from_catalog(entry);

        assert_eq!(line.amount, 1);
        assert!(!line.details.contains_key("amount"));

        let text = serde_json::to_string(&line).unwrap();
        assert_eq!(text.matches("\"amount\"").count(), 1);
    }

    #[test]
    fn test_cart_serializes_as_array() {
        let c = cart(&[(1, 2), (2, 1)]);
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(text, r#"[{"id":1,"amount":2},{"id":2,"amount":1}]"#);

        let back: Cart = serde_json::from_str(&text).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_from_lines_repairs_bad_input() {
        let (c, dropped) = Cart::from_lines(vec![item(1, 2), item(2, 0), item(1, 5), item(3, 1)]);

        assert_eq!(dropped, 2);
        assert_eq!(c.len(), 2);
        assert_eq!(c.amount_of(ItemId::new(1)), 2);
        assert!(!c.contains(ItemId::new(2)));
    }

    #[test]
    fn test_with_amount_shares_untouched_lines() {
        let before = cart(&[(1, 1), (2, 1), (3, 4)]);
        let after = before.with_amount(ItemId::new(2), 3).unwrap();

        assert_eq!(after.amount_of(ItemId::new(2)), 3);
        assert_eq!(before.amount_of(ItemId::new(2)), 1);
        assert!(Arc::ptr_eq(&before.lines()[0], &after.lines()[0]));
        assert!(!Arc::ptr_eq(&before.lines()[1], &after.lines()[1]));
        assert!(Arc::ptr_eq(&before.lines()[2], &after.lines()[2]));
    }

    #[test]
    fn test_without_first_line() {
        let before = cart(&[(1, 2), (2, 1)]);
        let after = before.without(ItemId::new(1)).unwrap();

        assert_eq!(after, cart(&[(2, 1)]));
        assert_eq!(before.len(), 2);
        assert!(before.without(ItemId::new(9)).is_none());
    }

    #[test]
    fn test_with_line_keeps_order() {
        let c = cart(&[(5, 1)]).with_line(item(3, 1));
        let ids: Vec<i64> = c.iter().map(|l| l.id.get()).collect();

        assert_eq!(ids, vec![5, 3]);
        assert_eq!(c.total_quantity(), 2);
    }
}
