//! Wire and row types for warehouses and inventory items.
//!
//! Row types derive `sqlx::FromRow` and mirror the column projection of the
//! query that produces them, so the JSON shape of each endpoint is fixed by
//! the struct rather than by whatever columns the table happens to carry.

use serde::{Deserialize, Serialize};

pub const WAREHOUSE_REQUIRED_FIELDS: &[&str] = &[
    "warehouse_name",
    "address",
    "city",
    "country",
    "contact_name",
    "contact_position",
    "contact_phone",
    "contact_email",
];

pub const INVENTORY_REQUIRED_FIELDS: &[&str] = &[
    "warehouse_id",
    "item_name",
    "description",
    "category",
    "status",
    "quantity",
];

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: String,
    pub warehouse_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub contact_name: String,
    pub contact_position: String,
    pub contact_phone: String,
    pub contact_email: String,
}

/// Index projection. `contact_position` is stored but deliberately not listed.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct WarehouseSummary {
    pub id: String,
    pub warehouse_name: String,
    pub contact_name: String,
    pub address: String,
    pub contact_phone: String,
    pub contact_email: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedWarehouse {
    pub message: String,
    pub id: String,
}

impl DeletedWarehouse {
    pub fn new(id: String) -> Self {
        Self { message: "warehouse deleted".to_string(), id }
    }
}

/// Body of `POST /warehouses` and `PUT /warehouses/:id`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct WarehouseInput {
    pub warehouse_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    pub contact_position: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl WarehouseInput {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [
            &self.warehouse_name,
            &self.address,
            &self.city,
            &self.country,
            &self.contact_name,
            &self.contact_position,
            &self.contact_phone,
            &self.contact_email,
        ];
        WAREHOUSE_REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| *name)
            .collect()
    }

    /// Full-replace semantics: every omitted field becomes an empty string.
    pub fn into_record(self, id: String) -> Warehouse {
        Warehouse {
            id,
            warehouse_name: self.warehouse_name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            contact_name: self.contact_name.unwrap_or_default(),
            contact_position: self.contact_position.unwrap_or_default(),
            contact_phone: self.contact_phone.unwrap_or_default(),
            contact_email: self.contact_email.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehousePatch {
    pub warehouse_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub contact_name: Option<String>,
    pub contact_position: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl WarehousePatch {
    pub fn is_empty(&self) -> bool {
        self.warehouse_name.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
            && self.contact_name.is_none()
            && self.contact_position.is_none()
            && self.contact_phone.is_none()
            && self.contact_email.is_none()
    }
}

/// Full `inventories` row, as listed per warehouse.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: String,
    pub warehouse_id: String,
    pub item_name: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub quantity: i32,
}

/// Row of the joined inventory index.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct InventoryListing {
    pub warehouse_name: String,
    pub id: String,
    pub item_name: String,
    pub category: String,
    pub status: String,
    pub quantity: i32,
}

/// Joined single-item view. `warehouse_name` is null when the referenced
/// warehouse row does not exist.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct InventoryDetail {
    pub warehouse_name: Option<String>,
    pub id: String,
    pub warehouse_id: String,
    pub item_name: String,
    pub description: String,
    pub category: String,
    pub status: String,
    pub quantity: i32,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewInventoryItem {
    pub warehouse_id: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub quantity: Option<i32>,
}

impl NewInventoryItem {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let strings = [
            &self.warehouse_id,
            &self.item_name,
            &self.description,
            &self.category,
            &self.status,
        ];
        let mut missing: Vec<&'static str> = INVENTORY_REQUIRED_FIELDS
            .iter()
            .zip(strings)
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| *name)
            .collect();
        if self.quantity.is_none() {
            missing.push("quantity");
        }
        missing
    }

    /// Only meaningful once `missing_fields` came back empty.
    pub fn into_record(self, id: String) -> InventoryItem {
        InventoryItem {
            id,
            warehouse_id: self.warehouse_id.unwrap_or_default(),
            item_name: self.item_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            quantity: self.quantity.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryPatch {
    pub warehouse_id: Option<String>,
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub quantity: Option<i32>,
}

impl InventoryPatch {
    pub fn is_empty(&self) -> bool {
        self.warehouse_id.is_none()
            && self.item_name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.quantity.is_none()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// "a, b and c"
pub fn enumerate_fields(fields: &[&str]) -> String {
    match fields {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Message for a create request with absent or blank required fields.
pub fn missing_fields_message(required: &[&str], missing: &[&str]) -> String {
    format!(
        "Please make sure to provide {} fields in a request (missing: {})",
        enumerate_fields(required),
        missing.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_warehouse() -> WarehouseInput {
        WarehouseInput {
            warehouse_name: Some("Manhattan".into()),
            address: Some("503 Broadway".into()),
            city: Some("New York".into()),
            country: Some("USA".into()),
            contact_name: Some("Parmin Aujla".into()),
            contact_position: Some("Warehouse Manager".into()),
            contact_phone: Some("+1 (646) 123-1234".into()),
            contact_email: Some("paujla@instock.com".into()),
        }
    }

    #[test]
    fn complete_warehouse_has_no_missing_fields() {
        assert!(full_warehouse().missing_fields().is_empty());
    }

    #[test]
    fn blank_and_absent_fields_are_missing() {
        let input = WarehouseInput {
            contact_email: None,
            city: Some("   ".into()),
            ..full_warehouse()
        };
        assert_eq!(input.missing_fields(), vec!["city", "contact_email"]);
    }

    #[test]
    fn replace_coerces_absent_fields_to_empty() {
        let input = WarehouseInput { warehouse_name: Some("Renamed".into()), ..Default::default() };
        let record = input.into_record("w-1".into());
        assert_eq!(record.warehouse_name, "Renamed");
        assert_eq!(record.contact_email, "");
        assert_eq!(record.id, "w-1");
    }

    #[test]
    fn zero_quantity_counts_as_present() {
        let item = NewInventoryItem {
            warehouse_id: Some("w-1".into()),
            item_name: Some("Television".into()),
            description: Some("50 inch".into()),
            category: Some("Electronics".into()),
            status: Some("Out of Stock".into()),
            quantity: Some(0),
        };
        assert!(item.missing_fields().is_empty());
    }

    #[test]
    fn missing_quantity_is_reported_last() {
        let item = NewInventoryItem { item_name: Some("Gym Bag".into()), ..Default::default() };
        assert_eq!(
            item.missing_fields(),
            vec!["warehouse_id", "description", "category", "status", "quantity"]
        );
    }

    #[test]
    fn patch_rejects_unknown_columns() {
        let parsed = serde_json::from_str::<InventoryPatch>(r#"{"quantity": 5, "colour": "red"}"#);
        assert!(parsed.is_err());
        let patch: InventoryPatch = serde_json::from_str(r#"{"quantity": 5}"#).unwrap();
        assert!(!patch.is_empty());
        assert!(InventoryPatch::default().is_empty());
    }

    #[test]
    fn message_enumerates_required_and_missing() {
        let msg = missing_fields_message(WAREHOUSE_REQUIRED_FIELDS, &["contact_email"]);
        assert!(msg.starts_with("Please make sure to provide warehouse_name, address,"));
        assert!(msg.contains("contact_phone and contact_email fields"));
        assert!(msg.ends_with("(missing: contact_email)"));
    }

    #[test]
    fn detail_without_warehouse_serializes_null_name() {
        let detail = InventoryDetail {
            warehouse_name: None,
            id: "i-1".into(),
            warehouse_id: "gone".into(),
            item_name: "Tent".into(),
            description: "Two person".into(),
            category: "Gear".into(),
            status: "In Stock".into(),
            quantity: 3,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert!(json["warehouse_name"].is_null());
        assert_eq!(json["warehouse_id"], "gone");
    }

    #[test]
    fn enumerate_handles_short_lists() {
        assert_eq!(enumerate_fields(&[]), "");
        assert_eq!(enumerate_fields(&["a"]), "a");
        assert_eq!(enumerate_fields(&["a", "b"]), "a and b");
    }
}
