use serde::{Deserialize, Serialize};

/// One fetched row keyed by column name, before normalization.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Supply {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSupply {
    pub name: String,
    pub active: Option<bool>,
    pub stock: Option<f64>,
    pub min_stock: Option<f64>,
    pub unit_cost: Option<f64>,
}

/// A single supplier offer for a supply.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSupply {
    pub id: i64,
    pub provider_id: i64,
    pub supply_id: i64,
    pub price: Option<f64>,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProviderSupply {
    pub provider_id: i64,
    pub supply_id: i64,
    pub price: Option<f64>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KitItem {
    pub id: i64,
    pub product_id: i64,
    pub supply_id: i64,
    pub quantity: i64,
}

/// Kit item as submitted from the form; nothing is guaranteed yet.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NewKitItem {
    pub product_id: i64,
    pub supply_id: Option<i64>,
    pub quantity: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KitLine {
    pub kit_item_id: i64,
    pub supply_id: i64,
    pub supply_name: Option<String>,
    pub quantity: i64,
    /// `None` when no eligible offer has a price.
    pub unit_cost: Option<f64>,
    pub subtotal: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct KitTotal {
    pub amount: f64,
    /// Set when some line has unknown cost; `amount` is then a lower bound.
    pub partial: bool,
    pub unknown_lines: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KitCostSheet {
    pub product: Product,
    pub lines: Vec<KitLine>,
    pub total: KitTotal,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InventoryRow {
    pub supply_id: i64,
    pub name: String,
    pub stock: f64,
    pub minimum: f64,
    pub unit_cost: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    AtRisk,
    Healthy,
}

/// New values for one inventory row; `None` leaves the field as is.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct InventoryEdit {
    pub supply_id: i64,
    pub stock: Option<f64>,
    pub minimum: Option<f64>,
    pub unit_cost: Option<f64>,
}

/// The three stock levels written back to a supply record.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct StockLevels {
    pub stock: f64,
    pub minimum: f64,
    pub unit_cost: f64,
}
