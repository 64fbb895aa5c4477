//! Store seams used by the kit editor and the inventory sheet.
//!
//! Every call stands alone: there is no transaction spanning calls, and a
//! failure leaves earlier successful calls in place.

use crate::error::StoreError;
use crate::inventory::ResolvedFields;
use crate::models::{KitItem, Product, ProviderSupply, RawRecord, StockLevels, Supply};

pub trait KitStore {
    fn get_product(&self, id: i64) -> Result<Product, StoreError>;
    fn list_supplies(&self) -> Result<Vec<Supply>, StoreError>;
    /// Offers for the given supplies only.
    fn list_provider_supplies(&self, supply_ids: &[i64]) -> Result<Vec<ProviderSupply>, StoreError>;
    fn list_kit_items(&self, product_id: i64) -> Result<Vec<KitItem>, StoreError>;
    fn insert_kit_item(&self, product_id: i64, supply_id: i64, quantity: i64) -> Result<KitItem, StoreError>;
    fn delete_kit_item(&self, id: i64) -> Result<(), StoreError>;
}

pub trait InventoryStore {
    fn list_supply_records(&self) -> Result<Vec<RawRecord>, StoreError>;
    fn update_supply_levels(
        &self,
        supply_id: i64,
        fields: &ResolvedFields,
        levels: &StockLevels,
    ) -> Result<(), StoreError>;
}
