use crate::db::DatabaseExt;
use crate::models::{
    CreateProduct, CreateProviderSupply, CreateSupply, Product, ProviderSupply, Supply,
};
use crate::store::KitStore;
use tauri::AppHandle;

// ===== Products =====

#[tauri::command]
pub fn get_products(app: AppHandle) -> Result<Vec<Product>, String> {
    app.db().list_products().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_product(app: AppHandle, product: CreateProduct) -> Result<Product, String> {
    app.db().create_product(&product).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_product(app: AppHandle, id: i64) -> Result<(), String> {
    app.db().delete_product(id).map_err(|e| e.to_string())
}

// ===== Supplies =====

#[tauri::command]
pub fn get_supplies(app: AppHandle) -> Result<Vec<Supply>, String> {
    app.db().list_supplies().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_supply(app: AppHandle, supply: CreateSupply) -> Result<Supply, String> {
    app.db().create_supply(&supply).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_supply(app: AppHandle, id: i64) -> Result<(), String> {
    app.db().delete_supply(id).map_err(|e| e.to_string())
}

// ===== Provider offers =====

#[tauri::command]
pub fn get_provider_supplies(app: AppHandle, supply_id: i64) -> Result<Vec<ProviderSupply>, String> {
    app.db()
        .list_provider_supplies(&[supply_id])
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn create_provider_supply(
    app: AppHandle,
    offer: CreateProviderSupply,
) -> Result<ProviderSupply, String> {
    app.db().create_provider_supply(&offer).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn delete_provider_supply(app: AppHandle, id: i64) -> Result<(), String> {
    app.db().delete_provider_supply(id).map_err(|e| e.to_string())
}
