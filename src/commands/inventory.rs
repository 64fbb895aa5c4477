use crate::config::AppConfig;
use crate::db::DatabaseExt;
use crate::inventory::{commit_edit, load_inventory, InventorySheet};
use crate::models::InventoryEdit;
use tauri::{AppHandle, Manager};

#[tauri::command]
pub fn get_inventory(app: AppHandle) -> Result<InventorySheet, String> {
    let config = app.state::<AppConfig>();
    load_inventory(app.db(), &config.inventory).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn update_inventory_row(app: AppHandle, edit: InventoryEdit) -> Result<InventorySheet, String> {
    let config = app.state::<AppConfig>();
    let db = app.db();

    let mut sheet = load_inventory(db, &config.inventory).map_err(|e| e.to_string())?;
    commit_edit(db, &mut sheet, &edit).map_err(|e| e.to_string())?;

    Ok(sheet)
}
