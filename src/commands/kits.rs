use crate::db::DatabaseExt;
use crate::kit::KitEditor;
use crate::models::{KitCostSheet, NewKitItem};
use tauri::AppHandle;

#[tauri::command]
pub fn get_kit_cost(app: AppHandle, product_id: i64) -> Result<KitCostSheet, String> {
    let editor = KitEditor::load(app.db(), product_id).map_err(|e| e.to_string())?;
    Ok(editor.into_sheet())
}

#[tauri::command]
pub fn add_kit_item(app: AppHandle, item: NewKitItem) -> Result<KitCostSheet, String> {
    let db = app.db();
    let mut editor = KitEditor::load(db, item.product_id).map_err(|e| e.to_string())?;

    editor.add_item(db, &item).map_err(|e| e.to_string())?;

    Ok(editor.into_sheet())
}

/// Called after the user confirmed the removal in the dialog.
#[tauri::command]
pub fn remove_kit_item(app: AppHandle, product_id: i64, kit_item_id: i64) -> Result<KitCostSheet, String> {
    let db = app.db();
    let mut editor = KitEditor::load(db, product_id).map_err(|e| e.to_string())?;

    editor.remove_item(db, kit_item_id).map_err(|e| e.to_string())?;

    Ok(editor.into_sheet())
}
