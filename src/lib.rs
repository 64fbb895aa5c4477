#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod kit;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod store;


pub use config::{load_config, AppConfig};
pub use db::Database;
pub use error::{Error, Result};
pub use inventory::{classify, investment, portfolio_value, FieldMapping, InventorySheet};
pub use kit::{display_cost, resolve_kit_total, resolve_unit_cost, KitEditor};
pub use store::{InventoryStore, KitStore};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use commands::{catalog, inventory, kits};
    use tauri::Manager;

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .setup(|app| {
            let config_path = app.path().app_config_dir()?.join("config.toml");
            let config = load_config(&config_path)?;
            logging::init(&config.log.filter);

            let app_dir = app.path().app_data_dir()?;
            std::fs::create_dir_all(&app_dir)?;

            // Initialize database
            let db = Database::open(&app_dir.join(&config.database.file))?;
            db.initialize()?;
            tracing::info!(dir = %app_dir.display(), "back-office ready");

            app.manage(db);
            app.manage(config);
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Catalog
            catalog::get_products,
            catalog::create_product,
            catalog::delete_product,
            catalog::get_supplies,
            catalog::create_supply,
            catalog::delete_supply,
            catalog::get_provider_supplies,
            catalog::create_provider_supply,
            catalog::delete_provider_supply,
            // Kits
            kits::get_kit_cost,
            kits::add_kit_item,
            kits::remove_kit_item,
            // Inventory
            inventory::get_inventory,
            inventory::update_inventory_row,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
