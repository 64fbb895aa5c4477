use rusqlite::types::ValueRef;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreError;
use crate::inventory::ResolvedFields;
use crate::models::{
    CreateProduct, CreateProviderSupply, CreateSupply, KitItem, Product, ProviderSupply,
    RawRecord, StockLevels, Supply,
};
use crate::store::{InventoryStore, KitStore};

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Database {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;

        conn.execute_batch(
            "
            -- Sellable products; the ones with kit items are kits
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Purchasable supplies with their stock levels
            CREATE TABLE IF NOT EXISTS supplies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1,
                stock REAL NOT NULL DEFAULT 0,
                min_stock REAL NOT NULL DEFAULT 0,
                unit_cost REAL NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Supplier offers; price may be unset
            CREATE TABLE IF NOT EXISTS provider_supplies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                provider_id INTEGER NOT NULL,
                supply_id INTEGER NOT NULL,
                price REAL,
                active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (supply_id) REFERENCES supplies(id)
            );

            -- Kit components
            CREATE TABLE IF NOT EXISTS kit_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                product_id INTEGER NOT NULL,
                supply_id INTEGER NOT NULL,
                quantity INTEGER NOT NULL CHECK (quantity > 0),
                FOREIGN KEY (product_id) REFERENCES products(id),
                FOREIGN KEY (supply_id) REFERENCES supplies(id)
            );
            ",
        )?;

        // Run migrations for existing databases (pass connection to avoid deadlock)
        Self::migrate_conn(&conn)?;

        tracing::debug!("database initialized");
        Ok(())
    }

    fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
        let columns: Vec<String> = conn
            .prepare(&format!("PRAGMA table_info({})", table))?
            .query_map([], |row| row.get::<_, String>(1))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(columns)
    }

    fn migrate_conn(conn: &Connection) -> Result<(), StoreError> {
        if !Self::table_columns(conn, "supplies")?.iter().any(|c| c == "active") {
            conn.execute("ALTER TABLE supplies ADD COLUMN active INTEGER NOT NULL DEFAULT 1", [])?;
            tracing::info!("added supplies.active");
        }
        if !Self::table_columns(conn, "provider_supplies")?.iter().any(|c| c == "active") {
            conn.execute(
                "ALTER TABLE provider_supplies ADD COLUMN active INTEGER NOT NULL DEFAULT 1",
                [],
            )?;
            tracing::info!("added provider_supplies.active");
        }
        Ok(())
    }

    // ===== Products =====

    pub fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, price, created_at FROM products ORDER BY name")?;
        let products = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    pub fn create_product(&self, product: &CreateProduct) -> Result<Product, StoreError> {
        let id = {
            let conn = self.lock()?;
            conn.execute(
                "INSERT INTO products (name, price) VALUES (?1, ?2)",
                rusqlite::params![product.name, product.price],
            )?;
            conn.last_insert_rowid()
        };
        self.get_product(id)
    }

    pub fn delete_product(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kit_items WHERE product_id = ?1", [id])?;
        delete_by_id(&conn, "products", "product", id)
    }

    // ===== Supplies =====

    pub fn create_supply(&self, supply: &CreateSupply) -> Result<Supply, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO supplies (name, active, stock, min_stock, unit_cost) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                supply.name,
                supply.active.unwrap_or(true),
                supply.stock.unwrap_or(0.0),
                supply.min_stock.unwrap_or(0.0),
                supply.unit_cost.unwrap_or(0.0)
            ],
        )?;
        Ok(Supply {
            id: conn.last_insert_rowid(),
            name: supply.name.clone(),
            active: supply.active.unwrap_or(true),
        })
    }

    pub fn delete_supply(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let in_kits: i64 = conn.query_row(
            "SELECT COUNT(*) FROM kit_items WHERE supply_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        if in_kits > 0 {
            return Err(StoreError::Conflict(
                "Cannot delete a supply that is part of a kit".to_string(),
            ));
        }

        conn.execute("DELETE FROM provider_supplies WHERE supply_id = ?1", [id])?;
        delete_by_id(&conn, "supplies", "supply", id)
    }

    // ===== Provider offers =====

    pub fn create_provider_supply(
        &self,
        offer: &CreateProviderSupply,
    ) -> Result<ProviderSupply, StoreError> {
        let conn = self.lock()?;
        let active = offer.active.unwrap_or(true);
        conn.execute(
            "INSERT INTO provider_supplies (provider_id, supply_id, price, active) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![offer.provider_id, offer.supply_id, offer.price, active],
        )?;
        Ok(ProviderSupply {
            id: conn.last_insert_rowid(),
            provider_id: offer.provider_id,
            supply_id: offer.supply_id,
            price: offer.price,
            active,
        })
    }

    pub fn delete_provider_supply(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        delete_by_id(&conn, "provider_supplies", "provider offer", id)
    }
}

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn offer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProviderSupply> {
    Ok(ProviderSupply {
        id: row.get(0)?,
        provider_id: row.get(1)?,
        supply_id: row.get(2)?,
        price: row.get(3)?,
        active: row.get(4)?,
    })
}

fn delete_by_id(
    conn: &Connection,
    table: &str,
    entity: &'static str,
    id: i64,
) -> Result<(), StoreError> {
    let changed = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    if changed == 0 {
        return Err(StoreError::NotFound { entity, id });
    }
    Ok(())
}

fn json_value(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl KitStore for Database {
    fn get_product(&self, id: i64) -> Result<Product, StoreError> {
        let conn = self.lock()?;
        conn.query_row(
            "SELECT id, name, price, created_at FROM products WHERE id = ?1",
            [id],
            product_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "product",
            id,
        })
    }

    fn list_supplies(&self) -> Result<Vec<Supply>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name, active FROM supplies ORDER BY name")?;
        let supplies = stmt
            .query_map([], |row| {
                Ok(Supply {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    active: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(supplies)
    }

    fn list_provider_supplies(&self, supply_ids: &[i64]) -> Result<Vec<ProviderSupply>, StoreError> {
        if supply_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        let placeholders = vec!["?"; supply_ids.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
            "SELECT id, provider_id, supply_id, price, active
             FROM provider_supplies
             WHERE supply_id IN ({})
             ORDER BY supply_id, id",
            placeholders
        ))?;
        let offers = stmt
            .query_map(rusqlite::params_from_iter(supply_ids.iter()), offer_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(offers)
    }

    fn list_kit_items(&self, product_id: i64) -> Result<Vec<KitItem>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, product_id, supply_id, quantity FROM kit_items WHERE product_id = ?1 ORDER BY id",
        )?;
        let items = stmt
            .query_map([product_id], |row| {
                Ok(KitItem {
                    id: row.get(0)?,
                    product_id: row.get(1)?,
                    supply_id: row.get(2)?,
                    quantity: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn insert_kit_item(
        &self,
        product_id: i64,
        supply_id: i64,
        quantity: i64,
    ) -> Result<KitItem, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kit_items (product_id, supply_id, quantity) VALUES (?1, ?2, ?3)",
            rusqlite::params![product_id, supply_id, quantity],
        )?;
        Ok(KitItem {
            id: conn.last_insert_rowid(),
            product_id,
            supply_id,
            quantity,
        })
    }

    fn delete_kit_item(&self, id: i64) -> Result<(), StoreError> {
        let conn = self.lock()?;
        delete_by_id(&conn, "kit_items", "kit item", id)
    }
}

impl InventoryStore for Database {
    fn list_supply_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT * FROM supplies ORDER BY name")?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

        let records = stmt
            .query_map([], |row| {
                let mut record = RawRecord::new();
                for (idx, name) in names.iter().enumerate() {
                    record.insert(name.clone(), json_value(row.get_ref(idx)?));
                }
                Ok(record)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn update_supply_levels(
        &self,
        supply_id: i64,
        fields: &ResolvedFields,
        levels: &StockLevels,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;

        let columns = Self::table_columns(&conn, "supplies")?;
        for field in [&fields.stock, &fields.minimum, &fields.cost] {
            if !columns.contains(field) {
                return Err(StoreError::UnknownColumn(field.clone()));
            }
        }

        let changed = conn.execute(
            &format!(
                "UPDATE supplies SET {} = ?1, {} = ?2, {} = ?3 WHERE id = ?4",
                quote_ident(&fields.stock),
                quote_ident(&fields.minimum),
                quote_ident(&fields.cost)
            ),
            rusqlite::params![levels.stock, levels.minimum, levels.unit_cost, supply_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "supply",
                id: supply_id,
            });
        }
        Ok(())
    }
}

#[cfg(feature = "desktop")]
mod app {
    use super::Database;
    use tauri::{AppHandle, Manager};

    pub trait DatabaseExt {
        fn db(&self) -> &Database;
    }

    impl DatabaseExt for AppHandle {
        fn db(&self) -> &Database {
            self.state::<Database>().inner()
        }
    }
}

#[cfg(feature = "desktop")]
pub use app::DatabaseExt;
