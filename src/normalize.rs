//! Mapping of raw store records onto typed entities.
//!
//! Supply records come back with whatever columns the store has and with
//! numbers that may be stored as text. Everything here is lenient about the
//! value encoding but strict about ids.

use serde_json::Value;

use crate::error::NormalizeError;
use crate::inventory::ResolvedFields;
use crate::models::{InventoryRow, RawRecord, Supply};

/// Reads a loosely typed number. Missing, null or unparsable values become `0.0`.
pub fn loose_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Reads a loosely typed flag, falling back to `default` when absent.
pub fn loose_bool(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(default),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "t" | "1" | "yes"
        ),
        _ => default,
    }
}

fn record_id(record: &RawRecord, field: &'static str) -> Result<i64, NormalizeError> {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_i64().ok_or(NormalizeError::MissingId(field)),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| NormalizeError::MissingId(field)),
        _ => Err(NormalizeError::MissingId(field)),
    }
}

fn record_name(record: &RawRecord) -> String {
    match record.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

pub fn supply_from_record(record: &RawRecord) -> Result<Supply, NormalizeError> {
    Ok(Supply {
        id: record_id(record, "id")?,
        name: record_name(record),
        active: loose_bool(record.get("active"), true),
    })
}

/// Builds an inventory row using the field names resolved for this load.
pub fn inventory_row_from_record(
    record: &RawRecord,
    fields: &ResolvedFields,
) -> Result<InventoryRow, NormalizeError> {
    Ok(InventoryRow {
        supply_id: record_id(record, "id")?,
        name: record_name(record),
        stock: loose_number(record.get(&fields.stock)),
        minimum: loose_number(record.get(&fields.minimum)),
        unit_cost: loose_number(record.get(&fields.cost)),
    })
}
