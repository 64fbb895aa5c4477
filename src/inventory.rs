//! Stock health classification and inventory valuation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError, ValidationError};
use crate::models::{InventoryEdit, InventoryRow, RawRecord, StockLevels, StockStatus};
use crate::normalize::inventory_row_from_record;
use crate::store::InventoryStore;

/// Candidate column names for one numeric field, probed in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldSpec {
    pub candidates: Vec<String>,
    pub default: String,
}

impl FieldSpec {
    fn new(candidates: &[&str], default: &str) -> Self {
        Self {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            default: default.to_string(),
        }
    }

    fn resolve(&self, sample: Option<&RawRecord>) -> String {
        sample
            .and_then(|record| self.candidates.iter().find(|c| record.contains_key(c.as_str())))
            .unwrap_or(&self.default)
            .clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FieldMapping {
    pub stock: FieldSpec,
    pub minimum: FieldSpec,
    pub cost: FieldSpec,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            stock: FieldSpec::new(&["stock", "stock_actual", "existencia", "quantity"], "stock"),
            minimum: FieldSpec::new(&["min_stock", "stock_minimo", "minimum"], "min_stock"),
            cost: FieldSpec::new(&["unit_cost", "costo_unitario", "cost"], "unit_cost"),
        }
    }
}

impl FieldMapping {
    /// Picks the concrete column names for one dataset from its first record.
    pub fn resolve(&self, sample: Option<&RawRecord>) -> ResolvedFields {
        ResolvedFields {
            stock: self.stock.resolve(sample),
            minimum: self.minimum.resolve(sample),
            cost: self.cost.resolve(sample),
        }
    }
}

/// Column names in effect for every row of one load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedFields {
    pub stock: String,
    pub minimum: String,
    pub cost: String,
}

pub fn classify(stock: f64, minimum: f64) -> StockStatus {
    if stock <= 0.0 {
        StockStatus::OutOfStock
    } else if stock <= minimum {
        StockStatus::AtRisk
    } else {
        StockStatus::Healthy
    }
}

/// Money tied up in a row. Negative stock yields a negative figure.
pub fn investment(row: &InventoryRow) -> f64 {
    row.stock * row.unit_cost
}

pub fn portfolio_value<'a>(rows: impl IntoIterator<Item = &'a InventoryRow>) -> f64 {
    rows.into_iter().map(investment).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryLine {
    pub row: InventoryRow,
    pub status: StockStatus,
    pub investment: f64,
}

impl InventoryLine {
    fn new(row: InventoryRow) -> Self {
        let status = classify(row.stock, row.minimum);
        let investment = investment(&row);
        Self {
            row,
            status,
            investment,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub out_of_stock: usize,
    pub at_risk: usize,
    pub healthy: usize,
}

/// Loaded inventory snapshot with derived status and valuation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventorySheet {
    pub fields: ResolvedFields,
    pub lines: Vec<InventoryLine>,
    pub total_investment: f64,
    pub counts: StatusCounts,
    pub generated_at: String,
}

impl InventorySheet {
    pub fn load(records: &[RawRecord], mapping: &FieldMapping) -> Result<Self, StoreError> {
        let fields = mapping.resolve(records.first());
        tracing::debug!(
            stock = %fields.stock,
            minimum = %fields.minimum,
            cost = %fields.cost,
            rows = records.len(),
            "resolved inventory fields"
        );

        let lines = records
            .iter()
            .map(|record| inventory_row_from_record(record, &fields).map(InventoryLine::new))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sheet = Self {
            fields,
            lines,
            total_investment: 0.0,
            counts: StatusCounts::default(),
            generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        sheet.recompute();
        Ok(sheet)
    }

    pub fn line(&self, supply_id: i64) -> Option<&InventoryLine> {
        self.lines.iter().find(|l| l.row.supply_id == supply_id)
    }

    /// Levels a row would have after `edit`, without touching the sheet.
    pub fn preview(&self, edit: &InventoryEdit) -> Result<StockLevels, ValidationError> {
        let line = self
            .line(edit.supply_id)
            .ok_or(ValidationError::UnknownSupply(edit.supply_id))?;
        Ok(StockLevels {
            stock: edit.stock.unwrap_or(line.row.stock),
            minimum: edit.minimum.unwrap_or(line.row.minimum),
            unit_cost: edit.unit_cost.unwrap_or(line.row.unit_cost),
        })
    }

    /// Edits one row in memory and refreshes its status and the totals.
    pub fn apply_edit(&mut self, edit: &InventoryEdit) -> Result<&InventoryLine, ValidationError> {
        let levels = self.preview(edit)?;
        let idx = self
            .lines
            .iter()
            .position(|l| l.row.supply_id == edit.supply_id)
            .ok_or(ValidationError::UnknownSupply(edit.supply_id))?;

        let mut row = self.lines[idx].row.clone();
        row.stock = levels.stock;
        row.minimum = levels.minimum;
        row.unit_cost = levels.unit_cost;
        self.lines[idx] = InventoryLine::new(row);
        self.recompute();
        Ok(&self.lines[idx])
    }

    fn recompute(&mut self) {
        self.total_investment = portfolio_value(self.lines.iter().map(|l| &l.row));
        let mut counts = StatusCounts::default();
        for line in &self.lines {
            match line.status {
                StockStatus::OutOfStock => counts.out_of_stock += 1,
                StockStatus::AtRisk => counts.at_risk += 1,
                StockStatus::Healthy => counts.healthy += 1,
            }
        }
        self.counts = counts;
    }
}

pub fn load_inventory<S: InventoryStore + ?Sized>(
    store: &S,
    mapping: &FieldMapping,
) -> Result<InventorySheet> {
    let records = store.list_supply_records()?;
    Ok(InventorySheet::load(&records, mapping)?)
}

/// Persists an edit, then applies it to the sheet. A failed write leaves the
/// sheet untouched.
pub fn commit_edit<S: InventoryStore + ?Sized>(
    store: &S,
    sheet: &mut InventorySheet,
    edit: &InventoryEdit,
) -> Result<()> {
    let levels = sheet.preview(edit)?;
    store.update_supply_levels(edit.supply_id, &sheet.fields, &levels)?;
    tracing::info!(supply_id = edit.supply_id, "inventory levels saved");
    sheet.apply_edit(edit)?;
    Ok(())
}
