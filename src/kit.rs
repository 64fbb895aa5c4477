//! Kit (bill of materials) cost rollup.

use std::collections::HashMap;

use crate::error::{Result, StoreError, ValidationError};
use crate::models::{
    KitCostSheet, KitItem, KitLine, KitTotal, NewKitItem, Product, ProviderSupply, Supply,
};
use crate::store::KitStore;

/// Cheapest price for a supply: active priced offers win when there are any,
/// otherwise every priced offer counts. `None` when nothing has a price.
pub fn resolve_unit_cost(supply_id: i64, offers: &[ProviderSupply]) -> Option<f64> {
    let priced: Vec<&ProviderSupply> = offers
        .iter()
        .filter(|o| o.supply_id == supply_id && o.price.is_some())
        .collect();

    let any_active = priced.iter().any(|o| o.active);

    priced
        .into_iter()
        .filter(|o| !any_active || o.active)
        .filter_map(|o| o.price)
        .fold(None, |cheapest: Option<f64>, price| match cheapest {
            Some(c) if c <= price => Some(c),
            _ => Some(price),
        })
}

/// Sums the lines whose cost is known. Unknown lines are counted, not priced.
pub fn resolve_kit_total(lines: &[KitLine]) -> KitTotal {
    let mut total = KitTotal {
        amount: 0.0,
        partial: false,
        unknown_lines: 0,
    };
    for line in lines {
        match line.subtotal {
            Some(subtotal) => total.amount += subtotal,
            None => total.unknown_lines += 1,
        }
    }
    total.partial = total.unknown_lines > 0;
    total
}

fn kit_line(item: &KitItem, names: &HashMap<i64, &str>, offers: &[ProviderSupply]) -> KitLine {
    let unit_cost = resolve_unit_cost(item.supply_id, offers);
    KitLine {
        kit_item_id: item.id,
        supply_id: item.supply_id,
        supply_name: names.get(&item.supply_id).map(|n| n.to_string()),
        quantity: item.quantity,
        unit_cost,
        subtotal: unit_cost.map(|c| c * item.quantity as f64),
    }
}

pub fn build_kit_sheet(
    product: Product,
    items: &[KitItem],
    supplies: &[Supply],
    offers: &[ProviderSupply],
) -> KitCostSheet {
    let names: HashMap<i64, &str> = supplies.iter().map(|s| (s.id, s.name.as_str())).collect();
    let lines: Vec<KitLine> = items.iter().map(|i| kit_line(i, &names, offers)).collect();
    let total = resolve_kit_total(&lines);
    KitCostSheet {
        product,
        lines,
        total,
    }
}

/// Checks a form submission against the kit's current lines.
pub fn validate_new_item(existing: &[KitLine], request: &NewKitItem) -> Result<(i64, i64), ValidationError> {
    let supply_id = request.supply_id.ok_or(ValidationError::MissingComponent)?;
    let quantity = request.quantity.ok_or(ValidationError::MissingQuantity)?;
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity(quantity));
    }
    if existing.iter().any(|l| l.supply_id == supply_id) {
        return Err(ValidationError::DuplicateComponent { supply_id });
    }
    Ok((supply_id, quantity))
}

/// Unknown costs render as an em-dash so they never read as zero.
pub fn display_cost(cost: Option<f64>) -> String {
    match cost {
        Some(c) => format!("{:.2}", c),
        None => "\u{2014}".to_string(),
    }
}

/// In-memory state of one kit screen. Discarded on navigation.
#[derive(Debug, Clone)]
pub struct KitEditor {
    sheet: KitCostSheet,
    supplies: Vec<Supply>,
    offers: Vec<ProviderSupply>,
}

impl KitEditor {
    pub fn load<S: KitStore + ?Sized>(store: &S, product_id: i64) -> Result<Self> {
        let product = store.get_product(product_id)?;
        let items = store.list_kit_items(product_id)?;
        let supplies = store.list_supplies()?;
        let supply_ids: Vec<i64> = items.iter().map(|i| i.supply_id).collect();
        let offers = if supply_ids.is_empty() {
            Vec::new()
        } else {
            store.list_provider_supplies(&supply_ids)?
        };

        let sheet = build_kit_sheet(product, &items, &supplies, &offers);
        tracing::debug!(
            product_id,
            lines = sheet.lines.len(),
            total = sheet.total.amount,
            "loaded kit"
        );
        if sheet.total.partial {
            tracing::warn!(
                product_id,
                unknown_lines = sheet.total.unknown_lines,
                "kit total is a lower bound"
            );
        }

        Ok(Self {
            sheet,
            supplies,
            offers,
        })
    }

    pub fn sheet(&self) -> &KitCostSheet {
        &self.sheet
    }

    pub fn into_sheet(self) -> KitCostSheet {
        self.sheet
    }

    /// Validates, writes, and only then adds the line locally.
    pub fn add_item<S: KitStore + ?Sized>(&mut self, store: &S, request: &NewKitItem) -> Result<&KitLine> {
        let (supply_id, quantity) = match validate_new_item(&self.sheet.lines, request) {
            Ok(valid) => valid,
            Err(err) => {
                tracing::warn!(product_id = self.sheet.product.id, %err, "kit item rejected");
                return Err(err.into());
            }
        };

        let item = store.insert_kit_item(self.sheet.product.id, supply_id, quantity)?;
        tracing::info!(product_id = item.product_id, supply_id, quantity, "kit item added");

        // A failed refresh leaves the new line unpriced until the next load.
        match store.list_provider_supplies(&[supply_id]) {
            Ok(fresh) => {
                self.offers.retain(|o| o.supply_id != supply_id);
                self.offers.extend(fresh);
            }
            Err(err) => tracing::warn!(supply_id, %err, "could not refresh offers"),
        }

        let names: HashMap<i64, &str> = self.supplies.iter().map(|s| (s.id, s.name.as_str())).collect();
        let line = kit_line(&item, &names, &self.offers);
        self.sheet.lines.push(line);
        self.sheet.total = resolve_kit_total(&self.sheet.lines);
        let idx = self.sheet.lines.len() - 1;
        Ok(&self.sheet.lines[idx])
    }

    pub fn remove_item<S: KitStore + ?Sized>(&mut self, store: &S, kit_item_id: i64) -> Result<()> {
        let idx = self
            .sheet
            .lines
            .iter()
            .position(|l| l.kit_item_id == kit_item_id)
            .ok_or(StoreError::NotFound {
                entity: "kit item",
                id: kit_item_id,
            })?;

        store.delete_kit_item(kit_item_id)?;
        tracing::info!(product_id = self.sheet.product.id, kit_item_id, "kit item removed");

        self.sheet.lines.remove(idx);
        self.sheet.total = resolve_kit_total(&self.sheet.lines);
        Ok(())
    }
}
