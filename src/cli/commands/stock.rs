//! Stock command implementations (sales and adjustments).

use super::{fetch_item, open_provider};
use crate::contract::{item_uri, COLUMN_QUANTITY};
use crate::error::{Error, Result};
use crate::values::{ContentValues, Selection};
use serde::Serialize;
use std::path::PathBuf;

/// Output for sell/adjust.
#[derive(Serialize)]
struct StockOutput {
    id: i64,
    name: String,
    change: i64,
    quantity: i64,
}

/// Execute the sell command.
///
/// Stock only goes down when every unit sold is available.
///
/// # Errors
///
/// Returns `InvalidArgument` when the item is out of stock (or has fewer
/// than `count` units), and `ItemNotFound` if no item has this id.
pub fn sell(id: i64, count: u32, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgument(
            "Sale count must be at least 1".to_string(),
        ));
    }

    let mut provider = open_provider(db_path)?;
    let item = fetch_item(&mut provider, id)?;
    let count = i64::from(count);

    if item.quantity == 0 {
        return Err(Error::InvalidArgument(format!(
            "{} is out of stock. Please order more.",
            item.name
        )));
    }
    if item.quantity < count {
        return Err(Error::InvalidArgument(format!(
            "Only {} {} left in stock. Please order more.",
            item.quantity, item.name
        )));
    }

    let quantity = set_quantity(&mut provider, id, item.quantity - count)?;

    if crate::is_silent() {
        println!("{quantity}");
        return Ok(());
    }

    if json {
        let output = StockOutput {
            id,
            name: item.name,
            change: -count,
            quantity,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Sold:({count}) {}", item.name);
        println!("  {quantity} left in stock");
    }

    Ok(())
}

/// Execute the adjust command.
///
/// # Errors
///
/// Returns `NegativeQuantity` if the adjustment would take stock below
/// zero, and `ItemNotFound` if no item has this id.
pub fn adjust(id: i64, delta: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut provider = open_provider(db_path)?;
    let item = fetch_item(&mut provider, id)?;

    let target = item
        .quantity
        .checked_add(delta)
        .ok_or_else(|| Error::InvalidArgument(format!("Adjustment out of range: {delta}")))?;
    let quantity = set_quantity(&mut provider, id, target)?;

    if crate::is_silent() {
        println!("{quantity}");
        return Ok(());
    }

    if json {
        let output = StockOutput {
            id,
            name: item.name,
            change: delta,
            quantity,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}: {} → {quantity}", item.name, item.quantity);
    }

    Ok(())
}

fn set_quantity(
    provider: &mut crate::provider::InventoryProvider,
    id: i64,
    quantity: i64,
) -> Result<i64> {
    let values = ContentValues::new().with(COLUMN_QUANTITY, quantity);
    let changed = provider.update(&item_uri(id), &values, &Selection::all())?;
    if changed == 0 {
        return Err(Error::ItemNotFound { id });
    }
    Ok(quantity)
}
