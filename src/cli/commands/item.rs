//! Item command implementations.

use super::{fetch_item, open_provider};
use crate::cli::{AddArgs, EditArgs, ListArgs};
use crate::contract::{content_uri, item_uri, COLUMN_QUANTITY};
use crate::error::{Error, Result};
use crate::model::{Item, ItemChanges, ItemDraft};
use crate::validate::{non_blank, parse_quantity, sort_order, validate_name, validate_price};
use crate::values::Selection;
use crate::ContentUri;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for add/sample.
#[derive(Serialize)]
struct AddOutput {
    uri: ContentUri,
    item: Item,
}

/// Output for list.
#[derive(Serialize)]
struct ListOutput {
    items: Vec<Item>,
    count: usize,
}

/// Output for delete/clear.
#[derive(Serialize)]
struct DeleteOutput {
    uri: ContentUri,
    deleted: usize,
}

/// Execute the add command.
///
/// # Errors
///
/// Returns `InvalidArgument`/`NegativeQuantity` for bad input, or
/// `NotInitialized` if the database does not exist.
pub fn add(args: &AddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let draft = ItemDraft {
        name: validate_name(&args.name)?,
        quantity: parse_quantity(&args.quantity)?,
        price: validate_price(&args.price)?,
        supplier: non_blank(args.supplier.as_deref()),
        image_reference: non_blank(args.image.as_deref()),
    };

    insert(&draft, db_path, json)
}

/// Execute the sample command: add the demo item.
///
/// # Errors
///
/// Returns `NotInitialized` if the database does not exist.
pub fn sample(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    insert(&ItemDraft::sample(), db_path, json)
}

fn insert(draft: &ItemDraft, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut provider = open_provider(db_path)?;

    let uri = provider
        .insert(&content_uri(), &draft.to_values())?
        .ok_or_else(|| Error::Other("Error with saving item".to_string()))?;
    let id = uri
        .last_id()
        .ok_or_else(|| Error::Other(format!("Inserted item has no id: {uri}")))?;
    let item = fetch_item(&mut provider, id)?;

    if crate::is_silent() {
        println!("{uri}");
        return Ok(());
    }

    if json {
        let output = AddOutput { uri, item };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Item saved: {} (#{})", item.name, item.id);
        println!("  URI: {uri}");
    }

    Ok(())
}

/// Execute the list command.
///
/// # Errors
///
/// Returns `InvalidArgument` for an unknown sort key, or `NotInitialized`.
pub fn list(args: &ListArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut order = sort_order(&args.sort, args.desc)?;
    if let Some(limit) = args.limit {
        order.push_str(&format!(" LIMIT {limit}"));
    }
    let mut provider = open_provider(db_path)?;

    let selection = if args.out_of_stock {
        Selection::new(&format!("{COLUMN_QUANTITY} = ?"), [0])
    } else {
        Selection::all()
    };

    let items = provider
        .query(&content_uri(), None, &selection, Some(&order))?
        .map(|row| Item::from_row(&row))
        .collect::<Result<Vec<_>>>()?;

    if crate::is_csv() {
        println!("id,name,quantity,price,supplier");
        for item in &items {
            println!(
                "{},{},{},{},{}",
                item.id,
                crate::csv_escape(&item.name),
                item.quantity,
                crate::csv_escape(&item.price),
                crate::csv_escape(item.supplier.as_deref().unwrap_or(""))
            );
        }
    } else if json {
        let output = ListOutput {
            count: items.len(),
            items,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if items.is_empty() {
        println!("No items found.");
        println!("Run 'inv sample' to add a demo item.");
    } else {
        print_item_table(&items);
    }

    Ok(())
}

/// Print formatted item table to stdout.
fn print_item_table(items: &[Item]) {
    let name_width = items
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    println!(
        "{}",
        format!("{:>5}  {:<name_width$}  {:>8}  {:>10}", "ID", "NAME", "QUANTITY", "PRICE").bold()
    );
    for item in items {
        let quantity = if item.in_stock() {
            format!("{:>8}", item.quantity).normal()
        } else {
            format!("{:>8}", "out").red()
        };
        println!(
            "{:>5}  {:<name_width$}  {}  {:>10}",
            item.id, item.name, quantity, item.price
        );
    }
    println!();
    println!("{} item(s)", items.len());
}

/// Execute the show command.
///
/// # Errors
///
/// Returns `ItemNotFound` if no item has this id.
pub fn show(id: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut provider = open_provider(db_path)?;
    let item = fetch_item(&mut provider, id)?;

    if json {
        println!("{}", serde_json::to_string(&item)?);
    } else {
        print_item(&item);
    }

    Ok(())
}

fn print_item(item: &Item) {
    println!("{} {}", item.name.bold(), format!("(#{})", item.id).dimmed());
    if item.in_stock() {
        println!("  Quantity: {}", item.quantity);
    } else {
        println!("  Quantity: {}", "0 (out of stock)".red());
    }
    println!("  Price:    {}", item.price);
    if let Some(supplier) = &item.supplier {
        println!("  Supplier: {supplier}");
    }
    if let Some(image) = &item.image_reference {
        println!("  Image:    {image}");
    }
    println!("  URI:      {}", item_uri(item.id));
}

/// Execute the edit command.
///
/// # Errors
///
/// Returns `InvalidArgument` when nothing would change or a value is
/// invalid, and `ItemNotFound` if no item has this id.
pub fn edit(args: &EditArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let changes = ItemChanges {
        name: args.name.as_deref().map(validate_name).transpose()?,
        quantity: args.quantity.as_deref().map(parse_quantity).transpose()?,
        price: args.price.as_deref().map(validate_price).transpose()?,
        supplier: if args.clear_supplier {
            Some(None)
        } else {
            args.supplier.as_deref().map(|s| non_blank(Some(s)))
        },
        image_reference: if args.clear_image {
            Some(None)
        } else {
            args.image.as_deref().map(|s| non_blank(Some(s)))
        },
    };

    if changes.is_empty() {
        return Err(Error::InvalidArgument(
            "Nothing to update: pass at least one of --name, --quantity, --price, \
             --supplier, --image, --clear-supplier, --clear-image"
                .to_string(),
        ));
    }

    let mut provider = open_provider(db_path)?;
    let uri = item_uri(args.id);
    let changed = provider.update(&uri, &changes.to_values(), &Selection::all())?;
    if changed == 0 {
        return Err(Error::ItemNotFound { id: args.id });
    }
    let item = fetch_item(&mut provider, args.id)?;

    if crate::is_silent() {
        println!("{uri}");
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&item)?);
    } else {
        println!("Item updated: {} (#{})", item.name, item.id);
    }

    Ok(())
}

/// Execute the delete command.
///
/// # Errors
///
/// Returns `ItemNotFound` if no item has this id.
pub fn delete(id: i64, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let mut provider = open_provider(db_path)?;
    let uri = item_uri(id);

    let deleted = provider.delete(&uri, &Selection::all())?;
    if deleted == 0 {
        return Err(Error::ItemNotFound { id });
    }

    print_deleted(uri, deleted, json)
}

/// Execute the clear command: delete every item.
///
/// # Errors
///
/// Returns `InvalidArgument` without `--yes`.
pub fn clear(yes: bool, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    if !yes {
        return Err(Error::InvalidArgument(
            "Refusing to delete all items without --yes".to_string(),
        ));
    }

    let mut provider = open_provider(db_path)?;
    let uri = content_uri();
    let deleted = provider.delete(&uri, &Selection::all())?;

    print_deleted(uri, deleted, json)
}

fn print_deleted(uri: ContentUri, deleted: usize, json: bool) -> Result<()> {
    if crate::is_silent() {
        println!("{deleted}");
        return Ok(());
    }

    if json {
        let output = DeleteOutput { uri, deleted };
        println!("{}", serde_json::to_string(&output)?);
    } else if uri.last_id().is_some() {
        println!("Item deleted: {uri}");
    } else {
        println!("Deleted {deleted} item(s)");
    }

    Ok(())
}
