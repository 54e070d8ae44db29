//! Data models for the inventory.
//!
//! - Item (stored record)
//! - ItemDraft (new item)
//! - ItemChanges (partial edit)

pub mod item;

pub use item::{Item, ItemChanges, ItemDraft};
