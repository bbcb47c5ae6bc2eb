//! Shopping cart state kept in step with durable storage.
//!
//! [`CartManager`] holds the current cart snapshot, checks every quantity
//! change against an [`InventoryService`], and writes each committed
//! snapshot to a [`CartStore`]. Failures are reported to a
//! [`NotificationSink`] and leave the cart untouched.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CartCommand, CliConfig};
pub use crate::config::TomlConfig;

pub use crate::adapters::{FileStore, HttpInventory, MemoryStore, RecordingNotifier, TracingNotifier};
pub use crate::core::cart_manager::{CartManager, CartOptions, Messages, DEFAULT_STORAGE_KEY};
pub use crate::domain::model::{Cart, CatalogEntry, Item, ItemId, StockRecord};
pub use crate::domain::ports::{CartStore, InventoryService, NotificationSink};
pub use crate::utils::error::{CartError, Result};
