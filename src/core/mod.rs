pub mod cart_manager;

pub use crate::domain::model::{Cart, CatalogEntry, Item, ItemId, StockRecord};
pub use crate::domain::ports::{CartStore, InventoryService, NotificationSink};
pub use crate::utils::error::Result;
