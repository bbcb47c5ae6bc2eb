use crate::domain::model::{CatalogEntry, ItemId, StockRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Remote source of stock levels and catalog records.
#[async_trait]
pub trait InventoryService: Send + Sync {
    async fn stock(&self, id: ItemId) -> Result<StockRecord>;
    async fn catalog_entry(&self, id: ItemId) -> Result<CatalogEntry>;
}

/// Durable key-value storage for serialized cart snapshots.
pub trait CartStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

/// One-way channel for user-facing error messages.
pub trait NotificationSink: Send + Sync {
    fn notify_error(&self, message: &str);
}

#[async_trait]
impl<T: InventoryService + ?Sized> InventoryService for std::sync::Arc<T> {
    async fn stock(&self, id: ItemId) -> Result<StockRecord> {
        (**self).stock(id).await
    }

    async fn catalog_entry(&self, id: ItemId) -> Result<CatalogEntry> {
        (**self).catalog_entry(id).await
    }
}

impl<T: CartStore + ?Sized> CartStore for std::sync::Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

impl<T: NotificationSink + ?Sized> NotificationSink for std::sync::Arc<T> {
    fn notify_error(&self, message: &str) {
        (**self).notify_error(message)
    }
}
