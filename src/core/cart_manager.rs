use crate::core::{Cart, CartStore, InventoryService, Item, ItemId, NotificationSink, StockRecord};
use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

pub const DEFAULT_STORAGE_KEY: &str = "@cart-sync:cart";

/// User-facing texts sent to the notification sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub out_of_stock: String,
    pub add_failed: String,
    pub remove_failed: String,
    pub update_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            out_of_stock: "Requested quantity is out of stock".to_string(),
            add_failed: "Error adding item to cart".to_string(),
            remove_failed: "Error removing item from cart".to_string(),
            update_failed: "Error updating item quantity".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartOptions {
    pub storage_key: String,
    pub messages: Messages,
}

impl Default for CartOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            messages: Messages::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Add,
    Remove,
    Update,
}

impl Operation {
    fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add_item",
            Operation::Remove => "remove_item",
            Operation::Update => "update_amount",
        }
    }

    fn failure_message(self, messages: &Messages) -> &str {
        match self {
            Operation::Add => &messages.add_failed,
            Operation::Remove => &messages.remove_failed,
            Operation::Update => &messages.update_failed,
        }
    }
}

/// Owns the current cart snapshot and keeps it in step with the store.
///
/// Every successful operation commits a new snapshot: the serialized cart is
/// saved under the storage key and then published to observers, with no
/// await point in between. Failed operations leave both untouched and send
/// exactly one message to the notification sink.
///
/// Mutating operations are expected to be serialized by the caller. Two
/// overlapping operations on the same item both check stock against the
/// snapshot they started from and the last commit wins.
pub struct CartManager<I, S, N> {
    inventory: I,
    store: S,
    notifier: N,
    options: CartOptions,
    state: watch::Sender<Arc<Cart>>,
}

impl<I, S, N> CartManager<I, S, N>
where
    I: InventoryService,
    S: CartStore,
    N: NotificationSink,
{
    pub fn new(inventory: I, store: S, notifier: N) -> Self {
        Self::open(inventory, store, notifier, CartOptions::default())
    }

    /// Open a manager, restoring the cart saved under `options.storage_key`.
    /// A missing or unreadable entry yields an empty cart.
    pub fn open(inventory: I, store: S, notifier: N, options: CartOptions) -> Self {
        let initial = load_snapshot(&store, &options.storage_key);
        tracing::debug!(
            key = %options.storage_key,
            lines = initial.len(),
            "cart restored"
        );
        let (state, _) = watch::channel(Arc::new(initial));

        Self {
            inventory,
            store,
            notifier,
            options,
            state,
        }
    }

    pub fn current_cart(&self) -> Arc<Cart> {
        self.state.borrow().clone()
    }

    /// Receive every committed snapshot from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Cart>> {
        self.state.subscribe()
    }

    pub fn storage_key(&self) -> &str {
        &self.options.storage_key
    }

    pub fn messages(&self) -> &Messages {
        &self.options.messages
    }

    #[tracing::instrument(skip_all, fields(item_id = %item_id))]
    pub async fn add_item(&self, item_id: ItemId) -> Result<Arc<Cart>> {
        let outcome = self.try_add(item_id).await;
        self.finish(Operation::Add, outcome)
    }

    #[tracing::instrument(skip_all, fields(item_id = %item_id))]
    pub fn remove_item(&self, item_id: ItemId) -> Result<Arc<Cart>> {
        let outcome = self
            .current_cart()
            .without(item_id)
            .ok_or(CartError::LineNotFound { item_id });
        self.finish(Operation::Remove, outcome)
    }

    /// Set the amount of an existing line. Amounts of zero or less are
    /// ignored without notification.
    #[tracing::instrument(skip_all, fields(item_id = %item_id, amount = amount))]
    pub async fn update_amount(&self, item_id: ItemId, amount: i64) -> Result<Arc<Cart>> {
        if amount <= 0 {
            tracing::debug!(amount, "non-positive amount ignored");
            return Ok(self.current_cart());
        }
        let outcome = self.try_update(item_id, amount).await;
        self.finish(Operation::Update, outcome)
    }

    async fn try_add(&self, item_id: ItemId) -> Result<Cart> {
        let snapshot = self.current_cart();
        let current = snapshot.amount_of(item_id);

        let stock = self.fetch_stock(item_id).await?;
        // a stored amount of i64::MAX can never grow
        let requested = current
            .checked_add(1)
            .ok_or(CartError::StockExceeded {
                item_id,
                requested: i64::MAX,
                available: stock.amount,
            })?;
        ensure_in_stock(item_id, requested, &stock)?;

        if let Some(next) = snapshot.with_amount(item_id, requested) {
            return Ok(next);
        }

        let entry = self
            .inventory
            .catalog_entry(item_id)
            .await
            .map_err(|e| service_failure(item_id, e))?;
        if entry.id != item_id {
            return Err(CartError::unavailable(
                item_id,
                format!("catalog returned item {}", entry.id),
            ));
        }

        Ok(snapshot.with_line(Item::from_catalog(entry)))
    }

    async fn try_update(&self, item_id: ItemId, amount: i64) -> Result<Cart> {
        let snapshot = self.current_cart();

        let stock = self.fetch_stock(item_id).await?;
        ensure_in_stock(item_id, amount, &stock)?;

        snapshot
            .with_amount(item_id, amount)
            .ok_or(CartError::LineNotFound { item_id })
    }

    async fn fetch_stock(&self, item_id: ItemId) -> Result<StockRecord> {
        let stock = self
            .inventory
            .stock(item_id)
            .await
            .map_err(|e| service_failure(item_id, e))?;
        tracing::debug!(available = stock.amount, "stock fetched");
        Ok(stock)
    }

    fn finish(&self, operation: Operation, outcome: Result<Cart>) -> Result<Arc<Cart>> {
        match outcome {
            Ok(next) => Ok(self.commit(next)),
            Err(err) => {
                let message = match &err {
                    CartError::StockExceeded { .. } => self.options.messages.out_of_stock.as_str(),
                    _ => operation.failure_message(&self.options.messages),
                };
                tracing::warn!(operation = operation.as_str(), error = %err, "cart operation rejected");
                self.notifier.notify_error(message);
                Err(err)
            }
        }
    }

    fn commit(&self, next: Cart) -> Arc<Cart> {
        let next = Arc::new(next);

        match serde_json::to_string(next.as_ref()) {
            Ok(json) => {
                if let Err(e) = self.store.save(&self.options.storage_key, &json) {
                    tracing::warn!(error = %e, "failed to persist cart snapshot");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize cart snapshot"),
        }

        self.state.send_replace(Arc::clone(&next));
        tracing::debug!(
            lines = next.len(),
            quantity = next.total_quantity(),
            "cart committed"
        );
        next
    }
}

fn ensure_in_stock(item_id: ItemId, requested: i64, stock: &StockRecord) -> Result<()> {
    if requested > stock.amount {
        return Err(CartError::StockExceeded {
            item_id,
            requested,
            available: stock.amount,
        });
    }
    Ok(())
}

fn service_failure(item_id: ItemId, err: CartError) -> CartError {
    match err {
        err @ CartError::ServiceUnavailable { .. } => err,
        other => CartError::unavailable(item_id, other),
    }
}

fn load_snapshot<S: CartStore>(store: &S, key: &str) -> Cart {
    let raw = match store.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, key, "could not read stored cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Vec<Item>>(&raw) {
        Ok(items) => {
            let (cart, dropped) = Cart::from_lines(items);
            if dropped > 0 {
                tracing::warn!(dropped, key, "discarded invalid lines from stored cart");
            }
            cart
        }
        Err(e) => {
            tracing::warn!(error = %e, key, "stored cart is corrupt, starting empty");
            Cart::new()
        }
    }
}
