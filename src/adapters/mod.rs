// Adapters layer: concrete implementations of the cart ports (http inventory, storage, notifications).

pub mod http;
pub mod notify;
pub mod store;

pub use http::HttpInventory;
pub use notify::{Notification, RecordingNotifier, TracingNotifier};
pub use store::{FileStore, MemoryStore};
