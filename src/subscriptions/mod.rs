//! Group subscription workflow: subscribers ask to join report groups,
//! admins approve, reject or revoke.

pub mod http;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use memory::MemorySubscriptionStore;
pub use postgres::PgSubscriptionStore;
pub use store::{StoreError, StoreResult, SubscriptionStore};
