use std::sync::Arc;

use crate::subscriptions::SubscriptionStore;

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod subscriptions;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriptionStore>,
}
