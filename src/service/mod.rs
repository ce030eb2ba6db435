//! Business logic services over the subscriber store.

use std::sync::Arc;

use crate::database::Database;
use crate::service::subscriber_service::SubscriberService;

pub mod error;
pub mod subscriber_service;

/// Container for all application services.
pub struct Services {
    pub subscribers: Arc<SubscriberService>,
}

impl Services {
    /// Creates and initializes all services.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            subscribers: Arc::new(SubscriberService::new(db)),
        }
    }
}
