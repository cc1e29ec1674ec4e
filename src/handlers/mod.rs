pub mod catalog;
pub mod health;
pub mod orders;
pub mod pricing;

use crate::cms::CmsClient;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<crate::services::orders::OrderService>,
    pub pricing: Arc<crate::services::pricing::PricingService>,
    pub cms: Arc<CmsClient>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, cms: Arc<CmsClient>) -> Self {
        let orders = Arc::new(crate::services::orders::OrderService::new(
            db,
            Some(event_sender),
        ));
        let pricing = Arc::new(crate::services::pricing::PricingService::new(cms.clone()));

        Self {
            orders,
            pricing,
            cms,
        }
    }
}
