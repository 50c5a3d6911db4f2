//! Server dependencies (using traits for testability)
//!
//! Central dependency container handed to route handlers. External services
//! sit behind trait objects so tests can swap in mocks.

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseCatalogStore, BasePlacesClient, PlaceResolver};

/// Server dependencies accessible to route handlers.
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Catalog document store (listings).
    pub catalog: Arc<dyn BaseCatalogStore>,
    /// Outbound places provider client.
    pub places: Arc<dyn BasePlacesClient>,
    /// Identifier resolver over the two above.
    pub resolver: Arc<PlaceResolver>,
    /// JWT service for token creation and verification.
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        catalog: Arc<dyn BaseCatalogStore>,
        places: Arc<dyn BasePlacesClient>,
        resolver: Arc<PlaceResolver>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            db_pool,
            catalog,
            places,
            resolver,
            jwt_service,
        }
    }
}
