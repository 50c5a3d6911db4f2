//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::common::Config;
use crate::domains::auth::JwtService;
use crate::domains::catalog::data::PgCatalogStore;
use crate::kernel::{
    BaseCatalogStore, BasePlacesClient, GooglePlacesClient, NoopPlacesClient, PlaceResolver,
    ServerDeps,
};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    add_wishlist_handler, cancel_booking_handler, create_booking_handler, create_review_handler,
    get_destination_handler, get_experience_handler, get_guide_handler, get_listing_handler,
    get_package_handler, health_handler, list_bookings_handler, list_destinations_handler,
    list_experiences_handler, list_guides_handler, list_packages_handler, list_reviews_handler,
    list_wishlist_handler, login_handler, me_handler, register_handler, remove_wishlist_handler,
    search_listings_handler, wishlist_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router and its dependency graph.
///
/// Without a places API key the provider client is a no-op: catalog search
/// serves local records only and foreign ids never resolve.
pub fn build_app(pool: PgPool, config: &Config) -> Result<Router> {
    let places: Arc<dyn BasePlacesClient> = match &config.google_maps_api_key {
        Some(key) => Arc::new(GooglePlacesClient::new(key.clone())?),
        None => {
            tracing::warn!("GOOGLE_MAPS_API_KEY not set, external place resolution disabled");
            Arc::new(NoopPlacesClient)
        }
    };

    let catalog: Arc<dyn BaseCatalogStore> = Arc::new(PgCatalogStore::new(pool.clone()));
    let resolver = Arc::new(PlaceResolver::new(catalog.clone(), places.clone()));
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));

    let deps = Arc::new(ServerDeps::new(
        pool.clone(),
        catalog,
        places,
        resolver,
        jwt_service.clone(),
    ));

    let app_state = AppState {
        db_pool: pool,
        deps,
        jwt_service: jwt_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let jwt_service_for_middleware = jwt_service.clone();

    let app = Router::new()
        .route("/health", get(health_handler))
        // Auth
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/me", get(me_handler))
        // Listings
        .route("/api/listings", get(search_listings_handler))
        .route("/api/listings/:id", get(get_listing_handler))
        .route(
            "/api/listings/:id/reviews",
            get(list_reviews_handler).post(create_review_handler),
        )
        // Bookings
        .route(
            "/api/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .route("/api/bookings/:id/cancel", post(cancel_booking_handler))
        // Wishlist
        .route("/api/wishlist", get(list_wishlist_handler))
        .route(
            "/api/wishlist/:id",
            post(add_wishlist_handler).delete(remove_wishlist_handler),
        )
        .route("/api/wishlist/:id/status", get(wishlist_status_handler))
        // Content
        .route("/api/destinations", get(list_destinations_handler))
        .route("/api/destinations/:id", get(get_destination_handler))
        .route("/api/guides", get(list_guides_handler))
        .route("/api/guides/:id", get(get_guide_handler))
        .route("/api/experiences", get(list_experiences_handler))
        .route("/api/experiences/:id", get(get_experience_handler))
        .route("/api/packages", get(list_packages_handler))
        .route("/api/packages/:id", get(get_package_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
