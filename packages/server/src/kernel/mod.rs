//! Infrastructure: collaborator traits, external clients, the resolver and
//! the dependency container.

pub mod deps;
pub mod places_client;
pub mod resolver;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use places_client::{GooglePlacesClient, NoopPlacesClient};
pub use resolver::{PlaceIdentifier, PlaceResolver};
pub use traits::{
    BaseCatalogStore, BasePlacesClient, CatalogFilter, GeoBounds, Place, StoreError,
};
