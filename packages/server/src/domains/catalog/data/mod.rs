pub mod postgres;

pub use postgres::PgCatalogStore;
