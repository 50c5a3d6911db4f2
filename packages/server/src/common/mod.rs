pub mod config;
pub mod entity_ids;
pub mod error;
pub mod id;

pub use config::Config;
pub use entity_ids::*;
pub use error::ApiError;
pub use id::RecordId;
