pub mod jwt;
pub mod models;

pub use jwt::{Claims, JwtService};
pub use models::user::{hash_password, verify_password, User};
