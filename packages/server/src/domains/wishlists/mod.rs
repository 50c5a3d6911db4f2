pub mod models;

pub use models::wishlist_item::WishlistItem;
