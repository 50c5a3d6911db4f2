pub mod wishlist_item;

pub use wishlist_item::WishlistItem;
