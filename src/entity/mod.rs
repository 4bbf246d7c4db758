pub mod bids;
pub mod comments;
pub mod products;
pub mod sessions;
pub mod user_products;
pub mod users;
pub mod watchlist_products;
pub mod watchlists;

pub use bids::Entity as Bids;
pub use comments::Entity as Comments;
pub use products::Entity as Products;
pub use sessions::Entity as Sessions;
pub use user_products::Entity as UserProducts;
pub use users::Entity as Users;
pub use watchlist_products::Entity as WatchlistProducts;
pub use watchlists::Entity as Watchlists;
