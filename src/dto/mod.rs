pub mod auth;
pub mod listings;
pub mod product_page;
pub mod watchlist;
