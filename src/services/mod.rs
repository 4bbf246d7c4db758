pub mod auth_service;
pub mod bid_service;
pub mod comment_service;
pub mod listing_service;
pub mod product_service;
pub mod watchlist_service;
