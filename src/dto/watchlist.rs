use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Product;

#[derive(Debug, Serialize, ToSchema)]
pub struct WatchlistPage {
    /// Absent when the user never added anything to a watchlist.
    pub products: Option<Vec<Product>>,
    pub watchlist_not_exist: bool,
}
