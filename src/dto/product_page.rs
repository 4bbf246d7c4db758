use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    forms::{BidForm, CommentForm, FormErrors},
    models::{Comment, Product},
};

/// Raw submission to the product page. `who_submit` selects the action.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ProductActionForm {
    pub who_submit: Option<String>,
    pub price: Option<String>,
    pub comment: Option<String>,
}

/// One product page action per `who_submit` tag.
#[derive(Debug, Clone)]
pub enum ProductAction {
    Watchlist,
    Bid(BidForm),
    Comment(CommentForm),
    Close,
}

impl TryFrom<ProductActionForm> for ProductAction {
    type Error = AppError;

    fn try_from(form: ProductActionForm) -> Result<Self, Self::Error> {
        match form.who_submit.as_deref().map(str::trim) {
            Some("watchlist") => Ok(ProductAction::Watchlist),
            Some("bid") => Ok(ProductAction::Bid(BidForm { price: form.price })),
            Some("comment") => Ok(ProductAction::Comment(CommentForm {
                comment: form.comment,
            })),
            Some("close") => Ok(ProductAction::Close),
            Some(other) => Err(AppError::BadRequest(format!(
                "unknown who_submit action `{other}`"
            ))),
            None => Err(AppError::BadRequest("missing who_submit action".into())),
        }
    }
}

/// The newest bid on a product, or the fact that nobody has bid yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HighestBid {
    NoBids,
    Bid { price: i64, username: String },
}

impl HighestBid {
    pub fn price(&self) -> Option<i64> {
        match self {
            HighestBid::NoBids => None,
            HighestBid::Bid { price, .. } => Some(*price),
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            HighestBid::NoBids => None,
            HighestBid::Bid { username, .. } => Some(username),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Winner {
    pub username: String,
    pub price: i64,
}

/// Outcome of the action that produced the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    WatchlistAdded { created_watchlist: bool },
    AlreadyWatching,
    BidBelowStarting { starting_bid: i64 },
    BidBelowLatest { latest_price: i64, latest_username: String },
    BidAccepted,
    InvalidBid,
    CommentPosted,
    InvalidComment,
    Closed { winner: Option<Winner> },
    CloseForbidden,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub product: Product,
    pub highest_bid: HighestBid,
    pub comments: Vec<Comment>,
    pub notice: Option<Notice>,
    pub bid_form: BidForm,
    pub comment_form: CommentForm,
    pub form_errors: Option<FormErrors>,
}

impl ProductPage {
    pub fn new(product: Product, highest_bid: HighestBid, comments: Vec<Comment>) -> Self {
        Self {
            product,
            highest_bid,
            comments,
            notice: None,
            bid_form: BidForm::default(),
            comment_form: CommentForm::default(),
            form_errors: None,
        }
    }

    pub fn with_notice(mut self, notice: Notice) -> Self {
        self.notice = Some(notice);
        self
    }
}
