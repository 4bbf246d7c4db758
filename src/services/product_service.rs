use sea_orm::EntityTrait;

use crate::{
    dto::product_page::{HighestBid, Notice, ProductAction, ProductPage, Winner},
    entity::{Products, products},
    error::{AppError, AppResult},
    forms::{BidForm, CommentForm},
    middleware::auth::AuthUser,
    response::{Template, View},
    services::{
        bid_service::{self, BidOutcome},
        comment_service, listing_service,
        watchlist_service::{self, WatchlistAddition},
    },
    state::AppState,
};

pub async fn find_product(state: &AppState, id: i32) -> AppResult<products::Model> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Fresh page context: current highest bid and all comments, read after
/// whatever the request changed.
async fn load_page(state: &AppState, product: products::Model) -> AppResult<ProductPage> {
    let highest_bid = bid_service::highest_bid(&state.orm, product.id).await?;
    let comments = comment_service::list_comments(&state.orm, product.id).await?;
    Ok(ProductPage::new(product.into(), highest_bid, comments))
}

pub async fn view_product(state: &AppState, id: i32) -> AppResult<View<ProductPage>> {
    let product = find_product(state, id).await?;
    let page = load_page(state, product).await?;
    Ok(View::render(Template::ProductPage, page))
}

pub async fn handle_action(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    action: ProductAction,
) -> AppResult<View<ProductPage>> {
    let product = find_product(state, id).await?;
    let page = match action {
        ProductAction::Watchlist => watch(state, user, product).await?,
        ProductAction::Bid(form) => bid(state, user, product, form).await?,
        ProductAction::Comment(form) => comment(state, user, product, form).await?,
        ProductAction::Close => close(state, user, product).await?,
    };
    Ok(View::render(Template::ProductPage, page))
}

async fn watch(
    state: &AppState,
    user: &AuthUser,
    product: products::Model,
) -> AppResult<ProductPage> {
    let notice = match watchlist_service::add_to_watchlist(state, user, product.id).await? {
        WatchlistAddition::Added { created_watchlist } => {
            Notice::WatchlistAdded { created_watchlist }
        }
        WatchlistAddition::AlreadyPresent => Notice::AlreadyWatching,
    };
    Ok(load_page(state, product).await?.with_notice(notice))
}

async fn bid(
    state: &AppState,
    user: &AuthUser,
    product: products::Model,
    form: BidForm,
) -> AppResult<ProductPage> {
    let price = match form.validate() {
        Ok(price) => price,
        Err(errors) => {
            let mut page = load_page(state, product).await?.with_notice(Notice::InvalidBid);
            page.bid_form = form;
            page.form_errors = Some(errors);
            return Ok(page);
        }
    };

    let notice = match bid_service::place_bid(state, user, &product, price).await? {
        BidOutcome::BelowStarting { starting_bid } => Notice::BidBelowStarting { starting_bid },
        BidOutcome::BelowLatest {
            latest_price,
            latest_username,
        } => Notice::BidBelowLatest {
            latest_price,
            latest_username,
        },
        BidOutcome::Accepted(_) => Notice::BidAccepted,
    };
    Ok(load_page(state, product).await?.with_notice(notice))
}

async fn comment(
    state: &AppState,
    user: &AuthUser,
    product: products::Model,
    form: CommentForm,
) -> AppResult<ProductPage> {
    match form.validate() {
        Ok(text) => {
            comment_service::post_comment(state, user, product.id, text).await?;
            Ok(load_page(state, product)
                .await?
                .with_notice(Notice::CommentPosted))
        }
        Err(errors) => {
            let mut page = load_page(state, product)
                .await?
                .with_notice(Notice::InvalidComment);
            page.comment_form = form;
            page.form_errors = Some(errors);
            Ok(page)
        }
    }
}

/// Only the owner may close; closing reports the winner and stores nothing.
async fn close(
    state: &AppState,
    user: &AuthUser,
    product: products::Model,
) -> AppResult<ProductPage> {
    let owner = listing_service::is_owner(&state.orm, user.user_id, product.id).await?;
    let page = load_page(state, product).await?;
    let notice = if owner {
        let winner = match &page.highest_bid {
            HighestBid::NoBids => None,
            HighestBid::Bid { price, username } => Some(Winner {
                username: username.clone(),
                price: *price,
            }),
        };
        Notice::Closed { winner }
    } else {
        tracing::debug!(user_id = user.user_id, "close attempt by non-owner");
        Notice::CloseForbidden
    };
    Ok(page.with_notice(notice))
}
