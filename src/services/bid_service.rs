use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use crate::{
    dto::product_page::HighestBid,
    entity::{Bids, Users, bids, products},
    error::AppResult,
    middleware::auth::AuthUser,
    state::AppState,
};

/// What happened to a submitted bid.
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    BelowStarting { starting_bid: i64 },
    BelowLatest { latest_price: i64, latest_username: String },
    Accepted(bids::Model),
}

/// The newest bid on the product. Bids can only rise, so the newest is also
/// the highest.
pub async fn highest_bid<C>(db: &C, product_id: i32) -> Result<HighestBid, DbErr>
where
    C: ConnectionTrait,
{
    let latest = Bids::find()
        .filter(bids::Column::ProductId.eq(product_id))
        .order_by_desc(bids::Column::Id)
        .find_also_related(Users)
        .one(db)
        .await?;

    Ok(match latest {
        None => HighestBid::NoBids,
        Some((bid, bidder)) => HighestBid::Bid {
            price: bid.price,
            username: bidder.map(|u| u.username).unwrap_or_default(),
        },
    })
}

/// Accepts `price` unless it is below the starting bid or below the bid
/// that was newest when this one arrived. Rejected bids are never stored.
pub async fn place_bid(
    state: &AppState,
    user: &AuthUser,
    product: &products::Model,
    price: i64,
) -> AppResult<BidOutcome> {
    if price < product.starting_bid {
        tracing::info!(
            product_id = product.id,
            price,
            starting_bid = product.starting_bid,
            "bid below starting price rejected"
        );
        return Ok(BidOutcome::BelowStarting {
            starting_bid: product.starting_bid,
        });
    }

    let txn = state.orm.begin().await?;
    if let HighestBid::Bid {
        price: latest_price,
        username: latest_username,
    } = highest_bid(&txn, product.id).await?
    {
        if price < latest_price {
            txn.rollback().await?;
            tracing::info!(
                product_id = product.id,
                price,
                latest_price,
                "bid below latest bid rejected"
            );
            return Ok(BidOutcome::BelowLatest {
                latest_price,
                latest_username,
            });
        }
    }

    let bid = bids::ActiveModel {
        user_id: Set(user.user_id),
        product_id: Set(product.id),
        price: Set(price),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        product_id = product.id,
        bid_id = bid.id,
        user_id = user.user_id,
        price,
        "bid accepted"
    );
    Ok(BidOutcome::Accepted(bid))
}
