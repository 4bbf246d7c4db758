use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::{
    dto::watchlist::WatchlistPage,
    entity::{Products, WatchlistProducts, Watchlists, products, watchlist_products, watchlists},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::{Template, View},
    state::AppState,
};

/// Result of a get-or-create lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Existing(T),
    Created(T),
}

impl<T> Lookup<T> {
    pub fn was_created(&self) -> bool {
        matches!(self, Lookup::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Lookup::Existing(value) | Lookup::Created(value) => value,
        }
    }
}

/// What adding a product to the requester's watchlist did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistAddition {
    Added { created_watchlist: bool },
    AlreadyPresent,
}

pub async fn find_watchlist<C>(db: &C, user_id: i32) -> Result<Option<watchlists::Model>, DbErr>
where
    C: ConnectionTrait,
{
    Watchlists::find()
        .filter(watchlists::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Returns the user's watchlist, creating it first if the user has none.
pub async fn get_or_create_watchlist<C>(
    db: &C,
    user_id: i32,
) -> Result<Lookup<watchlists::Model>, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    if let Some(existing) = find_watchlist(db, user_id).await? {
        return Ok(Lookup::Existing(existing));
    }

    // Savepoint when `db` is already a transaction, so a failed insert leaves it usable.
    let attempt = db.begin().await?;
    let created = watchlists::ActiveModel {
        user_id: Set(user_id),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&attempt)
    .await;

    match created {
        Ok(watchlist) => {
            attempt.commit().await?;
            tracing::info!(user_id, watchlist_id = watchlist.id, "watchlist created");
            Ok(Lookup::Created(watchlist))
        }
        // Lost a race with a concurrent first add; the unique user_id kept it single.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            attempt.rollback().await?;
            find_watchlist(db, user_id)
                .await?
                .map(Lookup::Existing)
                .ok_or(err)
        }
        Err(err) => Err(err),
    }
}

pub async fn add_to_watchlist(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
) -> AppResult<WatchlistAddition> {
    let txn = state.orm.begin().await?;
    let lookup = get_or_create_watchlist(&txn, user.user_id).await?;
    let created_watchlist = lookup.was_created();
    let watchlist = lookup.into_inner();

    let present = WatchlistProducts::find_by_id((watchlist.id, product_id))
        .one(&txn)
        .await?
        .is_some();
    if present {
        txn.commit().await?;
        return Ok(WatchlistAddition::AlreadyPresent);
    }

    WatchlistProducts::insert(watchlist_products::ActiveModel {
        watchlist_id: Set(watchlist.id),
        product_id: Set(product_id),
    })
    .exec_without_returning(&txn)
    .await?;
    txn.commit().await?;

    tracing::debug!(user_id = user.user_id, product_id, "product added to watchlist");
    Ok(WatchlistAddition::Added { created_watchlist })
}

/// The requester's watchlist. Never creates one.
pub async fn view_watchlist(state: &AppState, user: &AuthUser) -> AppResult<View<WatchlistPage>> {
    let page = match find_watchlist(&state.orm, user.user_id).await? {
        Some(watchlist) => {
            let products = watchlist
                .find_related(Products)
                .order_by_asc(products::Column::Id)
                .all(&state.orm)
                .await?
                .into_iter()
                .map(Product::from)
                .collect();
            WatchlistPage {
                products: Some(products),
                watchlist_not_exist: false,
            }
        }
        None => WatchlistPage {
            products: None,
            watchlist_not_exist: true,
        },
    };
    Ok(View::render(Template::WatchList, page))
}
