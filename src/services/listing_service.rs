use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, Set, TransactionTrait,
};

use crate::{
    dto::listings::{CreatePage, IndexPage},
    entity::{Products, UserProducts, products, user_products},
    error::AppResult,
    forms::ListingForm,
    middleware::auth::AuthUser,
    models::Product,
    response::{Template, View},
    state::AppState,
};

/// Every listing, oldest first.
pub async fn list_products(state: &AppState) -> AppResult<View<IndexPage>> {
    let products = Products::find()
        .order_by_asc(products::Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();
    Ok(View::render(Template::Index, IndexPage { products }))
}

pub fn create_form() -> View<CreatePage> {
    View::render(Template::Create, CreatePage::default())
}

/// Inserts the product and records the requester as its owner.
pub async fn create_listing(
    state: &AppState,
    user: &AuthUser,
    form: ListingForm,
) -> AppResult<View<CreatePage>> {
    let listing = match form.validate() {
        Ok(listing) => listing,
        Err(errors) => {
            return Ok(View::render(
                Template::Create,
                CreatePage {
                    form,
                    errors: Some(errors),
                },
            ));
        }
    };

    let txn = state.orm.begin().await?;
    let product = products::ActiveModel {
        title: Set(listing.title),
        description: Set(listing.description),
        starting_bid: Set(listing.starting_bid),
        img: Set(listing.img),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    UserProducts::insert(user_products::ActiveModel {
        user_id: Set(user.user_id),
        product_id: Set(product.id),
    })
    .exec_without_returning(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        product_id = product.id,
        user_id = user.user_id,
        starting_bid = product.starting_bid,
        "listing created"
    );
    Ok(View::redirect("/"))
}

pub async fn is_owner<C>(db: &C, user_id: i32, product_id: i32) -> Result<bool, DbErr>
where
    C: ConnectionTrait,
{
    let membership = UserProducts::find_by_id((user_id, product_id))
        .one(db)
        .await?;
    Ok(membership.is_some())
}
