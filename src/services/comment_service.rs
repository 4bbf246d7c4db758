use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::{
    entity::{Comments, Users, comments},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Comment,
    state::AppState,
};

/// Comments on the product with their authors, oldest first.
pub async fn list_comments<C>(db: &C, product_id: i32) -> Result<Vec<Comment>, DbErr>
where
    C: ConnectionTrait,
{
    let rows = Comments::find()
        .filter(comments::Column::ProductId.eq(product_id))
        .order_by_asc(comments::Column::Id)
        .find_also_related(Users)
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(comment, author)| Comment::from_entity(comment, author))
        .collect())
}

pub async fn post_comment(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    text: String,
) -> AppResult<comments::Model> {
    let comment = comments::ActiveModel {
        user_id: Set(user.user_id),
        product_id: Set(product_id),
        comment: Set(text),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(&state.orm)
    .await?;
    tracing::debug!(product_id, comment_id = comment.id, "comment posted");
    Ok(comment)
}
