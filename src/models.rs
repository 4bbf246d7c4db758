use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::{comments, products, users};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    pub img: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub username: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            starting_bid: model.starting_bid,
            img: model.img,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl Comment {
    pub fn from_entity(model: comments::Model, author: Option<users::Model>) -> Self {
        Self {
            id: model.id,
            username: author.map(|u| u.username).unwrap_or_default(),
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
