use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    forms::{FormErrors, ListingForm},
    models::Product,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct IndexPage {
    pub products: Vec<Product>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct CreatePage {
    pub form: ListingForm,
    pub errors: Option<FormErrors>,
}
