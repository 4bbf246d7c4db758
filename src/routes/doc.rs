use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginPage, RegisterPage},
        listings::{CreatePage, IndexPage},
        product_page::{HighestBid, Notice, ProductActionForm, ProductPage, Winner},
        watchlist::WatchlistPage,
    },
    forms::{BidForm, CommentForm, FormErrors, ListingForm, LoginForm, RegisterForm},
    middleware::auth::SESSION_COOKIE,
    models::{Comment, Product},
    response::{ApiResponse, Meta, Page, Template},
    routes::{auth, health, listings, product, watchlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login_form,
        auth::login,
        auth::logout,
        auth::register_form,
        auth::register,
        listings::index,
        listings::create_form,
        listings::create,
        product::product_page,
        product::product_action,
        watchlist::watching_list
    ),
    components(
        schemas(
            Product,
            Comment,
            Template,
            FormErrors,
            ListingForm,
            BidForm,
            CommentForm,
            LoginForm,
            RegisterForm,
            ProductActionForm,
            HighestBid,
            Winner,
            Notice,
            IndexPage,
            CreatePage,
            ProductPage,
            WatchlistPage,
            LoginPage,
            RegisterPage,
            Meta,
            ApiResponse<Page<IndexPage>>,
            ApiResponse<Page<ProductPage>>,
            ApiResponse<Page<WatchlistPage>>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Listings", description = "Listings, bids, comments and closing"),
        (name = "Watchlist", description = "Watchlist endpoints"),
        (name = "Auth", description = "Registration and sessions"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
