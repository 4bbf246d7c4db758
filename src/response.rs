use axum::{
    Json,
    http::{HeaderValue, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

/// Templates the presentation layer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum Template {
    #[serde(rename = "auctions/index.html")]
    Index,
    #[serde(rename = "auctions/login.html")]
    Login,
    #[serde(rename = "auctions/register.html")]
    Register,
    #[serde(rename = "auctions/create.html")]
    Create,
    #[serde(rename = "auctions/product_page.html")]
    ProductPage,
    #[serde(rename = "auctions/watch_list.html")]
    WatchList,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Index => "auctions/index.html",
            Template::Login => "auctions/login.html",
            Template::Register => "auctions/register.html",
            Template::Create => "auctions/create.html",
            Template::ProductPage => "auctions/product_page.html",
            Template::WatchList => "auctions/watch_list.html",
        }
    }
}

/// Template plus the context it is rendered with.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<C> {
    pub template: Template,
    pub context: C,
}

/// What a page handler decided to do with the request.
#[derive(Debug)]
pub enum View<C> {
    Render(Page<C>),
    Redirect {
        to: &'static str,
        cookies: Vec<String>,
    },
}

impl<C> View<C> {
    pub fn render(template: Template, context: C) -> Self {
        View::Render(Page { template, context })
    }

    pub fn redirect(to: &'static str) -> Self {
        View::Redirect {
            to,
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        if let View::Redirect { cookies, .. } = &mut self {
            cookies.push(cookie);
        }
        self
    }

    pub fn page(&self) -> Option<&Page<C>> {
        match self {
            View::Render(page) => Some(page),
            View::Redirect { .. } => None,
        }
    }

    pub fn into_page(self) -> Option<Page<C>> {
        match self {
            View::Render(page) => Some(page),
            View::Redirect { .. } => None,
        }
    }
}

impl<C: Serialize> IntoResponse for View<C> {
    fn into_response(self) -> Response {
        match self {
            View::Render(page) => {
                let message = page.template.name();
                Json(ApiResponse::success(message, page, Some(Meta::empty()))).into_response()
            }
            View::Redirect { to, cookies } => {
                let mut response = Redirect::to(to).into_response();
                for cookie in cookies {
                    match HeaderValue::from_str(&cookie) {
                        Ok(value) => {
                            response.headers_mut().append(header::SET_COOKIE, value);
                        }
                        Err(err) => tracing::warn!(error = %err, "dropping malformed cookie"),
                    }
                }
                response
            }
        }
    }
}
