//! Binding and validation of submitted form data.
//!
//! Every form arrives with all of its fields optional and as text, exactly as
//! the browser posted them. `validate` turns a raw form into a typed record or
//! into [`FormErrors`] keyed by field name, which the page handlers hand back
//! to the template together with the submitted values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const TITLE_MAX_LEN: usize = 64;
pub const DESCRIPTION_MAX_LEN: usize = 64;
pub const COMMENT_MAX_LEN: usize = 64;
pub const USERNAME_MAX_LEN: usize = 150;

const REQUIRED: &str = "This field is required.";
const NOT_A_NUMBER: &str = "Enter a whole number.";

/// Field name -> validation messages.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

fn required_text(
    errors: &mut FormErrors,
    field: &str,
    raw: Option<&str>,
    max_len: Option<usize>,
) -> String {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return String::new();
    }
    if let Some(max) = max_len {
        let len = value.chars().count();
        if len > max {
            errors.add(
                field,
                format!("Ensure this value has at most {max} characters (it has {len})."),
            );
        }
    }
    value.to_string()
}

fn required_int(errors: &mut FormErrors, field: &str, raw: Option<&str>) -> i64 {
    let value = raw.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        errors.add(field, REQUIRED);
        return 0;
    }
    match value.parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            errors.add(field, NOT_A_NUMBER);
            0
        }
    }
}

/// New listing as submitted from the create page.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct ListingForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub starting_bid: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub starting_bid: i64,
    pub img: String,
}

impl ListingForm {
    pub fn validate(&self) -> Result<NewListing, FormErrors> {
        let mut errors = FormErrors::default();
        let title = required_text(
            &mut errors,
            "title",
            self.title.as_deref(),
            Some(TITLE_MAX_LEN),
        );
        let description = required_text(
            &mut errors,
            "description",
            self.description.as_deref(),
            Some(DESCRIPTION_MAX_LEN),
        );
        let starting_bid = required_int(&mut errors, "starting_bid", self.starting_bid.as_deref());
        let img = required_text(&mut errors, "img", self.img.as_deref(), None);

        errors.into_result(NewListing {
            title,
            description,
            starting_bid,
            img,
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct BidForm {
    pub price: Option<String>,
}

impl BidForm {
    pub fn validate(&self) -> Result<i64, FormErrors> {
        let mut errors = FormErrors::default();
        let price = required_int(&mut errors, "price", self.price.as_deref());
        errors.into_result(price)
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct CommentForm {
    pub comment: Option<String>,
}

impl CommentForm {
    pub fn validate(&self) -> Result<String, FormErrors> {
        let mut errors = FormErrors::default();
        let comment = required_text(
            &mut errors,
            "comment",
            self.comment.as_deref(),
            Some(COMMENT_MAX_LEN),
        );
        errors.into_result(comment)
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct RegisterForm {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub confirmation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, FormErrors> {
        let mut errors = FormErrors::default();
        let username = required_text(
            &mut errors,
            "username",
            self.username.as_deref(),
            Some(USERNAME_MAX_LEN),
        );
        let email = self.email.as_deref().map(str::trim).unwrap_or_default().to_string();
        // Passwords are compared verbatim, never trimmed.
        let password = self.password.clone().unwrap_or_default();
        if password.is_empty() {
            errors.add("password", REQUIRED);
        }
        let confirmation = self.confirmation.clone().unwrap_or_default();

        errors.into_result(Registration {
            username,
            email,
            password,
            confirmation,
        })
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, description: &str, starting_bid: &str, img: &str) -> ListingForm {
        ListingForm {
            title: Some(title.into()),
            description: Some(description.into()),
            starting_bid: Some(starting_bid.into()),
            img: Some(img.into()),
        }
    }

    #[test]
    fn valid_listing_is_trimmed_and_parsed() {
        let form = listing(" Chair ", "Oak", " 10 ", "https://img.example/chair.png");
        let listing = form.validate().expect("valid listing");
        assert_eq!(listing.title, "Chair");
        assert_eq!(listing.starting_bid, 10);
    }

    #[test]
    fn listing_reports_every_bad_field() {
        let form = ListingForm {
            title: Some("x".repeat(TITLE_MAX_LEN + 1)),
            description: None,
            starting_bid: Some("ten".into()),
            img: Some("   ".into()),
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("title").len(), 1);
        assert!(errors.field("title")[0].starts_with("Ensure this value has at most 64"));
        assert_eq!(errors.field("description"), [REQUIRED.to_string()]);
        assert_eq!(errors.field("starting_bid"), [NOT_A_NUMBER.to_string()]);
        assert_eq!(errors.field("img"), [REQUIRED.to_string()]);
    }

    #[test]
    fn title_limit_counts_characters_not_bytes() {
        let form = listing(&"é".repeat(TITLE_MAX_LEN), "d", "1", "i");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn bid_price_must_be_a_whole_number() {
        assert_eq!(BidForm { price: Some("12".into()) }.validate(), Ok(12));
        assert_eq!(BidForm { price: Some("-3".into()) }.validate(), Ok(-3));

        let errors = BidForm { price: Some("12.5".into()) }.validate().unwrap_err();
        assert_eq!(errors.field("price"), [NOT_A_NUMBER.to_string()]);

        let errors = BidForm { price: None }.validate().unwrap_err();
        assert_eq!(errors.field("price"), [REQUIRED.to_string()]);
    }

    #[test]
    fn comment_is_required_and_bounded() {
        assert_eq!(
            CommentForm { comment: Some("nice".into()) }.validate(),
            Ok("nice".to_string())
        );
        assert!(CommentForm { comment: Some(" ".into()) }.validate().is_err());
        assert!(
            CommentForm {
                comment: Some("c".repeat(COMMENT_MAX_LEN + 1))
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn registration_keeps_password_whitespace() {
        let form = RegisterForm {
            username: Some("alice".into()),
            email: Some("alice@example.com".into()),
            password: Some(" secret ".into()),
            confirmation: Some("secret".into()),
        };
        let registration = form.validate().expect("fields present");
        assert_ne!(registration.password, registration.confirmation);
    }

    #[test]
    fn registration_requires_username_and_password() {
        let errors = RegisterForm::default().validate().unwrap_err();
        assert_eq!(errors.field("username"), [REQUIRED.to_string()]);
        assert_eq!(errors.field("password"), [REQUIRED.to_string()]);
        assert!(errors.field("email").is_empty());
    }
}
