mod common;

use auction_web::{
    dto::product_page::{HighestBid, Notice, ProductAction, ProductPage, Winner},
    entity::{Bids, Comments, WatchlistProducts, Watchlists, bids},
    forms::{BidForm, CommentForm},
    middleware::auth::AuthUser,
    response::Template,
    services::{
        bid_service::{self, BidOutcome},
        product_service,
        watchlist_service::{self, WatchlistAddition},
    },
    state::AppState,
};
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};

use common::{create_product, create_user, setup_state};

fn bid(price: &str) -> ProductAction {
    ProductAction::Bid(BidForm {
        price: Some(price.to_string()),
    })
}

async fn act(
    state: &AppState,
    user: &AuthUser,
    product_id: i32,
    action: ProductAction,
) -> anyhow::Result<ProductPage> {
    let view = product_service::handle_action(state, user, product_id, action).await?;
    let page = view.into_page().expect("product actions always render");
    assert_eq!(page.template, Template::ProductPage);
    Ok(page.context)
}

async fn bid_rows(state: &AppState) -> anyhow::Result<Vec<bids::Model>> {
    Ok(Bids::find()
        .order_by_asc(bids::Column::Id)
        .all(&state.orm)
        .await?)
}

// Chair, starting at 10: 8 is rejected, 12 stands, 11 afterwards is rejected.
#[tokio::test]
async fn chair_bidding_scenario() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let bob = create_user(&state, "bob").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;

    let page = act(&state, &alice, chair.id, bid("8")).await?;
    assert_eq!(
        page.notice,
        Some(Notice::BidBelowStarting { starting_bid: 10 })
    );
    assert_eq!(page.highest_bid, HighestBid::NoBids);
    assert!(bid_rows(&state).await?.is_empty());

    let page = act(&state, &alice, chair.id, bid("12")).await?;
    assert_eq!(page.notice, Some(Notice::BidAccepted));
    assert_eq!(
        page.highest_bid,
        HighestBid::Bid {
            price: 12,
            username: "alice".into()
        }
    );

    let page = act(&state, &bob, chair.id, bid("11")).await?;
    assert_eq!(
        page.notice,
        Some(Notice::BidBelowLatest {
            latest_price: 12,
            latest_username: "alice".into()
        })
    );
    assert_eq!(page.highest_bid.price(), Some(12));
    assert_eq!(page.highest_bid.username(), Some("alice"));

    let rows = bid_rows(&state).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].price, rows[0].user_id), (12, alice.user_id));
    Ok(())
}

#[tokio::test]
async fn matching_the_latest_bid_is_accepted() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let bob = create_user(&state, "bob").await?;
    let lamp = create_product(&state, &seller, "Lamp", 25).await?;

    // The very first bid may equal the starting price.
    let outcome = bid_service::place_bid(&state, &alice, &lamp, 25).await?;
    assert!(matches!(outcome, BidOutcome::Accepted(ref b) if b.price == 25));

    let outcome = bid_service::place_bid(&state, &bob, &lamp, 25).await?;
    assert!(matches!(outcome, BidOutcome::Accepted(_)));

    let highest = bid_service::highest_bid(&state.orm, lamp.id).await?;
    assert_eq!(
        highest,
        HighestBid::Bid {
            price: 25,
            username: "bob".into()
        }
    );
    Ok(())
}

#[tokio::test]
async fn stored_bids_never_fall_below_start_or_predecessor() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let bidder = create_user(&state, "bidder").await?;
    let bike = create_product(&state, &seller, "Bicycle", 100).await?;

    for price in [50, 100, 90, 150, 149, 150, 99, 200, 10, 201] {
        bid_service::place_bid(&state, &bidder, &bike, price).await?;
    }

    let prices: Vec<i64> = bid_rows(&state).await?.iter().map(|b| b.price).collect();
    assert_eq!(prices, vec![100, 150, 150, 200, 201]);
    assert!(prices.iter().all(|p| *p >= bike.starting_bid));
    assert!(prices.windows(2).all(|w| w[1] >= w[0]));
    Ok(())
}

#[tokio::test]
async fn invalid_bid_form_rerenders_with_errors() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;

    let page = act(&state, &alice, chair.id, bid("twelve")).await?;
    assert_eq!(page.notice, Some(Notice::InvalidBid));
    assert_eq!(page.bid_form.price.as_deref(), Some("twelve"));
    let errors = page.form_errors.expect("field errors");
    assert_eq!(errors.field("price").len(), 1);
    assert_eq!(page.highest_bid, HighestBid::NoBids);
    assert!(bid_rows(&state).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn watchlist_is_created_once_and_adds_are_idempotent() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;
    let lamp = create_product(&state, &seller, "Lamp", 25).await?;

    let page = act(&state, &alice, chair.id, ProductAction::Watchlist).await?;
    assert_eq!(
        page.notice,
        Some(Notice::WatchlistAdded {
            created_watchlist: true
        })
    );

    let page = act(&state, &alice, chair.id, ProductAction::Watchlist).await?;
    assert_eq!(page.notice, Some(Notice::AlreadyWatching));

    let added = watchlist_service::add_to_watchlist(&state, &alice, lamp.id).await?;
    assert_eq!(
        added,
        WatchlistAddition::Added {
            created_watchlist: false
        }
    );

    assert_eq!(Watchlists::find().count(&state.orm).await?, 1);
    assert_eq!(WatchlistProducts::find().count(&state.orm).await?, 2);

    let view = watchlist_service::view_watchlist(&state, &alice).await?;
    let page = view.into_page().expect("watchlist renders");
    assert_eq!(page.template, Template::WatchList);
    assert!(!page.context.watchlist_not_exist);
    let titles: Vec<String> = page
        .context
        .products
        .expect("products present")
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["Chair".to_string(), "Lamp".to_string()]);
    Ok(())
}

#[tokio::test]
async fn get_or_create_reports_which_branch_ran() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice").await?;

    let first = watchlist_service::get_or_create_watchlist(&state.orm, alice.user_id).await?;
    assert!(first.was_created());
    let second = watchlist_service::get_or_create_watchlist(&state.orm, alice.user_id).await?;
    assert!(!second.was_created());
    assert_eq!(first.into_inner().id, second.into_inner().id);
    Ok(())
}

#[tokio::test]
async fn fresh_user_has_no_watchlist() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice").await?;

    let view = watchlist_service::view_watchlist(&state, &alice).await?;
    let page = view.into_page().expect("watchlist renders");
    assert!(page.context.watchlist_not_exist);
    assert!(page.context.products.is_none());
    // Viewing never creates one.
    assert_eq!(Watchlists::find().count(&state.orm).await?, 0);
    Ok(())
}

#[tokio::test]
async fn comments_are_listed_with_authors() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;

    let comment = |text: &str| {
        ProductAction::Comment(CommentForm {
            comment: Some(text.to_string()),
        })
    };

    act(&state, &alice, chair.id, comment("Is it sturdy?")).await?;
    let page = act(&state, &seller, chair.id, comment("Very.")).await?;
    assert_eq!(page.notice, Some(Notice::CommentPosted));
    let thread: Vec<(String, String)> = page
        .comments
        .into_iter()
        .map(|c| (c.username, c.comment))
        .collect();
    assert_eq!(
        thread,
        vec![
            ("alice".to_string(), "Is it sturdy?".to_string()),
            ("seller".to_string(), "Very.".to_string()),
        ]
    );

    let page = act(&state, &alice, chair.id, comment("   ")).await?;
    assert_eq!(page.notice, Some(Notice::InvalidComment));
    assert!(page.form_errors.is_some());
    assert_eq!(page.comments.len(), 2);
    assert_eq!(Comments::find().count(&state.orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn only_the_owner_can_close() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;

    let page = act(&state, &seller, chair.id, ProductAction::Close).await?;
    assert_eq!(page.notice, Some(Notice::Closed { winner: None }));

    bid_service::place_bid(&state, &alice, &chair, 15).await?;
    let bids_before = Bids::find().count(&state.orm).await?;

    let page = act(&state, &alice, chair.id, ProductAction::Close).await?;
    assert_eq!(page.notice, Some(Notice::CloseForbidden));
    assert_eq!(Bids::find().count(&state.orm).await?, bids_before);
    assert_eq!(Watchlists::find().count(&state.orm).await?, 0);

    let page = act(&state, &seller, chair.id, ProductAction::Close).await?;
    assert_eq!(
        page.notice,
        Some(Notice::Closed {
            winner: Some(Winner {
                username: "alice".into(),
                price: 15
            })
        })
    );
    // Closing is not recorded: bidding continues to work afterwards.
    let outcome = bid_service::place_bid(&state, &alice, &chair, 16).await?;
    assert!(matches!(outcome, BidOutcome::Accepted(_)));
    Ok(())
}

#[tokio::test]
async fn viewing_reports_no_bids_then_the_latest() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let seller = create_user(&state, "seller").await?;
    let alice = create_user(&state, "alice").await?;
    let chair = create_product(&state, &seller, "Chair", 10).await?;

    let view = product_service::view_product(&state, chair.id).await?;
    let page = view.into_page().expect("product page renders");
    assert_eq!(page.context.highest_bid, HighestBid::NoBids);
    assert_eq!(page.context.notice, None);
    assert_eq!(page.context.product.title, "Chair");

    bid_service::place_bid(&state, &alice, &chair, 11).await?;
    let view = product_service::view_product(&state, chair.id).await?;
    assert_eq!(
        view.page().map(|p| p.context.highest_bid.clone()),
        Some(HighestBid::Bid {
            price: 11,
            username: "alice".into()
        })
    );
    Ok(())
}

#[tokio::test]
async fn unknown_product_is_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let alice = create_user(&state, "alice").await?;

    let err = product_service::view_product(&state, 404).await.unwrap_err();
    assert!(matches!(err, auction_web::error::AppError::NotFound));

    let err = product_service::handle_action(&state, &alice, 404, ProductAction::Watchlist)
        .await
        .unwrap_err();
    assert!(matches!(err, auction_web::error::AppError::NotFound));
    Ok(())
}
