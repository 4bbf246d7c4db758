use auction_web::{
    db::{create_orm_conn, run_migrations},
    entity::{Products, UserProducts, Users, products, user_products, users},
    services::auth_service::hash_password,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")?;

    let orm = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let seller_id = ensure_user(&orm, "seller", "seller@example.com", "seller123").await?;
    let bidder_id = ensure_user(&orm, "bidder", "bidder@example.com", "bidder123").await?;
    seed_products(&orm, seller_id).await?;

    println!("Seed completed. Seller ID: {seller_id}, Bidder ID: {bidder_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<i32> {
    // If user already exists, keep it untouched
    if let Some(existing) = Users::find()
        .filter(users::Column::Username.eq(username))
        .one(orm)
        .await?
    {
        println!("User {username} already present");
        return Ok(existing.id);
    }

    let password_hash = hash_password(password)?;
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(orm)
    .await?;

    println!("Created user {username} (password {password})");
    Ok(user.id)
}

async fn seed_products(orm: &DatabaseConnection, owner_id: i32) -> anyhow::Result<()> {
    let existing = Products::find().count(orm).await?;
    if existing > 0 {
        println!("Products already seeded ({existing})");
        return Ok(());
    }

    let listings = [
        ("Chair", "Oak dining chair", 10, "https://picsum.photos/seed/chair/400"),
        ("Lamp", "Brass desk lamp", 25, "https://picsum.photos/seed/lamp/400"),
        ("Bicycle", "Steel frame, 3 gears", 120, "https://picsum.photos/seed/bike/400"),
    ];

    for (title, description, starting_bid, img) in listings {
        let product = products::ActiveModel {
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            starting_bid: Set(starting_bid),
            img: Set(img.to_string()),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(orm)
        .await?;
        UserProducts::insert(user_products::ActiveModel {
            user_id: Set(owner_id),
            product_id: Set(product.id),
        })
        .exec_without_returning(orm)
        .await?;
    }

    println!("Seeded {} products", listings.len());
    Ok(())
}
