use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use model::entities::{product, restaurant, user};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Database, EntityTrait, PaginatorTrait, Set};
use tracing::{debug, info};

/// Username of the identity that unauthenticated orders fall back to.
const DEFAULT_USERNAME: &str = "guest";

/// Password hash marker that can never verify, so the default identity
/// cannot be logged into.
const UNUSABLE_PASSWORD: &str = "!";

pub async fn seed_database(database_url: &str) -> Result<()> {
    info!("Seeding database");
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url).await?;
    Migrator::up(&db, None).await?;

    // The default identity must exist before the first unauthenticated
    // order comes in.
    let guests = user::Entity::find().count(&db).await?;
    if guests == 0 {
        let guest = user::ActiveModel {
            username: Set(DEFAULT_USERNAME.to_string()),
            password_hash: Set(UNUSABLE_PASSWORD.to_string()),
            phone: Set(None),
            email: Set(None),
            name: Set(Some("Guest".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        info!(
            "Created default identity '{}' with ID: {}",
            guest.username, guest.id
        );
    } else {
        info!("Users already present, skipping default identity");
    }

    let existing = restaurant::Entity::find().count(&db).await?;
    if existing > 0 {
        info!("Catalog already seeded ({} restaurants), nothing to do", existing);
        return Ok(());
    }

    let pizzeria = restaurant::ActiveModel {
        name: Set("Luigi's Pizzeria".to_string()),
        description: Set(Some("Wood-fired pizza since 1987".to_string())),
        logo_url: Set(Some("https://cdn.quickbite.example/luigis.png".to_string())),
        address: Set(Some("12 Oven Street".to_string())),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let sushi_bar = restaurant::ActiveModel {
        name: Set("Sakura Sushi".to_string()),
        description: Set(Some("Fresh fish, daily".to_string())),
        logo_url: Set(None),
        address: Set(Some("3 Harbor Road".to_string())),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    let menu = [
        ("Margherita", 850, Some("Tomato, mozzarella, basil"), pizzeria.id),
        ("Diavola", 975, Some("Spicy salami"), pizzeria.id),
        ("Quattro Formaggi", 1050, None, pizzeria.id),
        ("Salmon Nigiri", 1200, Some("Two pieces"), sushi_bar.id),
        ("Tuna Roll", 950, None, sushi_bar.id),
    ];
    for (name, price_cents, description, restaurant_id) in menu {
        product::ActiveModel {
            name: Set(name.to_string()),
            price: Set(Decimal::new(price_cents, 2)),
            description: Set(description.map(str::to_string)),
            image_url: Set(None),
            restaurant_id: Set(restaurant_id),
            ..Default::default()
        }
        .insert(&db)
        .await?;
    }

    info!("Seeded 2 restaurants and {} products", menu.len());
    Ok(())
}
