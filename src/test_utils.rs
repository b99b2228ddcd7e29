#[cfg(test)]
pub mod test_utils {
    use crate::config::AppConfig;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use migration::{Migrator, MigratorTrait};
    use model::entities::{product, restaurant, user};
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute_unprepared("PRAGMA foreign_keys = ON;")
            .await
            .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing. The default identity the order routes
    /// fall back to is created here.
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;

        let guest = user::ActiveModel {
            username: Set("guest".to_string()),
            password_hash: Set("!".to_string()),
            phone: Set(None),
            email: Set(None),
            name: Set(Some("Guest".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("Failed to create default identity");

        let config = AppConfig {
            token_secret: "test-secret".to_string(),
            token_ttl_secs: 3600,
            default_user_id: guest.id,
        };

        AppState { db, config }
    }

    /// A small catalog shared by the order and catalog tests.
    pub struct TestCatalog {
        pub pizzeria: restaurant::Model,
        pub sushi_bar: restaurant::Model,
        pub margherita: product::Model,
        pub diavola: product::Model,
        pub nigiri: product::Model,
    }

    /// Seed two restaurants with products. Prices are binary-exact so the
    /// float wire representation round-trips.
    pub async fn seed_catalog(db: &DatabaseConnection) -> TestCatalog {
        let pizzeria = restaurant::ActiveModel {
            name: Set("Luigi's Pizzeria".to_string()),
            description: Set(Some("Wood-fired pizza".to_string())),
            logo_url: Set(Some("https://cdn.example.com/luigis.png".to_string())),
            address: Set(Some("12 Oven Street".to_string())),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create restaurant");

        let sushi_bar = restaurant::ActiveModel {
            name: Set("Sakura Sushi".to_string()),
            description: Set(None),
            logo_url: Set(None),
            address: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create restaurant");

        let margherita = product::ActiveModel {
            name: Set("Margherita".to_string()),
            price: Set(Decimal::new(850, 2)), // 8.50
            description: Set(Some("Tomato, mozzarella, basil".to_string())),
            image_url: Set(Some("https://cdn.example.com/margherita.jpg".to_string())),
            restaurant_id: Set(pizzeria.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create product");

        let diavola = product::ActiveModel {
            name: Set("Diavola".to_string()),
            price: Set(Decimal::new(975, 2)), // 9.75
            description: Set(None),
            image_url: Set(None),
            restaurant_id: Set(pizzeria.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create product");

        let nigiri = product::ActiveModel {
            name: Set("Salmon Nigiri".to_string()),
            price: Set(Decimal::new(1200, 2)), // 12.00
            description: Set(None),
            image_url: Set(None),
            restaurant_id: Set(sushi_bar.id),
            ..Default::default()
        }
        .insert(db)
        .await
        .expect("Failed to create product");

        TestCatalog {
            pizzeria,
            sushi_bar,
            margherita,
            diavola,
            nigiri,
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // captured by the test harness
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app plus its state for tests that reach into the
    /// database directly.
    pub async fn setup_test_app_with_state() -> (Router, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let (router, _) = setup_test_app_with_state().await;
        router
    }
}
