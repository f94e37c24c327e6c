use rand::rngs::StdRng;
use rand::SeedableRng;
use shop_service::config::Config;
use shop_service::domain::product::seed::seed_if_empty;
use shop_service::domain::product::seed::DEFAULT_PRODUCT_COUNT;
use shop_service::outbound::repositories::PostgresProductRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Populates an empty catalog with demo products.
///
/// Usage: `seed-catalog [COUNT]`
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let count = match std::env::args().nth(1) {
        Some(raw) => raw.parse::<usize>()?,
        None => DEFAULT_PRODUCT_COUNT,
    };

    let config = Config::load()?;

    let pg_pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    let repository = PostgresProductRepository::new(pg_pool);
    let mut rng = StdRng::from_entropy();

    let written = seed_if_empty(&repository, &mut rng, count).await?;
    tracing::info!(products = written, "Seeding finished");

    Ok(())
}
