use std::sync::Arc;

use sabqcha_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sabqcha_observability::init();

    let config = ApiConfig::from_env();

    // The pool (when built with `postgres`) is created here, owned by the
    // entry point, and passed down into the services — never global.
    #[cfg(feature = "postgres")]
    let services = {
        let database_url = config
            .database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("SABQCHA_DATABASE_URL must be set"))?;
        let pool = sqlx::PgPool::connect(&database_url).await?;
        sabqcha_infra::ensure_schema(&pool).await?;
        app::services::build_postgres_services(&config, pool)
    };
    #[cfg(not(feature = "postgres"))]
    let services = app::services::build_services(&config);

    let router = app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}
