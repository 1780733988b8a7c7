use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "muster={level},server={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    let mut tasks = tokio::task::JoinSet::new();

    if let Some(server) = settings.server {
        tasks.spawn(async move {
            tracing::info!("Starting attendance server...");
            if let Err(err) = serve(server).await {
                tracing::error!("server task failed: {err}");
            }
        });
    }

    // First task to exit tears the rest down.
    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn serve(
    config: settings::Server,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let db = sea_orm::Database::connect(config.database.url()).await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let bind = config.bind.as_deref().unwrap_or("127.0.0.1");
    let listener = tokio::net::TcpListener::bind((bind, config.port)).await?;
    server::run_with_listener(engine, db, listener).await?;

    Ok(())
}
