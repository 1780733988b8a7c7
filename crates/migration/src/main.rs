use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() {
    let command = std::env::args().nth(1).unwrap_or_else(|| String::from("up"));

    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| String::from("sqlite:./muster.db?mode=rwc"));

    if let Err(err) = run(&command, &url).await {
        eprintln!("migration {command} failed: {err}");
        std::process::exit(1);
    }
}

async fn run(command: &str, url: &str) -> Result<(), sea_orm::DbErr> {
    let db = sea_orm::Database::connect(url).await?;

    match command {
        "up" => Migrator::up(&db, None).await,
        "down" => Migrator::down(&db, None).await,
        "fresh" => Migrator::fresh(&db).await,
        "status" => Migrator::status(&db).await,
        other => {
            eprintln!("unknown command {other:?}; expected up, down, fresh or status");
            std::process::exit(2);
        }
    }
}
