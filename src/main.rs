use std::io;

use dotenvy::dotenv;
use pharmacy_service::config::Settings;
use pharmacy_service::{build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = create_pool(&settings.db);
    if settings.run_migrations {
        match run_migrations(&pool) {
            Ok(applied) => log::info!("Applied {} pending migration(s)", applied),
            // The service still starts; requests answer 503 until the database is back.
            Err(e) => log::warn!("Skipping migrations: {}", e),
        }
    }

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(pool, settings.static_dir, &settings.host, settings.port)?.await
}
