pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;
pub mod schema;

use std::path::PathBuf;

use actix_files::Files;
use actix_web::{error, middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub use db::{create_pool, DbPool};

use errors::AppError;
use handlers::health::FrontEnd;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("no connection for migrations: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("migrations failed: {0}")]
    Apply(String),
}

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<usize, MigrationError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| MigrationError::Apply(e.to_string()))?;
    Ok(applied.len())
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("JSON inválido: {err}")).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Identificador inválido en la ruta: {err}")).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Parámetros de consulta inválidos: {err}")).into()
}

async fn not_found() -> HttpResponse {
    envelope::failure(actix_web::http::StatusCode::NOT_FOUND, "Ruta no encontrada.")
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    static_dir: PathBuf,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let front = FrontEnd { dir: static_dir };

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(front.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(openapi::swagger_ui())
            .route("/", web::get().to(handlers::health::index))
            .service(Files::new("/static", &front.dir))
            .default_service(web::to(not_found))
    })
    .bind((host.to_string(), port))?
    .run())
}
