use std::path::PathBuf;

use actix_files::NamedFile;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use diesel::prelude::*;

use crate::db::RequestConnection;
use crate::domain::errors::{DbFault, DomainError, FaultContext};
use crate::envelope;
use crate::errors::AppError;

use super::blocking;

/// Where the bundled front-end lives.
#[derive(Debug, Clone)]
pub struct FrontEnd {
    pub dir: PathBuf,
}

/// GET /
pub async fn index(front: web::Data<FrontEnd>) -> Result<NamedFile, AppError> {
    let path = front.dir.join("index.html");
    NamedFile::open_async(&path).await.map_err(|e| {
        log::warn!("Cannot serve {}: {}", path.display(), e);
        AppError::NotFound("No se encontró la página principal.".to_string())
    })
}

/// GET /test-db
///
/// Checks out a connection and runs a trivial query.
#[utoipa::path(
    get,
    path = "/test-db",
    responses(
        (status = 200, description = "The database answered"),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "salud"
)]
pub async fn test_db(db: RequestConnection) -> Result<HttpResponse, AppError> {
    blocking(db, |conn| {
        diesel::sql_query("SELECT 1").execute(conn).map_err(|e| {
            let fault = DbFault::from(e);
            log::error!("Database check failed: {}", fault);
            DomainError::from_fault(fault, FaultContext::MEDICATION)
        })
    })
    .await?;

    Ok(envelope::done(
        StatusCode::OK,
        "Conexión exitosa con la base de datos.",
    ))
}
