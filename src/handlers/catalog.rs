use actix_web::HttpResponse;

use crate::db::RequestConnection;
use crate::domain::errors::{DbFault, DomainError, FaultContext};
use crate::envelope;
use crate::errors::AppError;
use crate::infrastructure::catalog_repo;
use crate::infrastructure::models::{CategoryRow, ClientRow, EmployeeRow, SupplierRow};

use super::blocking;

fn listing_fault(fault: DbFault) -> DomainError {
    log::error!("Reference listing failed: {}", fault);
    DomainError::from_fault(fault, FaultContext::MEDICATION)
}

/// GET /api/categorias
#[utoipa::path(
    get,
    path = "/api/categorias",
    responses((status = 200, description = "Categories in `datos`", body = [CategoryRow])),
    tag = "catalogo"
)]
pub async fn list_categories(db: RequestConnection) -> Result<HttpResponse, AppError> {
    let rows = blocking(db, |conn| catalog_repo::list_categories(conn).map_err(listing_fault)).await?;
    Ok(envelope::ok(rows))
}

/// GET /api/proveedores
#[utoipa::path(
    get,
    path = "/api/proveedores",
    responses((status = 200, description = "Suppliers in `datos`", body = [SupplierRow])),
    tag = "catalogo"
)]
pub async fn list_suppliers(db: RequestConnection) -> Result<HttpResponse, AppError> {
    let rows = blocking(db, |conn| catalog_repo::list_suppliers(conn).map_err(listing_fault)).await?;
    Ok(envelope::ok(rows))
}

/// GET /api/empleados
#[utoipa::path(
    get,
    path = "/api/empleados",
    responses((status = 200, description = "Employees in `datos`", body = [EmployeeRow])),
    tag = "catalogo"
)]
pub async fn list_employees(db: RequestConnection) -> Result<HttpResponse, AppError> {
    let rows = blocking(db, |conn| catalog_repo::list_employees(conn).map_err(listing_fault)).await?;
    Ok(envelope::ok(rows))
}

/// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    responses((status = 200, description = "Clients in `datos`", body = [ClientRow])),
    tag = "catalogo"
)]
pub async fn list_clients(db: RequestConnection) -> Result<HttpResponse, AppError> {
    let rows = blocking(db, |conn| catalog_repo::list_clients(conn).map_err(listing_fault)).await?;
    Ok(envelope::ok(rows))
}
