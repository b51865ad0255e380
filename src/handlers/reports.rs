use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::RequestConnection;
use crate::domain::errors::{DbFault, DomainError};
use crate::domain::report::{
    shape_rows, ParamDefault, ParamKind, ParamSpec, ReportSpec, CATALOG,
};
use crate::envelope;
use crate::errors::AppError;
use crate::infrastructure::report_repo;

use super::blocking;

const REPORT_FAILED: &str = "Ocurrió un error al obtener los datos.";

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportParamInfo {
    pub nombre: String,
    /// `entero` or `fecha`
    pub tipo: String,
    pub requerido: bool,
    /// `"anio_actual"` for the current year
    pub por_defecto: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportInfo {
    pub slug: String,
    pub procedimiento: String,
    pub parametros: Vec<ReportParamInfo>,
}

impl From<&ParamSpec> for ReportParamInfo {
    fn from(p: &ParamSpec) -> Self {
        Self {
            nombre: p.name.to_string(),
            tipo: match p.kind {
                ParamKind::Integer => "entero",
                ParamKind::Date => "fecha",
            }
            .to_string(),
            requerido: p.default == ParamDefault::Required,
            por_defecto: match p.default {
                ParamDefault::Required => None,
                ParamDefault::Integer(v) => Some(v.to_string()),
                ParamDefault::CurrentYear => Some("anio_actual".to_string()),
            },
        }
    }
}

impl From<&ReportSpec> for ReportInfo {
    fn from(spec: &ReportSpec) -> Self {
        Self {
            slug: spec.slug.to_string(),
            procedimiento: spec.procedure.to_string(),
            parametros: spec.params.iter().map(Into::into).collect(),
        }
    }
}

/// Reports surface one generic message; the driver error only goes to the log.
fn report_fault(procedure: &str, fault: DbFault) -> DomainError {
    log::error!("Report {} failed: {}", procedure, fault);
    match fault {
        DbFault::Unavailable(_) => DomainError::unavailable(),
        _ => DomainError::Database(REPORT_FAILED.to_string()),
    }
}

/// GET /api/reportes
#[utoipa::path(
    get,
    path = "/api/reportes",
    responses((status = 200, description = "Report catalog in `datos`", body = [ReportInfo])),
    tag = "reportes"
)]
pub async fn list_reports() -> HttpResponse {
    let datos: Vec<ReportInfo> = CATALOG.iter().map(Into::into).collect();
    envelope::ok(datos)
}

/// GET /api/reportes/{slug}
///
/// Runs the report's procedure and returns its cursor rows, keyed by
/// lower-cased column name.
#[utoipa::path(
    get,
    path = "/api/reportes/{slug}",
    params(("slug" = String, Path, description = "Report name, see GET /api/reportes")),
    responses(
        (status = 200, description = "Rows in `datos` (an object or null for resumen-general)"),
        (status = 400, description = "Missing or malformed query parameter"),
        (status = 404, description = "Unknown report"),
        (status = 500, description = "The report procedure failed"),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "reportes"
)]
pub async fn run_report(
    db: RequestConnection,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let slug = path.into_inner();
    let spec = ReportSpec::find(&slug)
        .ok_or_else(|| AppError::NotFound(format!("Reporte '{slug}' no encontrado.")))?;
    let params = spec.bind_params(&query.into_inner(), chrono::Local::now().date_naive())?;

    let rows = blocking(db, move |conn| {
        report_repo::call_report(conn, spec.procedure, &params)
            .map_err(|fault| report_fault(spec.procedure, fault))
    })
    .await?;

    log::debug!("Report {} returned {} row(s)", spec.slug, rows.len());
    Ok(envelope::ok(shape_rows(rows, spec.shape)))
}
