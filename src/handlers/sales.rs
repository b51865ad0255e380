use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::SaleService;
use crate::db::RequestConnection;
use crate::domain::errors::{DbFault, DomainError, FaultContext};
use crate::domain::sale::{
    NewSale, SaleDetail, SaleHeader, SaleLineDraft, SaleLineView, SaleReceipt, SaleSummary,
};
use crate::envelope;
use crate::errors::AppError;
use crate::infrastructure::{sale_repo, DieselSaleLedger};

use super::blocking;
use super::input::{opt_decimal, opt_i32, Fields};

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SaleLineRequest {
    #[serde(default, deserialize_with = "opt_i32")]
    pub id_medicamento: Option<i32>,
    #[serde(default, deserialize_with = "opt_i32")]
    pub cantidad: Option<i32>,
    #[serde(default, deserialize_with = "opt_decimal")]
    #[schema(value_type = Option<String>)]
    pub precio_unitario_venta: Option<BigDecimal>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSaleRequest {
    #[serde(default, alias = "p_id_cliente", deserialize_with = "opt_i32")]
    pub id_cliente: Option<i32>,
    #[serde(default, alias = "p_id_empleado", deserialize_with = "opt_i32")]
    pub id_empleado: Option<i32>,
    #[serde(default, alias = "p_total_venta", deserialize_with = "opt_decimal")]
    #[schema(value_type = Option<String>)]
    pub total_venta: Option<BigDecimal>,
    /// Line items, applied in order.
    #[serde(default)]
    pub detalles: Option<Vec<SaleLineRequest>>,
}

impl CreateSaleRequest {
    /// Header fields must all be present; lines are checked later, one by
    /// one, inside the sale transaction.
    pub fn into_new_sale(self) -> Result<NewSale, DomainError> {
        let mut f = Fields::default();
        let id_cliente = f.require("id_cliente", self.id_cliente);
        let id_empleado = f.require("id_empleado", self.id_empleado);
        let total_venta = f.require("total_venta", self.total_venta);
        let header = f.finish(move || {
            Some(SaleHeader {
                id_cliente: id_cliente?,
                id_empleado: id_empleado?,
                total_venta: total_venta?,
            })
        })?;

        let lines: Vec<SaleLineDraft> = self
            .detalles
            .unwrap_or_default()
            .into_iter()
            .map(|l| SaleLineDraft {
                id_medicamento: l.id_medicamento,
                cantidad: l.cantidad,
                precio_unitario_venta: l.precio_unitario_venta,
            })
            .collect();
        if lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "El campo 'detalles' debe ser una lista no vacía.".to_string(),
            ));
        }

        Ok(NewSale { header, lines })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleCreatedResponse {
    pub id_venta: i32,
    pub items_procesados: usize,
}

impl From<SaleReceipt> for SaleCreatedResponse {
    fn from(r: SaleReceipt) -> Self {
        Self {
            id_venta: r.id_venta,
            items_procesados: r.items_procesados,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleSummaryResponse {
    pub id_venta: i32,
    pub fecha_venta: DateTime<Utc>,
    pub cliente: String,
    pub empleado: String,
    pub total_venta: String,
}

impl From<SaleSummary> for SaleSummaryResponse {
    fn from(s: SaleSummary) -> Self {
        Self {
            id_venta: s.id_venta,
            fecha_venta: s.fecha_venta,
            cliente: s.cliente,
            empleado: s.empleado,
            total_venta: s.total_venta.to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleLineResponse {
    pub id_detalle: i32,
    pub id_medicamento: i32,
    pub medicamento: String,
    pub cantidad: i32,
    pub precio_unitario_venta: String,
    pub subtotal: Option<String>,
}

impl From<SaleLineView> for SaleLineResponse {
    fn from(l: SaleLineView) -> Self {
        Self {
            id_detalle: l.id_detalle,
            id_medicamento: l.id_medicamento,
            medicamento: l.medicamento,
            cantidad: l.cantidad,
            precio_unitario_venta: l.precio_unitario_venta.to_string(),
            subtotal: l.subtotal.map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleDetailResponse {
    pub id_venta: i32,
    pub fecha_venta: DateTime<Utc>,
    pub cliente: String,
    pub cliente_dni: Option<String>,
    pub empleado: String,
    pub total_venta: String,
    pub detalles: Vec<SaleLineResponse>,
}

impl From<SaleDetail> for SaleDetailResponse {
    fn from(d: SaleDetail) -> Self {
        Self {
            id_venta: d.id_venta,
            fecha_venta: d.fecha_venta,
            cliente: d.cliente,
            cliente_dni: d.cliente_dni,
            empleado: d.empleado,
            total_venta: d.total_venta.to_string(),
            detalles: d.detalles.into_iter().map(Into::into).collect(),
        }
    }
}

fn read_fault(fault: DbFault) -> DomainError {
    log::error!("Sale query failed: {}", fault);
    DomainError::from_fault(fault, FaultContext::SALE)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/ventas
///
/// Registers the header through `p_registrar_venta` and inserts every line in
/// one explicit transaction. Any failure rolls the whole sale back.
#[utoipa::path(
    post,
    path = "/api/ventas",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale registered; receipt in `datos`", body = SaleCreatedResponse),
        (status = 400, description = "Missing fields, invalid line or unknown reference"),
        (status = 409, description = "Insufficient stock"),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "ventas"
)]
pub async fn create_sale(
    db: RequestConnection,
    body: web::Json<CreateSaleRequest>,
) -> Result<HttpResponse, AppError> {
    let sale = body.into_inner().into_new_sale()?;

    let receipt = blocking(db, move |conn| {
        SaleService::new(DieselSaleLedger::new(conn)).register(sale)
    })
    .await?;

    Ok(envelope::created(SaleCreatedResponse::from(receipt)))
}

/// GET /api/ventas
///
/// Every sale, newest first.
#[utoipa::path(
    get,
    path = "/api/ventas",
    responses((status = 200, description = "Sales in `datos`", body = [SaleSummaryResponse])),
    tag = "ventas"
)]
pub async fn list_sales(db: RequestConnection) -> Result<HttpResponse, AppError> {
    let rows = blocking(db, |conn| sale_repo::list_sales(conn).map_err(read_fault)).await?;
    let datos: Vec<SaleSummaryResponse> = rows.into_iter().map(Into::into).collect();
    Ok(envelope::ok(datos))
}

/// GET /api/ventas/{id}
#[utoipa::path(
    get,
    path = "/api/ventas/{id}",
    params(("id" = i32, Path, description = "Sale id")),
    responses(
        (status = 200, description = "Sale with its lines in `datos`", body = SaleDetailResponse),
        (status = 404, description = "Sale not found"),
    ),
    tag = "ventas"
)]
pub async fn get_sale(db: RequestConnection, path: web::Path<i32>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = blocking(db, move |conn| sale_repo::find_sale(conn, id).map_err(read_fault)).await?;

    match found {
        Some(detail) => Ok(envelope::ok(SaleDetailResponse::from(detail))),
        None => Err(AppError::NotFound(format!("Venta con ID {id} no encontrada."))),
    }
}
