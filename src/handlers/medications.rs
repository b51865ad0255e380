use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::RequestConnection;
use crate::domain::errors::{DbFault, DomainError, FaultContext};
use crate::domain::medication::{
    MedicationDraft, MedicationStatus, MedicationView, PriceChange, StockIncrement,
};
use crate::envelope;
use crate::errors::AppError;
use crate::infrastructure::{catalog_repo, procedures};

use super::blocking;
use super::input::{opt_date, opt_decimal, opt_i32, opt_text, Fields};

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Body of `POST /api/medicamentos` and `PUT /api/medicamentos/{id}`.
///
/// Keys may also carry the procedure's `p_` prefix.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MedicationRequest {
    #[serde(default, alias = "p_nombre", deserialize_with = "opt_text")]
    pub nombre: Option<String>,
    #[serde(default, alias = "p_id_categoria", deserialize_with = "opt_i32")]
    pub id_categoria: Option<i32>,
    #[serde(default, alias = "p_id_proveedor", deserialize_with = "opt_i32")]
    pub id_proveedor: Option<i32>,
    #[serde(default, alias = "p_stock", deserialize_with = "opt_i32")]
    pub stock: Option<i32>,
    /// Decimal, as a number or a string such as "4.50"
    #[serde(default, alias = "p_precio_compra", deserialize_with = "opt_decimal")]
    #[schema(value_type = Option<String>)]
    pub precio_compra: Option<BigDecimal>,
    #[serde(default, alias = "p_precio_venta", deserialize_with = "opt_decimal")]
    #[schema(value_type = Option<String>)]
    pub precio_venta: Option<BigDecimal>,
    /// AAAA-MM-DD
    #[serde(default, alias = "p_fecha_vencimiento", deserialize_with = "opt_date")]
    pub fecha_vencimiento: Option<NaiveDate>,
    #[serde(default, alias = "p_lote", deserialize_with = "opt_text")]
    pub lote: Option<String>,
    #[serde(default, alias = "p_ubicacion", deserialize_with = "opt_text")]
    pub ubicacion: Option<String>,
    #[serde(default, alias = "p_descripcion", deserialize_with = "opt_text")]
    pub descripcion: Option<String>,
}

impl MedicationRequest {
    pub fn into_draft(self) -> Result<MedicationDraft, DomainError> {
        let mut f = Fields::default();
        let nombre = f.require("nombre", self.nombre);
        let id_categoria = f.require("id_categoria", self.id_categoria);
        let stock = f.require("stock", self.stock);
        let precio_compra = f.require("precio_compra", self.precio_compra);
        let precio_venta = f.require("precio_venta", self.precio_venta);
        let fecha_vencimiento = f.require("fecha_vencimiento", self.fecha_vencimiento);
        let lote = f.require("lote", self.lote);

        let (id_proveedor, ubicacion, descripcion) = (self.id_proveedor, self.ubicacion, self.descripcion);
        f.finish(move || {
            Some(MedicationDraft {
                nombre: nombre?,
                id_categoria: id_categoria?,
                id_proveedor,
                stock: stock?,
                precio_compra: precio_compra?,
                precio_venta: precio_venta?,
                fecha_vencimiento: fecha_vencimiento?,
                lote: lote?,
                ubicacion,
                descripcion,
            })
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PriceRequest {
    #[serde(
        default,
        alias = "p_nuevo_precio_compra",
        alias = "precio_compra",
        deserialize_with = "opt_decimal"
    )]
    #[schema(value_type = Option<String>)]
    pub nuevo_precio_compra: Option<BigDecimal>,
    #[serde(
        default,
        alias = "p_nuevo_precio_venta",
        alias = "precio_venta",
        deserialize_with = "opt_decimal"
    )]
    #[schema(value_type = Option<String>)]
    pub nuevo_precio_venta: Option<BigDecimal>,
}

impl PriceRequest {
    pub fn into_change(self) -> Result<PriceChange, DomainError> {
        let mut f = Fields::default();
        let compra = f.require("nuevo_precio_compra", self.nuevo_precio_compra);
        let venta = f.require("nuevo_precio_venta", self.nuevo_precio_venta);
        f.finish(move || {
            Some(PriceChange {
                precio_compra: compra?,
                precio_venta: venta?,
            })
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StockRequest {
    #[serde(
        default,
        alias = "p_cantidad",
        alias = "cantidad",
        deserialize_with = "opt_i32"
    )]
    pub cantidad_agregada: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusRequest {
    #[serde(default, alias = "p_estado", deserialize_with = "opt_text")]
    pub estado: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMedicationsParams {
    /// Include logically deleted medications. Defaults to false.
    #[serde(default)]
    pub incluir_inactivos: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MedicationResponse {
    pub id_medicamento: i32,
    pub nombre: String,
    pub id_categoria: i32,
    pub categoria: String,
    pub id_proveedor: Option<i32>,
    pub proveedor: Option<String>,
    pub stock: i32,
    pub precio_compra: String,
    pub precio_venta: String,
    pub fecha_vencimiento: NaiveDate,
    pub lote: String,
    pub ubicacion: Option<String>,
    pub descripcion: Option<String>,
    pub estado: String,
}

impl From<MedicationView> for MedicationResponse {
    fn from(m: MedicationView) -> Self {
        Self {
            id_medicamento: m.id_medicamento,
            nombre: m.nombre,
            id_categoria: m.id_categoria,
            categoria: m.categoria,
            id_proveedor: m.id_proveedor,
            proveedor: m.proveedor,
            stock: m.stock,
            precio_compra: m.precio_compra.to_string(),
            precio_venta: m.precio_venta.to_string(),
            fecha_vencimiento: m.fecha_vencimiento,
            lote: m.lote,
            ubicacion: m.ubicacion,
            descripcion: m.descripcion,
            estado: m.estado,
        }
    }
}

fn medication_fault(fault: DbFault) -> DomainError {
    match &fault {
        DbFault::Procedure { .. } | DbFault::ForeignKey(_) | DbFault::Constraint(_) => {
            log::warn!("Medication write rejected: {}", fault)
        }
        _ => log::error!("Medication write failed: {}", fault),
    }
    DomainError::from_fault(fault, FaultContext::MEDICATION)
}

fn read_fault(fault: DbFault) -> DomainError {
    log::error!("Medication query failed: {}", fault);
    DomainError::from_fault(fault, FaultContext::MEDICATION)
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/medicamentos
///
/// Active medications with their category and supplier names.
#[utoipa::path(
    get,
    path = "/api/medicamentos",
    params(ListMedicationsParams),
    responses(
        (status = 200, description = "Medication list in `datos`", body = [MedicationResponse]),
        (status = 503, description = "Database unavailable"),
    ),
    tag = "medicamentos"
)]
pub async fn list_medications(
    db: RequestConnection,
    query: web::Query<ListMedicationsParams>,
) -> Result<HttpResponse, AppError> {
    let include_inactive = query.into_inner().incluir_inactivos;
    let rows = blocking(db, move |conn| {
        catalog_repo::list_medications(conn, include_inactive).map_err(read_fault)
    })
    .await?;

    let datos: Vec<MedicationResponse> = rows.into_iter().map(Into::into).collect();
    Ok(envelope::ok(datos))
}

/// GET /api/medicamentos/{id}
#[utoipa::path(
    get,
    path = "/api/medicamentos/{id}",
    params(("id" = i32, Path, description = "Medication id")),
    responses(
        (status = 200, description = "Medication in `datos`", body = MedicationResponse),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn get_medication(
    db: RequestConnection,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let found = blocking(db, move |conn| {
        catalog_repo::find_medication(conn, id).map_err(read_fault)
    })
    .await?;

    match found {
        Some(m) => Ok(envelope::ok(MedicationResponse::from(m))),
        None => Err(AppError::NotFound(format!(
            "Medicamento con ID {id} no encontrado."
        ))),
    }
}

/// POST /api/medicamentos
///
/// Registers a medication through `p_registrar_medicamento`, which enforces
/// the expiry and price rules.
#[utoipa::path(
    post,
    path = "/api/medicamentos",
    request_body = MedicationRequest,
    responses(
        (status = 201, description = "Medication registered"),
        (status = 400, description = "Missing fields or rule violation"),
    ),
    tag = "medicamentos"
)]
pub async fn create_medication(
    db: RequestConnection,
    body: web::Json<MedicationRequest>,
) -> Result<HttpResponse, AppError> {
    let draft = body.into_inner().into_draft()?;
    let nombre = draft.nombre.clone();

    blocking(db, move |conn| {
        procedures::register_medication(conn, &draft).map_err(medication_fault)
    })
    .await?;

    log::info!("Medication '{}' registered", nombre);
    Ok(envelope::done(
        StatusCode::CREATED,
        "Medicamento registrado exitosamente.",
    ))
}

/// PUT /api/medicamentos/{id}
///
/// Full edit through `p_editar_medicamento`.
#[utoipa::path(
    put,
    path = "/api/medicamentos/{id}",
    params(("id" = i32, Path, description = "Medication id")),
    request_body = MedicationRequest,
    responses(
        (status = 200, description = "Medication updated"),
        (status = 400, description = "Missing fields or rule violation"),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn update_medication(
    db: RequestConnection,
    path: web::Path<i32>,
    body: web::Json<MedicationRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = body.into_inner().into_draft()?;

    blocking(db, move |conn| {
        procedures::edit_medication(conn, id, &draft).map_err(medication_fault)
    })
    .await?;

    log::info!("Medication {} updated", id);
    Ok(envelope::done(
        StatusCode::OK,
        format!("Medicamento con ID {id} actualizado correctamente."),
    ))
}

/// PUT /api/medicamentos/{id}/precio
#[utoipa::path(
    put,
    path = "/api/medicamentos/{id}/precio",
    params(("id" = i32, Path, description = "Medication id")),
    request_body = PriceRequest,
    responses(
        (status = 200, description = "Prices updated"),
        (status = 400, description = "Missing prices or sale price not above purchase price"),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn update_price(
    db: RequestConnection,
    path: web::Path<i32>,
    body: web::Json<PriceRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let change = body.into_inner().into_change()?;

    blocking(db, move |conn| {
        procedures::edit_price(conn, id, &change).map_err(medication_fault)
    })
    .await?;

    log::info!("Prices of medication {} updated", id);
    Ok(envelope::done(
        StatusCode::OK,
        format!("Precio del medicamento con ID {id} actualizado correctamente."),
    ))
}

/// PATCH /api/medicamentos/{id}/stock
#[utoipa::path(
    patch,
    path = "/api/medicamentos/{id}/stock",
    params(("id" = i32, Path, description = "Medication id")),
    request_body = StockRequest,
    responses(
        (status = 200, description = "Stock increased"),
        (status = 400, description = "Missing or non-positive amount"),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn add_stock(
    db: RequestConnection,
    path: web::Path<i32>,
    body: web::Json<StockRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let mut f = Fields::default();
    let cantidad = f.require("cantidad_agregada", body.into_inner().cantidad_agregada);
    let increment = StockIncrement::new(f.finish(move || cantidad)?)?;

    blocking(db, move |conn| {
        procedures::add_stock(conn, id, increment).map_err(medication_fault)
    })
    .await?;

    log::info!("Stock of medication {} increased by {}", id, increment.cantidad);
    Ok(envelope::done(
        StatusCode::OK,
        format!(
            "Se agregaron {} unidades al medicamento con ID {id}.",
            increment.cantidad
        ),
    ))
}

/// PATCH /api/medicamentos/{id}/estado
#[utoipa::path(
    patch,
    path = "/api/medicamentos/{id}/estado",
    params(("id" = i32, Path, description = "Medication id")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Missing or unknown status"),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn change_status(
    db: RequestConnection,
    path: web::Path<i32>,
    body: web::Json<StatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let mut f = Fields::default();
    let raw = f.require("estado", body.into_inner().estado);
    let status = MedicationStatus::parse(&f.finish(move || raw)?)?;

    blocking(db, move |conn| {
        procedures::change_status(conn, id, status).map_err(medication_fault)
    })
    .await?;

    log::info!("Medication {} set to {}", id, status.as_str());
    Ok(envelope::done(
        StatusCode::OK,
        format!(
            "Estado del medicamento con ID {id} cambiado a {}.",
            status.as_str()
        ),
    ))
}

/// DELETE /api/medicamentos/{id}
///
/// Logical deletion: the row stays, with `estado = 'Inactivo'`.
#[utoipa::path(
    delete,
    path = "/api/medicamentos/{id}",
    params(("id" = i32, Path, description = "Medication id")),
    responses(
        (status = 200, description = "Medication marked inactive"),
        (status = 404, description = "Medication not found"),
    ),
    tag = "medicamentos"
)]
pub async fn delete_medication(
    db: RequestConnection,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    blocking(db, move |conn| {
        procedures::change_status(conn, id, MedicationStatus::Inactive).map_err(medication_fault)
    })
    .await?;

    log::info!("Medication {} logically deleted", id);
    Ok(envelope::done(
        StatusCode::OK,
        format!("Medicamento con ID {id} eliminado (marcado como Inactivo)."),
    ))
}
