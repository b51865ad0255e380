//! Calls into `pkg_gestion_farmacia`.
//!
//! Each procedure takes its own parameter struct and is invoked with named
//! notation, so argument order in Rust cannot drift from the procedure
//! signature.

use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Date, Integer, Nullable, Numeric, Text};

use crate::domain::errors::DbFault;
use crate::domain::medication::{MedicationDraft, MedicationStatus, PriceChange, StockIncrement};
use crate::domain::sale::SaleHeader;

const REGISTER_MEDICATION: &str = "CALL pkg_gestion_farmacia.p_registrar_medicamento(\
    p_nombre => $1, p_id_categoria => $2, p_id_proveedor => $3, p_stock => $4, \
    p_precio_compra => $5, p_precio_venta => $6, p_fecha_vencimiento => $7, \
    p_lote => $8, p_ubicacion => $9, p_descripcion => $10)";

const EDIT_MEDICATION: &str = "CALL pkg_gestion_farmacia.p_editar_medicamento(\
    p_id_medicamento => $1, p_nombre => $2, p_id_categoria => $3, p_id_proveedor => $4, \
    p_stock => $5, p_precio_compra => $6, p_precio_venta => $7, p_fecha_vencimiento => $8, \
    p_lote => $9, p_ubicacion => $10, p_descripcion => $11)";

const EDIT_PRICE: &str = "CALL pkg_gestion_farmacia.p_editar_precio(\
    p_id_medicamento => $1, p_nuevo_precio_compra => $2, p_nuevo_precio_venta => $3)";

const ADD_STOCK: &str =
    "CALL pkg_gestion_farmacia.p_agregar_stock(p_id_medicamento => $1, p_cantidad => $2)";

const CHANGE_STATUS: &str =
    "CALL pkg_gestion_farmacia.p_cambiar_estado(p_id_medicamento => $1, p_estado => $2)";

const REGISTER_SALE: &str = "CALL pkg_gestion_farmacia.p_registrar_venta(\
    p_id_cliente => $1, p_id_empleado => $2, p_total_venta => $3, p_id_venta_generada => NULL)";

#[derive(QueryableByName)]
struct GeneratedSaleId {
    #[diesel(sql_type = Integer)]
    p_id_venta_generada: i32,
}

pub fn register_medication(conn: &mut PgConnection, draft: &MedicationDraft) -> Result<(), DbFault> {
    diesel::sql_query(REGISTER_MEDICATION)
        .bind::<Text, _>(&draft.nombre)
        .bind::<Integer, _>(draft.id_categoria)
        .bind::<Nullable<Integer>, _>(draft.id_proveedor)
        .bind::<Integer, _>(draft.stock)
        .bind::<Numeric, _>(&draft.precio_compra)
        .bind::<Numeric, _>(&draft.precio_venta)
        .bind::<Date, _>(draft.fecha_vencimiento)
        .bind::<Text, _>(&draft.lote)
        .bind::<Nullable<Text>, _>(draft.ubicacion.as_deref())
        .bind::<Nullable<Text>, _>(draft.descripcion.as_deref())
        .execute(conn)?;
    Ok(())
}

pub fn edit_medication(
    conn: &mut PgConnection,
    id_medicamento: i32,
    draft: &MedicationDraft,
) -> Result<(), DbFault> {
    diesel::sql_query(EDIT_MEDICATION)
        .bind::<Integer, _>(id_medicamento)
        .bind::<Text, _>(&draft.nombre)
        .bind::<Integer, _>(draft.id_categoria)
        .bind::<Nullable<Integer>, _>(draft.id_proveedor)
        .bind::<Integer, _>(draft.stock)
        .bind::<Numeric, _>(&draft.precio_compra)
        .bind::<Numeric, _>(&draft.precio_venta)
        .bind::<Date, _>(draft.fecha_vencimiento)
        .bind::<Text, _>(&draft.lote)
        .bind::<Nullable<Text>, _>(draft.ubicacion.as_deref())
        .bind::<Nullable<Text>, _>(draft.descripcion.as_deref())
        .execute(conn)?;
    Ok(())
}

pub fn edit_price(
    conn: &mut PgConnection,
    id_medicamento: i32,
    change: &PriceChange,
) -> Result<(), DbFault> {
    diesel::sql_query(EDIT_PRICE)
        .bind::<Integer, _>(id_medicamento)
        .bind::<Numeric, _>(&change.precio_compra)
        .bind::<Numeric, _>(&change.precio_venta)
        .execute(conn)?;
    Ok(())
}

pub fn add_stock(
    conn: &mut PgConnection,
    id_medicamento: i32,
    increment: StockIncrement,
) -> Result<(), DbFault> {
    diesel::sql_query(ADD_STOCK)
        .bind::<Integer, _>(id_medicamento)
        .bind::<Integer, _>(increment.cantidad)
        .execute(conn)?;
    Ok(())
}

pub fn change_status(
    conn: &mut PgConnection,
    id_medicamento: i32,
    status: MedicationStatus,
) -> Result<(), DbFault> {
    diesel::sql_query(CHANGE_STATUS)
        .bind::<Integer, _>(id_medicamento)
        .bind::<Text, _>(status.as_str())
        .execute(conn)?;
    Ok(())
}

/// Returns the id the procedure wrote into its INOUT parameter.
pub fn register_sale(conn: &mut PgConnection, header: &SaleHeader) -> Result<i32, DbFault> {
    let generated = diesel::sql_query(REGISTER_SALE)
        .bind::<Integer, _>(header.id_cliente)
        .bind::<Integer, _>(header.id_empleado)
        .bind::<Numeric, _>(&header.total_venta)
        .get_result::<GeneratedSaleId>(conn)?;
    Ok(generated.p_id_venta_generada)
}
