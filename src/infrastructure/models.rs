use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use crate::schema::{categorias, clientes, empleados, medicamentos, proveedores, venta_detalle, ventas};

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable)]
#[diesel(table_name = categorias)]
#[diesel(primary_key(id_categoria))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id_categoria: i32,
    pub nombre: String,
    pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable)]
#[diesel(table_name = proveedores)]
#[diesel(primary_key(id_proveedor))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SupplierRow {
    pub id_proveedor: i32,
    pub nombre: String,
    pub ruc: Option<String>,
    pub contacto_telefono: Option<String>,
    pub email: Option<String>,
    pub direccion: Option<String>,
    pub estado: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable)]
#[diesel(table_name = empleados)]
#[diesel(primary_key(id_empleado))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmployeeRow {
    pub id_empleado: i32,
    pub nombre: String,
    pub apellido: String,
    pub dni: String,
    pub cargo: Option<String>,
    pub estado: String,
}

#[derive(Debug, Clone, Serialize, ToSchema, Queryable, Selectable, Identifiable)]
#[diesel(table_name = clientes)]
#[diesel(primary_key(id_cliente))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClientRow {
    pub id_cliente: i32,
    pub nombre: String,
    pub apellido: String,
    pub dni: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = medicamentos)]
#[diesel(primary_key(id_medicamento))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MedicationRow {
    pub id_medicamento: i32,
    pub nombre: String,
    pub id_categoria: i32,
    pub id_proveedor: Option<i32>,
    pub stock: i32,
    pub precio_compra: BigDecimal,
    pub precio_venta: BigDecimal,
    pub fecha_vencimiento: NaiveDate,
    pub lote: String,
    pub ubicacion: Option<String>,
    pub descripcion: Option<String>,
    pub estado: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = ventas)]
#[diesel(primary_key(id_venta))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleRow {
    pub id_venta: i32,
    pub id_cliente: i32,
    pub id_empleado: i32,
    pub fecha_venta: DateTime<Utc>,
    pub total_venta: BigDecimal,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = venta_detalle)]
#[diesel(primary_key(id_detalle))]
#[diesel(belongs_to(SaleRow, foreign_key = id_venta))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SaleLineRow {
    pub id_detalle: i32,
    pub id_venta: i32,
    pub id_medicamento: i32,
    pub cantidad: i32,
    pub precio_unitario_venta: BigDecimal,
    pub subtotal: Option<BigDecimal>,
}

/// `subtotal` is computed by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = venta_detalle)]
pub struct NewSaleLineRow<'a> {
    pub id_venta: i32,
    pub id_medicamento: i32,
    pub cantidad: i32,
    pub precio_unitario_venta: &'a BigDecimal,
}
