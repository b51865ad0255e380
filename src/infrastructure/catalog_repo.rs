use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::errors::DbFault;
use crate::domain::medication::{MedicationStatus, MedicationView};
use crate::schema::{categorias, clientes, empleados, medicamentos, proveedores};

use super::models::{CategoryRow, ClientRow, EmployeeRow, MedicationRow, SupplierRow};

type MedicationJoin = (MedicationRow, String, Option<String>);

fn into_view((row, categoria, proveedor): MedicationJoin) -> MedicationView {
    MedicationView {
        id_medicamento: row.id_medicamento,
        nombre: row.nombre,
        id_categoria: row.id_categoria,
        categoria,
        id_proveedor: row.id_proveedor,
        proveedor,
        stock: row.stock,
        precio_compra: row.precio_compra,
        precio_venta: row.precio_venta,
        fecha_vencimiento: row.fecha_vencimiento,
        lote: row.lote,
        ubicacion: row.ubicacion,
        descripcion: row.descripcion,
        estado: row.estado,
    }
}

/// Medications with their category and supplier names, by name.
/// Logically deleted rows are skipped unless `include_inactive`.
pub fn list_medications(
    conn: &mut PgConnection,
    include_inactive: bool,
) -> Result<Vec<MedicationView>, DbFault> {
    let mut query = medicamentos::table
        .inner_join(categorias::table)
        .left_join(proveedores::table)
        .select((
            MedicationRow::as_select(),
            categorias::nombre,
            proveedores::nombre.nullable(),
        ))
        .order(medicamentos::nombre.asc())
        .into_boxed();

    if !include_inactive {
        query = query.filter(medicamentos::estado.eq(MedicationStatus::Active.as_str()));
    }

    let rows: Vec<MedicationJoin> = query.load(conn)?;
    Ok(rows.into_iter().map(into_view).collect())
}

pub fn find_medication(
    conn: &mut PgConnection,
    id_medicamento: i32,
) -> Result<Option<MedicationView>, DbFault> {
    let row: Option<MedicationJoin> = medicamentos::table
        .inner_join(categorias::table)
        .left_join(proveedores::table)
        .filter(medicamentos::id_medicamento.eq(id_medicamento))
        .select((
            MedicationRow::as_select(),
            categorias::nombre,
            proveedores::nombre.nullable(),
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(into_view))
}

pub fn list_categories(conn: &mut PgConnection) -> Result<Vec<CategoryRow>, DbFault> {
    Ok(categorias::table
        .select(CategoryRow::as_select())
        .order(categorias::nombre.asc())
        .load(conn)?)
}

pub fn list_suppliers(conn: &mut PgConnection) -> Result<Vec<SupplierRow>, DbFault> {
    Ok(proveedores::table
        .select(SupplierRow::as_select())
        .order(proveedores::nombre.asc())
        .load(conn)?)
}

pub fn list_employees(conn: &mut PgConnection) -> Result<Vec<EmployeeRow>, DbFault> {
    Ok(empleados::table
        .select(EmployeeRow::as_select())
        .order((empleados::apellido.asc(), empleados::nombre.asc()))
        .load(conn)?)
}

pub fn list_clients(conn: &mut PgConnection) -> Result<Vec<ClientRow>, DbFault> {
    Ok(clientes::table
        .select(ClientRow::as_select())
        .order((clientes::apellido.asc(), clientes::nombre.asc()))
        .load(conn)?)
}
