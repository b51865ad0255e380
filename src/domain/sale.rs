use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::errors::DomainError;

/// Arguments of `p_registrar_venta` (the generated id comes back as its INOUT parameter).
#[derive(Debug, Clone, PartialEq)]
pub struct SaleHeader {
    pub id_cliente: i32,
    pub id_empleado: i32,
    pub total_venta: BigDecimal,
}

/// A line item as received; checked one by one inside the sale transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleLineDraft {
    pub id_medicamento: Option<i32>,
    pub cantidad: Option<i32>,
    pub precio_unitario_venta: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub id_medicamento: i32,
    pub cantidad: i32,
    pub precio_unitario_venta: BigDecimal,
}

impl SaleLineDraft {
    /// `position` is 1-based and only used in the error message.
    pub fn validate(&self, position: usize) -> Result<SaleLine, DomainError> {
        let (Some(id_medicamento), Some(cantidad), Some(precio)) = (
            self.id_medicamento,
            self.cantidad,
            self.precio_unitario_venta.as_ref(),
        ) else {
            return Err(DomainError::InvalidInput(format!(
                "Detalle #{position}: faltan campos requeridos (id_medicamento, cantidad, precio_unitario_venta)"
            )));
        };

        if cantidad <= 0 {
            return Err(DomainError::InvalidInput(format!(
                "Detalle #{position}: la cantidad debe ser mayor a 0"
            )));
        }
        if *precio <= BigDecimal::from(0) {
            return Err(DomainError::InvalidInput(format!(
                "Detalle #{position}: el precio debe ser mayor a 0"
            )));
        }

        Ok(SaleLine {
            id_medicamento,
            cantidad,
            precio_unitario_venta: precio.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewSale {
    pub header: SaleHeader,
    pub lines: Vec<SaleLineDraft>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleReceipt {
    pub id_venta: i32,
    pub items_procesados: usize,
}

/// Progress of one sale registration. `Committed` and `RolledBack` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleState {
    Idle,
    HeaderInserted { id_venta: i32 },
    LineInserted { id_venta: i32, line: usize },
    Committed { id_venta: i32 },
    RolledBack,
}

impl SaleState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SaleState::Committed { .. } | SaleState::RolledBack)
    }
}

#[derive(Debug, Clone)]
pub struct SaleSummary {
    pub id_venta: i32,
    pub fecha_venta: DateTime<Utc>,
    pub cliente: String,
    pub empleado: String,
    pub total_venta: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct SaleLineView {
    pub id_detalle: i32,
    pub id_medicamento: i32,
    pub medicamento: String,
    pub cantidad: i32,
    pub precio_unitario_venta: BigDecimal,
    pub subtotal: Option<BigDecimal>,
}

#[derive(Debug, Clone)]
pub struct SaleDetail {
    pub id_venta: i32,
    pub fecha_venta: DateTime<Utc>,
    pub cliente: String,
    pub cliente_dni: Option<String>,
    pub empleado: String,
    pub total_venta: BigDecimal,
    pub detalles: Vec<SaleLineView>,
}

/// `"nombre apellido"`, the way sale listings show people.
pub fn display_name(nombre: &str, apellido: &str) -> String {
    format!("{nombre} {apellido}")
}
