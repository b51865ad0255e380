use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationStatus {
    Active,
    Inactive,
}

impl MedicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MedicationStatus::Active => "Activo",
            MedicationStatus::Inactive => "Inactivo",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim() {
            "Activo" => Ok(MedicationStatus::Active),
            "Inactivo" => Ok(MedicationStatus::Inactive),
            other => Err(DomainError::InvalidInput(format!(
                "Estado '{other}' no válido. Valores permitidos: Activo, Inactivo."
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MedicationView {
    pub id_medicamento: i32,
    pub nombre: String,
    pub id_categoria: i32,
    pub categoria: String,
    pub id_proveedor: Option<i32>,
    pub proveedor: Option<String>,
    pub stock: i32,
    pub precio_compra: BigDecimal,
    pub precio_venta: BigDecimal,
    pub fecha_vencimiento: NaiveDate,
    pub lote: String,
    pub ubicacion: Option<String>,
    pub descripcion: Option<String>,
    pub estado: String,
}

/// Arguments of `p_registrar_medicamento` and `p_editar_medicamento`.
#[derive(Debug, Clone, PartialEq)]
pub struct MedicationDraft {
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
}

/// Arguments of `p_editar_precio`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceChange {
    pub precio_compra: BigDecimal,
    pub precio_venta: BigDecimal,
}

/// Arguments of `p_agregar_stock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockIncrement {
    pub cantidad: i32,
}

impl StockIncrement {
    /// The procedure rejects non-positive amounts too; checking here saves the round trip.
    pub fn new(cantidad: i32) -> Result<Self, DomainError> {
        if cantidad <= 0 {
            return Err(DomainError::InvalidInput(
                "La cantidad agregada debe ser mayor a 0.".to_string(),
            ));
        }
        Ok(Self { cantidad })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_both_values() {
        assert_eq!(MedicationStatus::parse("Activo").unwrap(), MedicationStatus::Active);
        assert_eq!(
            MedicationStatus::parse(" Inactivo ").unwrap(),
            MedicationStatus::Inactive
        );
    }

    #[test]
    fn status_rejects_other_values() {
        let err = MedicationStatus::parse("Agotado").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn stock_increment_must_be_positive() {
        assert!(StockIncrement::new(0).is_err());
        assert!(StockIncrement::new(-3).is_err());
        assert_eq!(StockIncrement::new(5).unwrap().cantidad, 5);
    }
}
