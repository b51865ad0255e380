use thiserror::Error;

/// Application error codes raised by the `pkg_gestion_farmacia` procedures.
///
/// The procedures raise with SQLSTATE `P0001` and put `app:<code>` in the
/// exception hint; the numbering follows the package's original
/// `raise_application_error` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureCode {
    ExpiredMedication,
    InsufficientStock,
    InvalidPriceOrder,
    NonPositiveQuantity,
    UnknownCatalogReference,
    MedicationNotFound,
}

impl ProcedureCode {
    const HINT_PREFIX: &'static str = "app:";

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            20001 => Some(Self::ExpiredMedication),
            20002 => Some(Self::InsufficientStock),
            20003 => Some(Self::InvalidPriceOrder),
            20004 => Some(Self::NonPositiveQuantity),
            20005 => Some(Self::UnknownCatalogReference),
            20006 => Some(Self::MedicationNotFound),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            Self::ExpiredMedication => 20001,
            Self::InsufficientStock => 20002,
            Self::InvalidPriceOrder => 20003,
            Self::NonPositiveQuantity => 20004,
            Self::UnknownCatalogReference => 20005,
            Self::MedicationNotFound => 20006,
        }
    }

    /// Parse the `app:<code>` marker carried in an exception hint.
    pub fn from_hint(hint: &str) -> Option<Self> {
        hint.trim()
            .strip_prefix(Self::HINT_PREFIX)?
            .parse::<u32>()
            .ok()
            .and_then(Self::from_code)
    }

    /// Client-facing wording for the rule the database rejected.
    pub fn message(self) -> &'static str {
        match self {
            Self::ExpiredMedication => "El medicamento está vencido o la fecha de vencimiento no es válida.",
            Self::InsufficientStock => "Stock insuficiente para uno o más medicamentos.",
            Self::InvalidPriceOrder => "El precio de venta debe ser mayor al precio de compra.",
            Self::NonPositiveQuantity => "La cantidad debe ser mayor a 0.",
            Self::UnknownCatalogReference => "La categoría o el proveedor indicado no existe.",
            Self::MedicationNotFound => "El medicamento indicado no existe.",
        }
    }
}

/// A database failure, classified at the driver boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbFault {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Procedure error {}: {message}", .code.code())]
    Procedure {
        code: ProcedureCode,
        message: String,
    },

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Record not found")]
    NotFound,

    #[error("{0}")]
    Other(String),
}

/// Wording for the faults whose meaning depends on the operation that hit them.
#[derive(Debug, Clone, Copy)]
pub struct FaultContext {
    pub unknown_reference: &'static str,
    pub not_found: &'static str,
}

impl FaultContext {
    pub const SALE: FaultContext = FaultContext {
        unknown_reference: "Medicamento, cliente o empleado no existe en el sistema.",
        not_found: "No se encontró el registro especificado.",
    };

    pub const MEDICATION: FaultContext = FaultContext {
        unknown_reference: "La categoría o el proveedor indicado no existe.",
        not_found: "El medicamento indicado no existe.",
    };
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    RuleViolation(String),

    #[error("{0}")]
    UnknownReference(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Database(String),
}

impl DomainError {
    pub fn unavailable() -> Self {
        DomainError::Unavailable("No se pudo conectar a la base de datos.".to_string())
    }

    /// Translate a classified fault using the caller's wording.
    pub fn from_fault(fault: DbFault, ctx: FaultContext) -> Self {
        match fault {
            DbFault::Unavailable(_) => DomainError::unavailable(),
            DbFault::Procedure { code, .. } => match code {
                ProcedureCode::InsufficientStock => DomainError::Conflict(code.message().into()),
                ProcedureCode::MedicationNotFound => DomainError::NotFound(code.message().into()),
                ProcedureCode::UnknownCatalogReference => {
                    DomainError::UnknownReference(code.message().into())
                }
                ProcedureCode::ExpiredMedication
                | ProcedureCode::InvalidPriceOrder
                | ProcedureCode::NonPositiveQuantity => {
                    DomainError::RuleViolation(code.message().into())
                }
            },
            DbFault::ForeignKey(_) => DomainError::UnknownReference(ctx.unknown_reference.into()),
            DbFault::Constraint(msg) => DomainError::InvalidInput(format!("Datos inválidos: {msg}")),
            DbFault::NotFound => DomainError::NotFound(ctx.not_found.into()),
            DbFault::Other(msg) => DomainError::Database(format!("Error en base de datos: {msg}")),
        }
    }
}
