use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::{DbFault, ProcedureCode};

// ── Error conversions (infrastructure concern only) ──────────────────────────

/// Classify a driver error.
///
/// Procedure-raised rule violations are recognised by the `app:<code>` hint;
/// everything else is classified by the driver's error kind.
impl From<DieselError> for DbFault {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => DbFault::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                if let Some(code) = info.hint().and_then(ProcedureCode::from_hint) {
                    return DbFault::Procedure { code, message };
                }
                match kind {
                    DatabaseErrorKind::ForeignKeyViolation => DbFault::ForeignKey(message),
                    DatabaseErrorKind::UniqueViolation
                    | DatabaseErrorKind::CheckViolation
                    | DatabaseErrorKind::NotNullViolation => DbFault::Constraint(message),
                    DatabaseErrorKind::ClosedConnection => DbFault::Unavailable(message),
                    _ => DbFault::Other(message),
                }
            }
            other => DbFault::Other(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DbFault {
    fn from(e: r2d2::Error) -> Self {
        DbFault::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;

    use super::*;

    struct RaisedError {
        message: &'static str,
        hint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for RaisedError {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            self.hint
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &'static str, hint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(RaisedError { message, hint }))
    }

    #[test]
    fn hinted_procedure_error_is_classified_by_code() {
        let fault: DbFault = db_error(
            DatabaseErrorKind::Unknown,
            "Stock insuficiente para el medicamento 5",
            Some("app:20002"),
        )
        .into();

        assert_eq!(
            fault,
            DbFault::Procedure {
                code: ProcedureCode::InsufficientStock,
                message: "Stock insuficiente para el medicamento 5".into(),
            }
        );
    }

    #[test]
    fn foreign_key_violation_is_a_reference_fault() {
        let fault: DbFault = db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "insert or update on table \"venta_detalle\" violates foreign key constraint",
            None,
        )
        .into();
        assert!(matches!(fault, DbFault::ForeignKey(_)));
    }

    #[test]
    fn constraint_kinds_are_grouped() {
        for kind in [
            DatabaseErrorKind::UniqueViolation,
            DatabaseErrorKind::CheckViolation,
            DatabaseErrorKind::NotNullViolation,
        ] {
            let fault: DbFault = db_error(kind, "violates constraint", None).into();
            assert!(matches!(fault, DbFault::Constraint(_)));
        }
    }

    #[test]
    fn unrelated_hint_falls_back_to_kind() {
        let fault: DbFault = db_error(
            DatabaseErrorKind::ForeignKeyViolation,
            "fk",
            Some("Make sure the referenced row exists"),
        )
        .into();
        assert!(matches!(fault, DbFault::ForeignKey(_)));
    }

    #[test]
    fn closed_connection_is_unavailable() {
        let fault: DbFault = db_error(DatabaseErrorKind::ClosedConnection, "server closed", None).into();
        assert!(matches!(fault, DbFault::Unavailable(_)));
    }

    #[test]
    fn not_found_and_unknown_errors() {
        assert_eq!(DbFault::from(DieselError::NotFound), DbFault::NotFound);

        let fault: DbFault = db_error(DatabaseErrorKind::Unknown, "syntax error", None).into();
        assert_eq!(fault, DbFault::Other("syntax error".into()));

        let fault: DbFault = DieselError::RollbackTransaction.into();
        assert!(matches!(fault, DbFault::Other(_)));
    }
}
