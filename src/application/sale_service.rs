use crate::domain::errors::{DbFault, DomainError, FaultContext};
use crate::domain::ports::SaleLedger;
use crate::domain::sale::{NewSale, SaleReceipt, SaleState};

/// Registers a sale header and its lines as one unit of work.
///
/// Either the header and every line are committed, or the ledger is rolled
/// back before the error is returned.
pub struct SaleService<L> {
    ledger: L,
    state: SaleState,
}

impl<L: SaleLedger> SaleService<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            state: SaleState::Idle,
        }
    }

    pub fn state(&self) -> SaleState {
        self.state
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn register(&mut self, sale: NewSale) -> Result<SaleReceipt, DomainError> {
        if sale.lines.is_empty() {
            return Err(DomainError::InvalidInput(
                "El campo 'detalles' debe ser una lista no vacía.".to_string(),
            ));
        }

        self.ledger.begin().map_err(sale_fault)?;

        let id_venta = match self.write_all(&sale) {
            Ok(id_venta) => id_venta,
            Err(err) => {
                self.abort();
                return Err(err);
            }
        };

        if let Err(fault) = self.ledger.commit() {
            let err = sale_fault(fault);
            self.abort();
            return Err(err);
        }
        self.transition(SaleState::Committed { id_venta });

        log::info!(
            "Sale {} registered with {} line(s)",
            id_venta,
            sale.lines.len()
        );
        Ok(SaleReceipt {
            id_venta,
            items_procesados: sale.lines.len(),
        })
    }

    // Lines go in one statement each, in request order: the stock trigger
    // locks one medication row per insert.
    fn write_all(&mut self, sale: &NewSale) -> Result<i32, DomainError> {
        let id_venta = self
            .ledger
            .register_header(&sale.header)
            .map_err(sale_fault)?;
        self.transition(SaleState::HeaderInserted { id_venta });

        for (index, draft) in sale.lines.iter().enumerate() {
            let position = index + 1;
            let line = draft.validate(position)?;
            self.ledger
                .insert_line(id_venta, &line)
                .map_err(sale_fault)?;
            self.transition(SaleState::LineInserted {
                id_venta,
                line: position,
            });
        }

        Ok(id_venta)
    }

    fn abort(&mut self) {
        if let Err(fault) = self.ledger.rollback() {
            log::warn!("Rollback of sale registration failed: {}", fault);
        }
        self.transition(SaleState::RolledBack);
    }

    fn transition(&mut self, next: SaleState) {
        log::debug!("Sale registration {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn sale_fault(fault: DbFault) -> DomainError {
    log::error!("Sale registration failed: {}", fault);
    DomainError::from_fault(fault, FaultContext::SALE)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::errors::ProcedureCode;
    use crate::domain::sale::{SaleHeader, SaleLine, SaleLineDraft};

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Begin,
        Header,
        Line(i32),
        Commit,
        Rollback,
    }

    /// Keeps uncommitted rows apart so tests can assert what survives.
    #[derive(Default)]
    struct FakeLedger {
        ops: Vec<Op>,
        next_id: i32,
        pending_headers: Vec<i32>,
        pending_lines: Vec<(i32, SaleLine)>,
        headers: Vec<i32>,
        lines: Vec<(i32, SaleLine)>,
        fail_begin: Option<DbFault>,
        fail_header: Option<DbFault>,
        fail_line_for: Option<(i32, DbFault)>,
        fail_commit: Option<DbFault>,
        fail_rollback: Option<DbFault>,
    }

    impl SaleLedger for FakeLedger {
        fn begin(&mut self) -> Result<(), DbFault> {
            if let Some(f) = self.fail_begin.take() {
                return Err(f);
            }
            self.ops.push(Op::Begin);
            Ok(())
        }

        fn register_header(&mut self, _header: &SaleHeader) -> Result<i32, DbFault> {
            self.ops.push(Op::Header);
            if let Some(f) = self.fail_header.take() {
                return Err(f);
            }
            self.next_id += 1;
            self.pending_headers.push(self.next_id);
            Ok(self.next_id)
        }

        fn insert_line(&mut self, id_venta: i32, line: &SaleLine) -> Result<(), DbFault> {
            self.ops.push(Op::Line(line.id_medicamento));
            let fails_here = matches!(
                &self.fail_line_for,
                Some((med, _)) if *med == line.id_medicamento
            );
            if fails_here {
                if let Some((_, f)) = self.fail_line_for.take() {
                    return Err(f);
                }
            }
            self.pending_lines.push((id_venta, line.clone()));
            Ok(())
        }

        fn commit(&mut self) -> Result<(), DbFault> {
            self.ops.push(Op::Commit);
            if let Some(f) = self.fail_commit.take() {
                return Err(f);
            }
            self.headers.append(&mut self.pending_headers);
            self.lines.append(&mut self.pending_lines);
            Ok(())
        }

        fn rollback(&mut self) -> Result<(), DbFault> {
            self.ops.push(Op::Rollback);
            self.pending_headers.clear();
            self.pending_lines.clear();
            match self.fail_rollback.take() {
                Some(f) => Err(f),
                None => Ok(()),
            }
        }
    }

    fn line(id: i32, qty: i32, price: &str) -> SaleLineDraft {
        SaleLineDraft {
            id_medicamento: Some(id),
            cantidad: Some(qty),
            precio_unitario_venta: Some(BigDecimal::from_str(price).expect("valid decimal")),
        }
    }

    fn sale(lines: Vec<SaleLineDraft>) -> NewSale {
        NewSale {
            header: SaleHeader {
                id_cliente: 1,
                id_empleado: 1,
                total_venta: BigDecimal::from(20),
            },
            lines,
        }
    }

    #[test]
    fn commits_header_and_every_line_in_order() {
        let mut service = SaleService::new(FakeLedger::default());

        let receipt = service
            .register(sale(vec![line(5, 2, "10.00"), line(7, 1, "3.50")]))
            .expect("sale should register");

        assert_eq!(receipt.items_procesados, 2);
        assert_eq!(service.state(), SaleState::Committed { id_venta: receipt.id_venta });

        let ledger = service.ledger();
        assert_eq!(
            ledger.ops,
            vec![Op::Begin, Op::Header, Op::Line(5), Op::Line(7), Op::Commit]
        );
        assert_eq!(ledger.headers, vec![receipt.id_venta]);
        assert_eq!(ledger.lines.len(), 2);
        assert!(ledger.lines.iter().all(|(id, _)| *id == receipt.id_venta));
    }

    #[test]
    fn empty_line_list_does_no_database_work() {
        let mut service = SaleService::new(FakeLedger::default());

        let err = service.register(sale(vec![])).unwrap_err();

        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(service.ledger().ops.is_empty());
        assert_eq!(service.state(), SaleState::Idle);
    }

    #[test]
    fn invalid_line_rolls_back_header_and_earlier_lines() {
        let mut service = SaleService::new(FakeLedger::default());

        let err = service
            .register(sale(vec![line(5, 2, "10.00"), line(7, 0, "3.50")]))
            .unwrap_err();

        assert_eq!(err.to_string(), "Detalle #2: la cantidad debe ser mayor a 0");
        assert_eq!(service.state(), SaleState::RolledBack);
        let ledger = service.ledger();
        assert_eq!(
            ledger.ops,
            vec![Op::Begin, Op::Header, Op::Line(5), Op::Rollback]
        );
        assert!(ledger.headers.is_empty());
        assert!(ledger.lines.is_empty());
    }

    #[test]
    fn stock_shortfall_is_a_conflict_and_rolls_back() {
        let ledger = FakeLedger {
            fail_line_for: Some((
                5,
                DbFault::Procedure {
                    code: ProcedureCode::InsufficientStock,
                    message: "Stock insuficiente".into(),
                },
            )),
            ..Default::default()
        };
        let mut service = SaleService::new(ledger);

        let err = service.register(sale(vec![line(5, 2, "10.00")])).unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(service.ledger().ops.last(), Some(&Op::Rollback));
        assert!(service.ledger().lines.is_empty());
        assert!(service.ledger().headers.is_empty());
    }

    #[test]
    fn unknown_client_on_header_skips_lines() {
        let ledger = FakeLedger {
            fail_header: Some(DbFault::ForeignKey("ventas_id_cliente_fkey".into())),
            ..Default::default()
        };
        let mut service = SaleService::new(ledger);

        let err = service.register(sale(vec![line(5, 1, "1.00")])).unwrap_err();

        assert!(matches!(err, DomainError::UnknownReference(_)));
        assert_eq!(
            service.ledger().ops,
            vec![Op::Begin, Op::Header, Op::Rollback]
        );
    }

    #[test]
    fn begin_failure_reports_unavailable_without_rollback() {
        let ledger = FakeLedger {
            fail_begin: Some(DbFault::Unavailable("connection refused".into())),
            ..Default::default()
        };
        let mut service = SaleService::new(ledger);

        let err = service.register(sale(vec![line(5, 1, "1.00")])).unwrap_err();

        assert!(matches!(err, DomainError::Unavailable(_)));
        assert!(service.ledger().ops.is_empty());
    }

    #[test]
    fn commit_failure_rolls_back_and_reports_database_error() {
        let ledger = FakeLedger {
            fail_commit: Some(DbFault::Other("could not serialize access".into())),
            ..Default::default()
        };
        let mut service = SaleService::new(ledger);

        let err = service.register(sale(vec![line(5, 1, "1.00")])).unwrap_err();

        assert!(matches!(err, DomainError::Database(_)));
        assert_eq!(service.state(), SaleState::RolledBack);
        assert_eq!(service.ledger().ops.last(), Some(&Op::Rollback));
        assert!(service.ledger().headers.is_empty());
    }

    #[test]
    fn failed_rollback_keeps_the_original_error() {
        let ledger = FakeLedger {
            fail_line_for: Some((5, DbFault::NotFound)),
            fail_rollback: Some(DbFault::Unavailable("gone".into())),
            ..Default::default()
        };
        let mut service = SaleService::new(ledger);

        let err = service.register(sale(vec![line(5, 1, "1.00")])).unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
        assert_eq!(service.state(), SaleState::RolledBack);
    }
}
