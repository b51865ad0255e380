use super::errors::DbFault;
use super::sale::{SaleHeader, SaleLine};

/// The write side of a sale, step by step, on one connection.
///
/// Nothing is visible to other connections until `commit`; `rollback`
/// discards everything since `begin`.
pub trait SaleLedger {
    fn begin(&mut self) -> Result<(), DbFault>;

    /// Insert the header and return the id the database generated for it.
    fn register_header(&mut self, header: &SaleHeader) -> Result<i32, DbFault>;

    fn insert_line(&mut self, id_venta: i32, line: &SaleLine) -> Result<(), DbFault>;

    fn commit(&mut self) -> Result<(), DbFault>;

    fn rollback(&mut self) -> Result<(), DbFault>;
}
