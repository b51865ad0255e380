pub mod catalog_repo;
pub mod fault;
pub mod models;
pub mod procedures;
pub mod report_repo;
pub mod sale_repo;

pub use sale_repo::DieselSaleLedger;
