pub mod errors;
pub mod medication;
pub mod ports;
pub mod report;
pub mod sale;
