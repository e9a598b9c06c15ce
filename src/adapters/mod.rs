pub mod odbc;
pub mod sheets;
