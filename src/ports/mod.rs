pub mod record_source;
pub mod sheet_sink;
