pub mod a1_notation;
pub mod sheet_payload;
