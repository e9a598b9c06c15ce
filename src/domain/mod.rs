pub mod cell_value;
pub mod date;
pub mod pipeline_state;
pub mod result_set;
pub mod sheets;

// Re-export commonly used types
pub use cell_value::CellValue;
pub use pipeline_state::PipelineState;
pub use result_set::ResultSet;
pub use sheets::sheet_payload::{PayloadError, SheetPayload};
