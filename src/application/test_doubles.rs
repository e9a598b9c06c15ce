use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use error_stack::report;

use crate::domain::{
    cell_value::CellValue,
    result_set::ResultSet,
    sheets::{
        a1_notation::{CellPosition, ToA1Notation},
        sheet_payload::SheetPayload,
    },
};
use crate::ports::{
    record_source::{ExtractError, RecordSource},
    sheet_sink::{AppendOutcome, SheetAuthorizer, SheetError, SheetSink},
};

pub fn promo_result_set() -> ResultSet {
    ResultSet::new(
        vec![
            "SKU".to_string(),
            "PLUDESC".to_string(),
            "MIXID".to_string(),
            "PLURTL".to_string(),
        ],
        vec![
            vec![
                CellValue::text("000000001001"),
                CellValue::text("COLA 12PK"),
                CellValue::from(4120),
                CellValue::from_numeric_text("6.99"),
            ],
            vec![
                CellValue::text("000000001002"),
                CellValue::text("KETTLE CHIPS"),
                CellValue::from(4121),
                CellValue::Null,
            ],
        ],
    )
}

/// Spreadsheet kept in memory. Tabs are created on first use; the sheet id is the tab's
/// position.
#[derive(Default)]
pub struct MemorySpreadsheet {
    tabs: Mutex<Vec<(String, Vec<Vec<CellValue>>)>>,
    calls: Mutex<Vec<&'static str>>,
    fail_clear: bool,
    fail_append: bool,
}

impl MemorySpreadsheet {
    pub fn with_contents(sheet_name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            tabs: Mutex::new(vec![(sheet_name.to_string(), rows)]),
            ..Self::default()
        }
    }

    pub fn failing_clear(mut self) -> Self {
        self.fail_clear = true;
        self
    }

    pub fn failing_append(mut self) -> Self {
        self.fail_append = true;
        self
    }

    pub fn contents(&self, sheet_name: &str) -> Vec<Vec<CellValue>> {
        self.tabs
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == sheet_name)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn with_tab<R>(&self, sheet_name: &str, f: impl FnOnce(&mut Vec<Vec<CellValue>>) -> R) -> R {
        let mut tabs = self.tabs.lock().unwrap();
        let index = match tabs.iter().position(|(name, _)| name == sheet_name) {
            Some(index) => index,
            None => {
                tabs.push((sheet_name.to_string(), Vec::new()));
                tabs.len() - 1
            }
        };
        f(&mut tabs[index].1)
    }
}

#[async_trait::async_trait]
impl SheetSink for MemorySpreadsheet {
    async fn clear_sheet(&self, sheet_name: &str) -> error_stack::Result<(), SheetError> {
        if self.fail_clear {
            return Err(report!(SheetError::Clear));
        }
        self.calls.lock().unwrap().push("clear");
        self.with_tab(sheet_name, |rows| rows.clear());
        Ok(())
    }

    async fn append_rows(
        &self,
        sheet_name: &str,
        payload: &SheetPayload,
    ) -> error_stack::Result<AppendOutcome, SheetError> {
        if self.fail_append {
            return Err(report!(SheetError::Append));
        }
        self.calls.lock().unwrap().push("append");

        let start_row = self.with_tab(sheet_name, |rows| {
            let start_row = rows.len();
            rows.extend(payload.rows().iter().cloned());
            start_row
        });

        let start = CellPosition::new(start_row as u32, 0).to_a1_notation(Some(sheet_name));
        let end = CellPosition::new(
            (start_row + payload.rows().len() - 1) as u32,
            payload.width().saturating_sub(1) as u32,
        )
        .to_a1_notation(None);

        Ok(AppendOutcome {
            updated_range: Some(format!("{}:{}", start, end)),
            updated_rows: Some(payload.rows().len() as i32),
            updated_cells: Some((payload.rows().len() * payload.width()) as i32),
        })
    }

    async fn sheet_id(&self, sheet_name: &str) -> error_stack::Result<Option<i32>, SheetError> {
        Ok(self
            .tabs
            .lock()
            .unwrap()
            .iter()
            .position(|(name, _)| name == sheet_name)
            .map(|index| index as i32))
    }
}

pub struct FakeAuthorizer {
    spreadsheet: Arc<MemorySpreadsheet>,
    reject: bool,
}

impl FakeAuthorizer {
    pub fn new(spreadsheet: Arc<MemorySpreadsheet>) -> Self {
        Self {
            spreadsheet,
            reject: false,
        }
    }

    pub fn rejecting(mut self) -> Self {
        self.reject = true;
        self
    }
}

#[async_trait::async_trait]
impl SheetAuthorizer for FakeAuthorizer {
    async fn authorize(&self) -> error_stack::Result<Arc<dyn SheetSink>, SheetError> {
        if self.reject {
            return Err(report!(SheetError::Authorization));
        }
        Ok(self.spreadsheet.clone())
    }
}

#[derive(Clone)]
pub struct FakeRecordSource {
    result_set: Option<ResultSet>,
    fetches: Arc<AtomicUsize>,
}

impl FakeRecordSource {
    pub fn returning(result_set: ResultSet) -> Self {
        Self {
            result_set: Some(result_set),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            result_set: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RecordSource for FakeRecordSource {
    async fn fetch_records(&self) -> error_stack::Result<ResultSet, ExtractError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.result_set
            .clone()
            .ok_or_else(|| report!(ExtractError::QueryExecution))
    }

    async fn ping(&self) -> error_stack::Result<(), ExtractError> {
        match self.result_set {
            Some(_) => Ok(()),
            None => Err(report!(ExtractError::DatabaseConnection)),
        }
    }
}
