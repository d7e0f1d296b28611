use super::workbook::{load_workbook, DataError};
use contracts::shared::Table;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::path::Path;

static STORE: OnceCell<SheetStore> = OnceCell::new();

/// Read-only collection of the fourteen loaded sheets. Owned by the
/// process for its whole lifetime; derived computations always return
/// new tables, so concurrent readers need no locking.
#[derive(Debug)]
pub struct SheetStore {
    sheets: HashMap<String, Table>,
}

impl SheetStore {
    pub fn new(sheets: HashMap<String, Table>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Result<&Table, DataError> {
        self.sheets
            .get(name)
            .ok_or_else(|| DataError::DataUnavailable(format!("sheet '{name}' not loaded")))
    }
}

/// Load the workbook once at startup. All-or-nothing: a missing sheet
/// fails the whole initialization.
pub fn initialize_store(path: &Path) -> Result<(), DataError> {
    let sheets = load_workbook(path)?;
    tracing::info!(
        "Loaded {} sheets from {}",
        sheets.len(),
        path.display()
    );
    let _ = STORE.set(SheetStore::new(sheets));
    Ok(())
}

pub fn sheet_store() -> Result<&'static SheetStore, DataError> {
    STORE
        .get()
        .ok_or_else(|| DataError::DataUnavailable("sheet store not initialized".to_string()))
}
