// SPDX-License-Identifier: PMPL-1.0-or-later

//! Where inference calls get their table from

use crate::error::DataSourceResult;
use crate::table;
use crate::types::AssociationTable;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies an association table to each inference call
pub trait TableSource: Send + Sync {
    fn load(&self) -> DataSourceResult<Arc<AssociationTable>>;
}

/// Re-reads the dataset file on every call
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for CsvFileSource {
    fn load(&self) -> DataSourceResult<Arc<AssociationTable>> {
        table::load_table(&self.path).map(Arc::new)
    }
}

/// One immutable table shared by every call
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    table: Arc<AssociationTable>,
}

impl SnapshotSource {
    pub fn new(table: AssociationTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Read the dataset once and keep it
    pub fn from_path(path: &Path) -> DataSourceResult<Self> {
        Ok(Self::new(table::load_table(path)?))
    }
}

impl TableSource for SnapshotSource {
    fn load(&self) -> DataSourceResult<Arc<AssociationTable>> {
        Ok(Arc::clone(&self.table))
    }
}

/// Adapts a loader function into a [`TableSource`]
pub struct FnSource<F>(pub F);

impl<F> TableSource for FnSource<F>
where
    F: Fn() -> DataSourceResult<AssociationTable> + Send + Sync,
{
    fn load(&self) -> DataSourceResult<Arc<AssociationTable>> {
        (self.0)().map(Arc::new)
    }
}

impl<S: TableSource + ?Sized> TableSource for Box<S> {
    fn load(&self) -> DataSourceResult<Arc<AssociationTable>> {
        (**self).load()
    }
}
