//! Shared table state: column metadata plus the filter list, updated only
//! through dispatched actions.
use std::path::Path;

use color_eyre::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::action::Action;
use crate::filter::{ColumnMeta, FilterList};

/// Startup contents of the store, as read from `--state`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSeed {
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    #[serde(default)]
    pub filters: FilterList,
}

#[derive(Debug)]
pub struct TableStore {
    columns: Vec<ColumnMeta>,
    filters: FilterList,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl TableStore {
    pub fn new(columns: Vec<ColumnMeta>, filters: FilterList) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self { columns, filters, action_tx, action_rx }
    }

    pub fn from_seed(seed: TableSeed) -> Self {
        Self::new(seed.columns, seed.filters)
    }

    /// Read a JSON seed file
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let seed: TableSeed = serde_json::from_reader(file)?;
        Ok(Self::from_seed(seed))
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn filters(&self) -> &FilterList {
        &self.filters
    }

    /// Sender side of the dispatch queue
    pub fn dispatcher(&self) -> UnboundedSender<Action> {
        self.action_tx.clone()
    }

    /// Apply one action. Returns true when the state changed.
    pub fn reduce(&mut self, action: Action) -> bool {
        match action {
            Action::UpdateFilters { filters } => {
                if filters == self.filters {
                    return false;
                }
                debug!("filters replaced: {} -> {} entries", self.filters.len(), filters.len());
                self.filters = filters;
                true
            }
            _ => false,
        }
    }

    /// Drain the dispatch queue in order. Returns the number of state changes.
    pub fn process_pending(&mut self) -> usize {
        let mut changed = 0;
        while let Ok(action) = self.action_rx.try_recv() {
            if self.reduce(action) {
                changed += 1;
            }
        }
        changed
    }
}
