// 🪑 Table Planner - seating layout
//
// Tables are numbered 1..=num_tables. A guest's `table` is a plain number
// matched by value; a number outside the configured range simply does not
// show up in the seating view.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::entities::{Guest, GuestService};
use crate::error::Result;
use crate::store::{Document, RecordStore};

/// Table layout. Zero tables until configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub num_tables: u32,
    #[serde(default)]
    pub seats_per_table: u32,
}

impl Document for TableConfig {
    const FILE: &'static str = "table_config.json";
}

impl TableConfig {
    pub fn has_table(&self, table: u32) -> bool {
        (1..=self.num_tables).contains(&table)
    }
}

/// Group guest names by table, in guest-list order within each table.
///
/// Every configured table appears, empty or not.
pub fn seating(config: &TableConfig, guests: &[Guest]) -> BTreeMap<u32, Vec<String>> {
    let mut tables: BTreeMap<u32, Vec<String>> =
        (1..=config.num_tables).map(|n| (n, Vec::new())).collect();

    for guest in guests {
        let Some(table) = guest.table else { continue };
        if let Some(names) = tables.get_mut(&table) {
            names.push(guest.name.clone());
        }
    }

    tables
}

#[derive(Debug, Clone)]
pub struct TablePlanner {
    store: RecordStore,
    guests: GuestService,
}

impl TablePlanner {
    pub fn new(store: RecordStore) -> Self {
        TablePlanner {
            guests: GuestService::new(store.clone()),
            store,
        }
    }

    pub fn config(&self) -> TableConfig {
        self.store.load_document::<TableConfig>()
    }

    /// Persist the layout. Existing assignments are not checked against it.
    pub fn configure(&self, num_tables: u32, seats_per_table: u32) -> Result<TableConfig> {
        let config = TableConfig {
            num_tables,
            seats_per_table,
        };
        self.store.save_document(&config)?;

        info!(num_tables, seats_per_table, "Configured tables");
        Ok(config)
    }

    /// Table number → names seated there.
    pub fn view(&self) -> BTreeMap<u32, Vec<String>> {
        seating(&self.config(), &self.guests.list())
    }

    /// Names of guests without a table that exists in the current layout.
    pub fn unseated(&self) -> Vec<String> {
        let config = self.config();
        self.guests
            .list()
            .into_iter()
            .filter(|g| !g.table.is_some_and(|t| config.has_table(t)))
            .map(|g| g.name)
            .collect()
    }

    /// Tables holding more guests than they have seats.
    ///
    /// Nothing is reported until a seat count is configured.
    pub fn overfull(&self) -> Vec<u32> {
        let config = self.config();
        if config.seats_per_table == 0 {
            return Vec::new();
        }

        seating(&config, &self.guests.list())
            .into_iter()
            .filter(|(_, names)| names.len() > config.seats_per_table as usize)
            .map(|(table, _)| table)
            .collect()
    }

    /// Reassign all tables from a submission keyed by guest id.
    pub fn bulk_assign(&self, submitted: &HashMap<String, String>) -> Result<usize> {
        self.guests.assign_tables(submitted)
    }
}
