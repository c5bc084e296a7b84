// Planner - one handle over every service sharing a single record store

use chrono::NaiveDate;
use serde::Serialize;

use crate::budget::{self, BudgetSummary};
use crate::entities::{
    Expense, ExpenseService, Guest, GuestService, GuestSummary, Progress, Task, TaskService,
    Venue, VenueService,
};
use crate::store::{LoadStatus, Record, RecordStore};
use crate::tables::TablePlanner;
use crate::wedding_date::WeddingDateService;

#[derive(Debug, Clone)]
pub struct Planner {
    store: RecordStore,
}

/// Read status of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionHealth {
    pub collection: &'static str,
    pub file: &'static str,
    pub status: LoadStatus,
}

/// True when no collection is unreadable.
pub fn all_readable(collections: &[CollectionHealth]) -> bool {
    collections.iter().all(|c| !c.status.is_unreadable())
}

/// Everything the front page shows.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub guests: GuestSummary,
    pub budget: BudgetSummary,
    pub tasks: Progress,
    pub wedding_date: Option<String>,
    pub days_until: Option<i64>,
}

impl Planner {
    pub fn new(store: RecordStore) -> Self {
        Planner { store }
    }

    pub fn guests(&self) -> GuestService {
        GuestService::new(self.store.clone())
    }

    pub fn venues(&self) -> VenueService {
        VenueService::new(self.store.clone())
    }

    pub fn expenses(&self) -> ExpenseService {
        ExpenseService::new(self.store.clone())
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.store.clone())
    }

    pub fn tables(&self) -> TablePlanner {
        TablePlanner::new(self.store.clone())
    }

    pub fn wedding_date(&self) -> WeddingDateService {
        WeddingDateService::new(self.store.clone())
    }

    pub fn budget(&self) -> BudgetSummary {
        budget::summarize(&self.store)
    }

    /// Status of every collection, for monitoring an unreadable file.
    pub fn health(&self) -> Vec<CollectionHealth> {
        vec![
            self.collection_health::<Guest>(),
            self.collection_health::<Venue>(),
            self.collection_health::<Expense>(),
            self.collection_health::<Task>(),
        ]
    }

    pub fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let date = self.wedding_date();
        let wedding = date.get();

        Dashboard {
            guests: self.guests().summary(),
            budget: self.budget(),
            tasks: self.tasks().progress(),
            wedding_date: wedding.map(crate::dates::format_date),
            days_until: wedding.map(|d| (d - today).num_days()),
        }
    }

    fn collection_health<T: Record>(&self) -> CollectionHealth {
        CollectionHealth {
            collection: T::COLLECTION,
            file: T::FILE,
            status: self.store.status::<T>(),
        }
    }
}
