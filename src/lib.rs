// Wedding Planner - Core Library
// Exposes all modules for use in the summary CLI, the API server, and tests

pub mod error;
pub mod config;
pub mod logging;
pub mod store;          // Record Store - JSON collections + singletons
pub mod dates;          // Date Codec - YYYY-MM-DD
pub mod forms;          // Submitted field parsing
pub mod entities;       // Guests, venues, expenses, tasks
pub mod budget;         // Budget Aggregator
pub mod tables;         // Table Planner
pub mod wedding_date;
pub mod planner;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{PlannerError, Result};
pub use config::Config;
pub use logging::{init_logging, Verbosity};
pub use store::{
    Backend, Document, FileBackend, LoadStatus, Loaded, MemoryBackend, Record, RecordStore,
};
pub use dates::{format_date, parse_date};
pub use entities::{
    Expense, ExpenseFields, ExpenseService,
    Guest, GuestService, GuestSummary, GuestUpdate,
    Progress, Task, TaskService,
    Venue, VenueFields, VenueService,
};
pub use budget::BudgetSummary;
pub use tables::{TableConfig, TablePlanner};
pub use wedding_date::{WeddingDate, WeddingDateService};
pub use planner::{all_readable, CollectionHealth, Dashboard, Planner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
